use std::collections::HashMap;

use crate::database::{
    model::event::{AttendeeRow, EventRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{
        check_join, check_leave,
        event::{CreateEvent, DeleteEvent, JoinEvent, LeaveEvent, UpdateEvent},
        Event,
    },
    id::{EventId, UserId},
    user::Attendee,
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<Event> {
        let event_id = EventId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO events
                (event_id, name, description, event_date, location, category, capacity, image_url, creator_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.capacity)
        .bind(&event.image_url)
        .bind(event.created_by)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been created".into(),
            ));
        }

        self.find_by_id(event_id).await?.ok_or_else(|| {
            AppError::ConversionEntityError("created event could not be read back".into())
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
                SELECT
                    e.event_id,
                    e.name,
                    e.description,
                    e.event_date,
                    e.location,
                    e.category,
                    e.capacity,
                    e.image_url,
                    e.creator_id,
                    u.name AS creator_name
                FROM events AS e
                INNER JOIN users AS u ON u.user_id = e.creator_id
                ORDER BY e.event_date ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let event_ids: Vec<EventId> = rows.iter().map(|row| row.event_id).collect();
        let mut attendees = self.collect_attendees(event_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let event_attendees = attendees.remove(&row.event_id).unwrap_or_default();
                row.into_event(event_attendees)
            })
            .collect())
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
                SELECT
                    e.event_id,
                    e.name,
                    e.description,
                    e.event_date,
                    e.location,
                    e.category,
                    e.capacity,
                    e.image_url,
                    e.creator_id,
                    u.name AS creator_name
                FROM events AS e
                INNER JOIN users AS u ON u.user_id = e.creator_id
                WHERE e.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut attendees = self.collect_attendees(vec![event_id]).await?;
        let event_attendees = attendees.remove(&event_id).unwrap_or_default();
        Ok(Some(row.into_event(event_attendees)))
    }

    async fn update(&self, event: UpdateEvent) -> AppResult<Event> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // The creator check runs inside the transaction so it cannot be
        // bypassed by a concurrent update.
        {
            let creator_id: Option<UserId> =
                sqlx::query_scalar("SELECT creator_id FROM events WHERE event_id = $1")
                    .bind(event.event_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            let Some(creator_id) = creator_id else {
                return Err(AppError::EntityNotFound("Event not found".into()));
            };
            if creator_id != event.requested_user {
                return Err(AppError::ForbiddenOperation);
            }
        }

        let res = sqlx::query(
            r#"
                UPDATE events
                SET
                    name = $2,
                    description = $3,
                    event_date = $4,
                    location = $5,
                    category = $6,
                    capacity = $7,
                    image_url = $8
                WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.capacity)
        .bind(&event.image_url)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.event_id).await?.ok_or_else(|| {
            AppError::ConversionEntityError("updated event could not be read back".into())
        })
    }

    async fn delete(&self, event: DeleteEvent) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        {
            let creator_id: Option<UserId> =
                sqlx::query_scalar("SELECT creator_id FROM events WHERE event_id = $1")
                    .bind(event.event_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            let Some(creator_id) = creator_id else {
                return Err(AppError::EntityNotFound("Event not found".into()));
            };
            if creator_id != event.requested_user {
                return Err(AppError::ForbiddenOperation);
            }
        }

        // Dropping the attendee rows and the event in one transaction keeps
        // every user's attending list consistent with the event's demise.
        sqlx::query("DELETE FROM event_attendees WHERE event_id = $1")
            .bind(event.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn join(&self, event: JoinEvent) -> AppResult<Event> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Read the capacity and the current attendee set in the same
        // serializable transaction as the insert, so two concurrent joins at
        // capacity minus one cannot both pass the check.
        {
            let capacity: Option<i32> =
                sqlx::query_scalar("SELECT capacity FROM events WHERE event_id = $1")
                    .bind(event.event_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            let Some(capacity) = capacity else {
                return Err(AppError::EntityNotFound("Event not found".into()));
            };

            let attendees: Vec<UserId> = sqlx::query_scalar(
                "SELECT user_id FROM event_attendees WHERE event_id = $1 ORDER BY joined_at ASC",
            )
            .bind(event.event_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            check_join(&attendees, capacity, event.user_id)?;
        }

        let res = sqlx::query("INSERT INTO event_attendees (event_id, user_id) VALUES ($1, $2)")
            .bind(event.event_id)
            .bind(event.user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No attendee record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.event_id).await?.ok_or_else(|| {
            AppError::ConversionEntityError("joined event could not be read back".into())
        })
    }

    async fn leave(&self, event: LeaveEvent) -> AppResult<Event> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        {
            let exists: Option<EventId> =
                sqlx::query_scalar("SELECT event_id FROM events WHERE event_id = $1")
                    .bind(event.event_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            if exists.is_none() {
                return Err(AppError::EntityNotFound("Event not found".into()));
            }

            let attendees: Vec<UserId> = sqlx::query_scalar(
                "SELECT user_id FROM event_attendees WHERE event_id = $1 ORDER BY joined_at ASC",
            )
            .bind(event.event_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            check_leave(&attendees, event.user_id)?;
        }

        let res =
            sqlx::query("DELETE FROM event_attendees WHERE event_id = $1 AND user_id = $2")
                .bind(event.event_id)
                .bind(event.user_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No attendee record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.event_id).await?.ok_or_else(|| {
            AppError::ConversionEntityError("left event could not be read back".into())
        })
    }
}

impl EventRepositoryImpl {
    // Join and leave read the attendee set before writing it; SERIALIZABLE
    // turns the read-then-write window into a transaction conflict instead
    // of an over-capacity event.
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    /// Attendees for the given events, grouped by event, in join order.
    async fn collect_attendees(
        &self,
        event_ids: Vec<EventId>,
    ) -> AppResult<HashMap<EventId, Vec<Attendee>>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<AttendeeRow> = sqlx::query_as(
            r#"
                SELECT
                    ea.event_id,
                    ea.user_id,
                    u.name
                FROM event_attendees AS ea
                INNER JOIN users AS u ON u.user_id = ea.user_id
                WHERE ea.event_id = ANY($1)
                ORDER BY ea.joined_at ASC, ea.user_id ASC
            "#,
        )
        .bind(event_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut grouped: HashMap<EventId, Vec<Attendee>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.event_id)
                .or_default()
                .push(Attendee::from(row));
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::UserRepositoryImpl;
    use chrono::Utc;
    use kernel::model::user::event::CreateUser;
    use kernel::repository::user::UserRepository;

    fn create_event_for(creator: UserId) -> CreateEvent {
        CreateEvent {
            name: "Rust meetup".into(),
            description: "Monthly meetup".into(),
            date: Utc::now(),
            location: "Tokyo".into(),
            category: "tech".into(),
            capacity: 2,
            image_url: "https://example.com/meetup.png".into(),
            created_by: creator,
        }
    }

    async fn register_user(pool: &ConnectionPool, name: &str) -> UserId {
        let repo = UserRepositoryImpl::new(pool.clone());
        let user = repo
            .create(CreateUser {
                name: name.into(),
                email: format!("{name}@example.com"),
                password: "passwd".into(),
            })
            .await
            .unwrap();
        user.user_id
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "needs a running Postgres"]
    async fn join_is_bounded_by_capacity(pool: sqlx::PgPool) {
        let db = ConnectionPool::new(pool);
        let repo = EventRepositoryImpl::new(db.clone());

        let creator = register_user(&db, "creator").await;
        let (a, b, c) = (
            register_user(&db, "attendee-a").await,
            register_user(&db, "attendee-b").await,
            register_user(&db, "attendee-c").await,
        );
        let event = repo.create(create_event_for(creator)).await.unwrap();

        let after_a = repo.join(JoinEvent::new(event.id, a)).await.unwrap();
        assert_eq!(after_a.attendees.len(), 1);
        let after_b = repo.join(JoinEvent::new(event.id, b)).await.unwrap();
        assert_eq!(after_b.attendees.len(), 2);

        let err = repo.join(JoinEvent::new(event.id, c)).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let unchanged = repo.find_by_id(event.id).await.unwrap().unwrap();
        let ids: Vec<UserId> = unchanged.attendees.iter().map(|at| at.user_id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "needs a running Postgres"]
    async fn delete_cascades_attendance(pool: sqlx::PgPool) {
        let db = ConnectionPool::new(pool);
        let repo = EventRepositoryImpl::new(db.clone());
        let users = UserRepositoryImpl::new(db.clone());

        let creator = register_user(&db, "owner").await;
        let attendee = register_user(&db, "joiner").await;
        let event = repo.create(create_event_for(creator)).await.unwrap();
        repo.join(JoinEvent::new(event.id, attendee)).await.unwrap();

        repo.delete(DeleteEvent {
            event_id: event.id,
            requested_user: creator,
        })
        .await
        .unwrap();

        assert!(repo.find_by_id(event.id).await.unwrap().is_none());
        let joiner = users.find_current_user(attendee).await.unwrap().unwrap();
        assert!(joiner.events_attending.is_empty());
        let owner = users.find_current_user(creator).await.unwrap().unwrap();
        assert!(owner.events_created.is_empty());
    }
}
