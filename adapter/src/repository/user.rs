use crate::database::{model::user::UserRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{EventId, UserId},
    user::{
        event::{CreateGuestUser, CreateUser},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let taken: Option<UserId> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1")
                .bind(&event.email)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        if taken.is_some() {
            return Err(AppError::UnprocessableEntity("User already exists".into()));
        }

        let user_id = UserId::new();
        let hashed_password =
            bcrypt::hash(&event.password, bcrypt::DEFAULT_COST).map_err(AppError::HashPasswordError)?;

        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, name, email, password_hash)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(&event.name)
        .bind(&event.email)
        .bind(&hashed_password)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            name: event.name,
            email: event.email,
            is_guest: false,
            guest_expiry: None,
            events_created: Vec::new(),
            events_attending: Vec::new(),
        })
    }

    async fn create_guest(&self, event: CreateGuestUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed_password =
            bcrypt::hash(&event.password, bcrypt::DEFAULT_COST).map_err(AppError::HashPasswordError)?;

        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, name, email, password_hash, is_guest, guest_expiry)
                VALUES ($1, $2, $3, $4, TRUE, $5)
            "#,
        )
        .bind(user_id)
        .bind(&event.name)
        .bind(&event.email)
        .bind(&hashed_password)
        .bind(event.guest_expiry)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No guest record has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            name: event.name,
            email: event.email,
            is_guest: true,
            guest_expiry: Some(event.guest_expiry),
            events_created: Vec::new(),
            events_attending: Vec::new(),
        })
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, name, email, is_guest, guest_expiry
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Both lists are derived, so they can never drift from the events
        // and event_attendees tables.
        let events_created: Vec<EventId> = sqlx::query_scalar(
            "SELECT event_id FROM events WHERE creator_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let events_attending: Vec<EventId> = sqlx::query_scalar(
            "SELECT event_id FROM event_attendees WHERE user_id = $1 ORDER BY joined_at ASC",
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(row.into_user(events_created, events_attending)))
    }
}
