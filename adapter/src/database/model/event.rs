use kernel::model::{
    event::Event,
    id::{EventId, UserId},
    user::{Attendee, EventCreator},
};
use sqlx::types::chrono::{DateTime, Utc};

/// One event joined with its creator's display name.
#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub name: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub image_url: String,
    pub creator_id: UserId,
    pub creator_name: String,
}

impl EventRow {
    pub fn into_event(self, attendees: Vec<Attendee>) -> Event {
        let EventRow {
            event_id,
            name,
            description,
            event_date,
            location,
            category,
            capacity,
            image_url,
            creator_id,
            creator_name,
        } = self;
        Event {
            id: event_id,
            name,
            description,
            date: event_date,
            location,
            category,
            capacity,
            image_url,
            creator: EventCreator {
                user_id: creator_id,
                name: creator_name,
            },
            attendees,
        }
    }
}

/// One attendee row joined with the user's display name, fetched in join order.
#[derive(sqlx::FromRow)]
pub struct AttendeeRow {
    pub event_id: EventId,
    pub user_id: UserId,
    pub name: String,
}

impl From<AttendeeRow> for Attendee {
    fn from(value: AttendeeRow) -> Self {
        let AttendeeRow { user_id, name, .. } = value;
        Self { user_id, name }
    }
}
