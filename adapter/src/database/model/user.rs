use kernel::model::{
    id::{EventId, UserId},
    user::User,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub guest_expiry: Option<DateTime<Utc>>,
}

impl UserRow {
    pub fn into_user(self, events_created: Vec<EventId>, events_attending: Vec<EventId>) -> User {
        let UserRow {
            user_id,
            name,
            email,
            is_guest,
            guest_expiry,
        } = self;
        User {
            user_id,
            name,
            email,
            is_guest,
            guest_expiry,
            events_created,
            events_attending,
        }
    }
}
