use crate::model::id::{EventId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

pub struct CreateEvent {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub image_url: String,
    pub created_by: UserId,
}

#[derive(Debug)]
pub struct UpdateEvent {
    pub event_id: EventId,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub image_url: String,
    pub requested_user: UserId,
}

#[derive(Debug)]
pub struct DeleteEvent {
    pub event_id: EventId,
    pub requested_user: UserId,
}

#[derive(new)]
pub struct JoinEvent {
    pub event_id: EventId,
    pub user_id: UserId,
}

#[derive(new)]
pub struct LeaveEvent {
    pub event_id: EventId,
    pub user_id: UserId,
}
