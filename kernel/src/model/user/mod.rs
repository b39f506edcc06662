use crate::model::id::{EventId, UserId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub guest_expiry: Option<DateTime<Utc>>,
    /// Ids of events this user created, newest first.
    pub events_created: Vec<EventId>,
    /// Ids of events this user attends, in join order.
    pub events_attending: Vec<EventId>,
}

#[derive(Debug, Clone)]
pub struct EventCreator {
    pub user_id: UserId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Attendee {
    pub user_id: UserId,
    pub name: String,
}
