use chrono::{DateTime, Utc};

pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct CreateGuestUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub guest_expiry: DateTime<Utc>,
}
