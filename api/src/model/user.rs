use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{EventId, UserId},
    user::{event::CreateUser, User},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            name,
            email,
            password,
        } = value;
        Self {
            name,
            email,
            password,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub guest_expiry: Option<DateTime<Utc>>,
    pub events_created: Vec<EventId>,
    pub events_attending: Vec<EventId>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            name,
            email,
            is_guest,
            guest_expiry,
            events_created,
            events_attending,
        } = value;
        Self {
            id: user_id,
            name,
            email,
            is_guest,
            guest_expiry,
            events_created,
            events_attending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_a_bad_email() {
        let req = CreateUserRequest {
            name: "n".into(),
            email: "not-an-email".into(),
            password: "p".into(),
        };
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn user_response_exposes_guest_fields_in_camel_case() {
        let response = UserResponse::from(User {
            user_id: UserId::new(),
            name: "Guest1234".into(),
            email: "guest1234@temp.com".into(),
            is_guest: true,
            guest_expiry: Some(Utc::now()),
            events_created: vec![],
            events_attending: vec![EventId::new()],
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isGuest"], true);
        assert!(json.get("guestExpiry").is_some());
        assert_eq!(json["eventsAttending"].as_array().unwrap().len(), 1);
    }
}
