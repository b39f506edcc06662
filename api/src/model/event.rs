use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    event::{
        event::{CreateEvent, UpdateEvent},
        Event,
    },
    id::{EventId, UserId},
    user::{Attendee, EventCreator},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub description: String,
    #[garde(skip)]
    pub date: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(length(min = 1))]
    pub image_url: String,
}

/// Request plus the stored image URL and the authenticated creator.
#[derive(new)]
pub struct CreateEventRequestWithUser(CreateEventRequest, String, UserId);

impl From<CreateEventRequestWithUser> for CreateEvent {
    fn from(value: CreateEventRequestWithUser) -> Self {
        let CreateEventRequestWithUser(
            CreateEventRequest {
                name,
                description,
                date,
                location,
                category,
                capacity,
                image_url: _,
            },
            image_url,
            created_by,
        ) = value;
        CreateEvent {
            name,
            description,
            date,
            location,
            category,
            capacity,
            image_url,
            created_by,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub description: String,
    #[garde(skip)]
    pub date: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(length(min = 1))]
    pub image_url: String,
}

#[derive(new)]
pub struct UpdateEventRequestWithIds(EventId, UserId, String, UpdateEventRequest);

impl From<UpdateEventRequestWithIds> for UpdateEvent {
    fn from(value: UpdateEventRequestWithIds) -> Self {
        let UpdateEventRequestWithIds(
            event_id,
            requested_user,
            image_url,
            UpdateEventRequest {
                name,
                description,
                date,
                location,
                category,
                capacity,
                image_url: _,
            },
        ) = value;
        UpdateEvent {
            event_id,
            name,
            description,
            date,
            location,
            category,
            capacity,
            image_url,
            requested_user,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub image_url: String,
    pub creator: EventCreatorResponse,
    pub attendees: Vec<AttendeeResponse>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            id,
            name,
            description,
            date,
            location,
            category,
            capacity,
            image_url,
            creator,
            attendees,
        } = value;
        Self {
            id,
            name,
            description,
            date,
            location,
            category,
            capacity,
            image_url,
            creator: creator.into(),
            attendees: attendees.into_iter().map(AttendeeResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreatorResponse {
    pub id: UserId,
    pub name: String,
}

impl From<EventCreator> for EventCreatorResponse {
    fn from(value: EventCreator) -> Self {
        let EventCreator { user_id, name } = value;
        Self { id: user_id, name }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub id: UserId,
    pub name: String,
}

impl From<Attendee> for AttendeeResponse {
    fn from(value: Attendee) -> Self {
        let Attendee { user_id, name } = value;
        Self { id: user_id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: EventId::new(),
            name: "RustConf afterparty".into(),
            description: "Drinks and lightning talks".into(),
            date: Utc::now(),
            location: "Portland".into(),
            category: "social".into(),
            capacity: 50,
            image_url: "https://example.com/party.png".into(),
            creator: EventCreator {
                user_id: UserId::new(),
                name: "Ursula".into(),
            },
            attendees: vec![Attendee {
                user_id: UserId::new(),
                name: "Viktor".into(),
            }],
        }
    }

    #[test]
    fn event_response_uses_the_camel_case_wire_shape() {
        let response = EventResponse::from(sample_event());
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("imageUrl").is_some());
        assert_eq!(json["creator"]["name"], "Ursula");
        assert_eq!(json["attendees"][0]["name"], "Viktor");
        assert_eq!(json["capacity"], 50);
    }

    #[test]
    fn create_request_rejects_nonpositive_capacity() {
        let req = CreateEventRequest {
            name: "x".into(),
            description: "y".into(),
            date: Utc::now(),
            location: "z".into(),
            category: "c".into(),
            capacity: 0,
            image_url: "u".into(),
        };
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn create_request_rejects_missing_fields() {
        let req: Result<CreateEventRequest, _> = serde_json::from_value(serde_json::json!({
            "name": "incomplete"
        }));
        assert!(req.is_err());
    }

    #[test]
    fn create_command_carries_the_stored_image_url() {
        let req = CreateEventRequest {
            name: "meetup".into(),
            description: "d".into(),
            date: Utc::now(),
            location: "l".into(),
            category: "c".into(),
            capacity: 3,
            image_url: "data:image/png;base64,AAAA".into(),
        };
        let creator = UserId::new();
        let command: CreateEvent =
            CreateEventRequestWithUser::new(req, "https://cdn.example.com/a.png".into(), creator)
                .into();
        assert_eq!(command.image_url, "https://cdn.example.com/a.png");
        assert_eq!(command.created_by, creator);
    }
}
