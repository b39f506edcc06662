use crate::model::event::{AttendeeResponse, EventResponse};
use chrono::{DateTime, Utc};
use kernel::model::id::EventId;
use kernel::realtime::RealtimeMessage;
use serde::{Deserialize, Serialize};

/// Room control messages sent by the client over the realtime socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinEvent { event_id: EventId },
    #[serde(rename_all = "camelCase")]
    LeaveEvent { event_id: EventId },
}

/// Messages fanned out to everyone watching an event.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    EventUpdate { event: EventResponse },
    #[serde(rename_all = "camelCase")]
    UserJoined {
        event_id: EventId,
        user: AttendeeResponse,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    UserLeft {
        event_id: EventId,
        user: AttendeeResponse,
    },
}

impl From<RealtimeMessage> for ServerMessage {
    fn from(value: RealtimeMessage) -> Self {
        match value {
            RealtimeMessage::EventUpdate(event) => Self::EventUpdate {
                event: event.into(),
            },
            RealtimeMessage::UserJoined {
                event_id,
                user_id,
                name,
                timestamp,
            } => Self::UserJoined {
                event_id,
                user: AttendeeResponse { id: user_id, name },
                timestamp,
            },
            RealtimeMessage::UserLeft {
                event_id,
                user_id,
                name,
            } => Self::UserLeft {
                event_id,
                user: AttendeeResponse { id: user_id, name },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::id::UserId;

    #[test]
    fn client_room_messages_parse_from_their_wire_form() {
        let event_id = EventId::new();
        let raw = format!(r#"{{"type":"joinEvent","eventId":"{event_id}"}}"#);
        let parsed: ClientMessage = serde_json::from_str(&raw).unwrap();
        assert!(matches!(parsed, ClientMessage::JoinEvent { event_id: id } if id == event_id));

        let raw = format!(r#"{{"type":"leaveEvent","eventId":"{event_id}"}}"#);
        let parsed: ClientMessage = serde_json::from_str(&raw).unwrap();
        assert!(matches!(parsed, ClientMessage::LeaveEvent { event_id: id } if id == event_id));
    }

    #[test]
    fn malformed_client_messages_are_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }

    #[test]
    fn user_joined_carries_identity_and_timestamp() {
        let event_id = EventId::new();
        let message = ServerMessage::from(RealtimeMessage::UserJoined {
            event_id,
            user_id: UserId::new(),
            name: "Wanda".into(),
            timestamp: Utc::now(),
        });
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "userJoined");
        assert_eq!(json["eventId"], event_id.to_string());
        assert_eq!(json["user"]["name"], "Wanda");
        assert!(json.get("timestamp").is_some());
    }
}
