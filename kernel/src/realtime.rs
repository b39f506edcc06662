use crate::model::{
    event::Event,
    id::{EventId, UserId},
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Message fanned out to every subscriber of one event's channel.
#[derive(Debug, Clone)]
pub enum RealtimeMessage {
    /// The full populated event after a state-changing operation.
    EventUpdate(Event),
    UserJoined {
        event_id: EventId,
        user_id: UserId,
        name: String,
        timestamp: DateTime<Utc>,
    },
    UserLeft {
        event_id: EventId,
        user_id: UserId,
        name: String,
    },
}

/// Publish/subscribe port keyed by event id. Handlers publish only after the
/// authoritative write has committed; delivery is best effort and never
/// retried.
pub trait EventBroadcaster: Send + Sync {
    /// No-op when the room has no subscribers.
    fn publish(&self, event_id: EventId, message: RealtimeMessage);
    fn subscribe(&self, event_id: EventId) -> broadcast::Receiver<RealtimeMessage>;
}
