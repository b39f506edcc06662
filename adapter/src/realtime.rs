use std::{
    collections::HashMap,
    sync::RwLock,
};

use kernel::model::id::EventId;
use kernel::realtime::{EventBroadcaster, RealtimeMessage};
use tokio::sync::broadcast;

/// Buffered messages per room before slow subscribers start missing updates.
const ROOM_CAPACITY: usize = 64;

/// In-process publish/subscribe hub with one broadcast channel per event room.
/// Rooms come into existence on the first subscribe and are pruned on the
/// next subscribe, or once a publish finds no receivers left.
pub struct RealtimeHub {
    rooms: RwLock<HashMap<EventId, broadcast::Sender<RealtimeMessage>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().map(|rooms| rooms.len()).unwrap_or(0)
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroadcaster for RealtimeHub {
    fn publish(&self, event_id: EventId, message: RealtimeMessage) {
        let Ok(mut rooms) = self.rooms.write() else {
            return;
        };
        let Some(tx) = rooms.get(&event_id) else {
            return;
        };
        if tx.send(message).is_err() {
            // Every receiver is gone; the room is dead.
            rooms.remove(&event_id);
        }
    }

    fn subscribe(&self, event_id: EventId) -> broadcast::Receiver<RealtimeMessage> {
        match self.rooms.write() {
            Ok(mut rooms) => {
                // Rooms abandoned without another publish get dropped here.
                rooms.retain(|_, tx| tx.receiver_count() > 0);
                rooms
                    .entry(event_id)
                    .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
                    .subscribe()
            }
            // A poisoned lock degrades to a channel nobody publishes to.
            Err(_) => broadcast::channel(1).1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::id::UserId;

    fn joined(event_id: EventId, name: &str) -> RealtimeMessage {
        RealtimeMessage::UserJoined {
            event_id,
            user_id: UserId::new(),
            name: name.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn every_room_subscriber_receives_the_message() {
        let hub = RealtimeHub::new();
        let event_id = EventId::new();
        let mut first = hub.subscribe(event_id);
        let mut second = hub.subscribe(event_id);

        hub.publish(event_id, joined(event_id, "alice"));

        for rx in [&mut first, &mut second] {
            let message = rx.recv().await.unwrap();
            assert!(
                matches!(message, RealtimeMessage::UserJoined { ref name, .. } if name == "alice")
            );
        }
    }

    #[tokio::test]
    async fn rooms_are_isolated_from_each_other() {
        let hub = RealtimeHub::new();
        let (one, other) = (EventId::new(), EventId::new());
        let mut rx = hub.subscribe(other);

        hub.publish(one, joined(one, "bob"));

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn publishing_to_an_empty_room_is_a_no_op() {
        let hub = RealtimeHub::new();
        let event_id = EventId::new();
        hub.publish(event_id, joined(event_id, "carol"));

        // A later subscriber only sees messages published after subscribing.
        let mut rx = hub.subscribe(event_id);
        hub.publish(event_id, joined(event_id, "dave"));
        let message = rx.recv().await.unwrap();
        assert!(matches!(message, RealtimeMessage::UserJoined { ref name, .. } if name == "dave"));
    }

    #[tokio::test]
    async fn abandoned_rooms_are_dropped_on_the_next_subscribe() {
        let hub = RealtimeHub::new();
        let (stale, fresh) = (EventId::new(), EventId::new());
        drop(hub.subscribe(stale));
        assert_eq!(hub.room_count(), 1);

        // Subscribing anywhere sweeps out the receiverless room.
        let _rx = hub.subscribe(fresh);
        assert_eq!(hub.room_count(), 1);
    }

    #[tokio::test]
    async fn a_dead_room_can_be_rejoined() {
        let hub = RealtimeHub::new();
        let event_id = EventId::new();
        drop(hub.subscribe(event_id));

        // First publish prunes the dead room, after which subscribing again works.
        hub.publish(event_id, joined(event_id, "erin"));
        let mut rx = hub.subscribe(event_id);
        hub.publish(event_id, joined(event_id, "frank"));
        assert!(rx.recv().await.is_ok());
    }
}
