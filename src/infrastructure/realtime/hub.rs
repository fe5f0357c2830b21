use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use crate::application::ports::relay_port::{RelayError, RelayEvent, RelayPort};

const ROOM_CHANNEL_CAPACITY: usize = 64;

/// In-process relay: one broadcast channel per room, created on first
/// subscribe or publish. Slow receivers miss messages rather than exerting
/// backpressure on senders.
#[derive(Clone)]
pub struct Hub {
    rooms: Arc<RwLock<HashMap<String, broadcast::Sender<RelayEvent>>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn get_or_create(&self, room: &str) -> broadcast::Sender<RelayEvent> {
        if let Some(tx) = self.rooms.read().await.get(room).cloned() {
            return tx;
        }
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
            .clone()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayPort for Hub {
    async fn publish(&self, room: &str, event: RelayEvent) -> Result<(), RelayError> {
        let tx = self.get_or_create(room).await;
        // A send error only means nobody is listening right now.
        let _ = tx.send(event);
        Ok(())
    }

    async fn subscribe(&self, room: &str) -> broadcast::Receiver<RelayEvent> {
        self.get_or_create(room).await.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(room: &str, body: &str) -> RelayEvent {
        RelayEvent::Message {
            room: room.into(),
            sender: "kim".into(),
            body: body.into(),
            sent_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn fan_out_reaches_room_subscribers_only() {
        let hub = Hub::new();
        let mut lobby_a = hub.subscribe("lobby").await;
        let mut lobby_b = hub.subscribe("lobby").await;
        let mut other = hub.subscribe("other").await;

        hub.publish("lobby", event("lobby", "hi")).await.unwrap();

        for rx in [&mut lobby_a, &mut lobby_b] {
            match rx.recv().await.unwrap() {
                RelayEvent::Message { body, .. } => assert_eq!(body, "hi"),
            }
        }
        assert!(other.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let hub = Hub::new();
        hub.publish("empty", event("empty", "void")).await.unwrap();
    }
}
