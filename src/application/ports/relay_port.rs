use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event fanned out to every subscriber of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelayEvent {
    Message {
        room: String,
        sender: String,
        body: String,
        sent_at: chrono::DateTime<chrono::Utc>,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("relay error: {0}")]
pub struct RelayError(String);

impl RelayError {
    pub fn new(e: impl std::fmt::Display) -> Self {
        Self(e.to_string())
    }
}

/// Seam between the chat controllers and the transport hub. The transport
/// itself (socket lifecycle, backpressure) stays behind this trait.
#[async_trait]
pub trait RelayPort: Send + Sync {
    async fn publish(&self, room: &str, event: RelayEvent) -> Result<(), RelayError>;
    async fn subscribe(&self, room: &str) -> broadcast::Receiver<RelayEvent>;
}
