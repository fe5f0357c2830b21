use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::chat::message::Message;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(
        &self,
        room: &str,
        sender_id: Uuid,
        sender_name: &str,
        body: &str,
    ) -> anyhow::Result<Message>;
    /// Most recent messages for a room, oldest first.
    async fn list_recent(&self, room: &str, limit: i64) -> anyhow::Result<Vec<Message>>;
}
