use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::sessions::session::SessionRecord;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Live (unexpired) session by id.
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<SessionRecord>>;
    /// Upsert; called on every request regardless of modification.
    async fn save(&self, record: &SessionRecord) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Removes expired rows, returning how many were deleted.
    async fn purge_expired(&self) -> anyhow::Result<u64>;
}
