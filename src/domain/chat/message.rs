use uuid::Uuid;

/// Room a client lands in when none is named.
pub const DEFAULT_ROOM: &str = "lobby";

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub room: String,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub body: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}
