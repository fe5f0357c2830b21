use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::message_repository::MessageRepository;
use crate::domain::chat::message::Message;
use crate::infrastructure::db::PgPool;

pub struct SqlxMessageRepository {
    pub pool: PgPool,
}

impl SqlxMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(r: &sqlx::postgres::PgRow) -> Message {
    Message {
        id: r.get("id"),
        room: r.get("room"),
        sender_id: r.get("sender_id"),
        sender_name: r.get("sender_name"),
        body: r.get("body"),
        sent_at: r.get("sent_at"),
    }
}

#[async_trait]
impl MessageRepository for SqlxMessageRepository {
    async fn append(
        &self,
        room: &str,
        sender_id: Uuid,
        sender_name: &str,
        body: &str,
    ) -> anyhow::Result<Message> {
        let row = sqlx::query(
            r#"INSERT INTO messages (room, sender_id, sender_name, body)
               VALUES ($1, $2, $3, $4)
               RETURNING id, room, sender_id, sender_name, body, sent_at"#,
        )
        .bind(room)
        .bind(sender_id)
        .bind(sender_name)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_message(&row))
    }

    async fn list_recent(&self, room: &str, limit: i64) -> anyhow::Result<Vec<Message>> {
        // Newest N, then flipped so callers render oldest first.
        let rows = sqlx::query(
            r#"SELECT id, room, sender_id, sender_name, body, sent_at
               FROM messages WHERE room = $1
               ORDER BY sent_at DESC LIMIT $2"#,
        )
        .bind(room)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        let mut msgs: Vec<Message> = rows.iter().map(row_to_message).collect();
        msgs.reverse();
        Ok(msgs)
    }
}
