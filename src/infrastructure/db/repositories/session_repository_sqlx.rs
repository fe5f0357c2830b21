use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::session_repository::SessionRepository;
use crate::domain::sessions::session::{SessionData, SessionRecord};
use crate::infrastructure::db::PgPool;

pub struct SqlxSessionRepository {
    pub pool: PgPool,
}

impl SqlxSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<SessionRecord>> {
        let row = sqlx::query(
            r#"SELECT id, data, created_at, expires_at FROM sessions
               WHERE id = $1 AND expires_at > now()"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| {
            let data: SessionData = serde_json::from_value(r.get("data"))?;
            Ok(SessionRecord::from_parts(
                r.get("id"),
                data,
                r.get("created_at"),
                r.get("expires_at"),
            ))
        })
        .transpose()
    }

    async fn save(&self, record: &SessionRecord) -> anyhow::Result<()> {
        let data = serde_json::to_value(record.data())?;
        sqlx::query(
            r#"INSERT INTO sessions (id, data, created_at, expires_at)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (id) DO UPDATE
               SET data = EXCLUDED.data, expires_at = EXCLUDED.expires_at"#,
        )
        .bind(record.id)
        .bind(data)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn purge_expired(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
