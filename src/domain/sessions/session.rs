use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::users::user::UserSnapshot;

/// Server-side session row. The id doubles as the cookie value; everything
/// the client can observe lives in `user` and `chat`.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user: Option<UserSnapshot>,
    pub chat: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Serialized payload persisted in the store's `data` column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<serde_json::Value>,
}

impl SessionRecord {
    pub fn new(max_age_ms: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user: None,
            chat: None,
            created_at: now,
            expires_at: now + Duration::milliseconds(max_age_ms),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Refreshes the expiry window; called on every save (resave semantics).
    pub fn touch(&mut self, max_age_ms: i64) {
        self.expires_at = Utc::now() + Duration::milliseconds(max_age_ms);
    }

    pub fn data(&self) -> SessionData {
        SessionData {
            user: self.user.clone(),
            chat: self.chat.clone(),
        }
    }

    pub fn from_parts(
        id: Uuid,
        data: SessionData,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user: data.user,
            chat: data.chat,
            created_at,
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_anonymous_and_unexpired() {
        let s = SessionRecord::new(60_000);
        assert!(s.user.is_none());
        assert!(s.chat.is_none());
        assert!(!s.is_expired());
    }

    #[test]
    fn data_round_trips_through_json() {
        let mut s = SessionRecord::new(60_000);
        s.user = Some(UserSnapshot {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            name: "a".into(),
        });
        s.chat = Some(serde_json::json!({"room": "lobby"}));
        let json = serde_json::to_value(s.data()).unwrap();
        let back: SessionData = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back.user, s.user);
        assert_eq!(back.chat, s.chat);
        // The serialized session never carries a password field.
        assert!(json["user"].get("password").is_none());
        assert!(json["user"].get("password_hash").is_none());
    }
}
