use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-visible copy of a user. Carries no password field, so a session
/// or request context built from it cannot leak the stored hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}
