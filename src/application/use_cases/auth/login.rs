use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// Returns the row with the hash already stripped on success.
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<UserRow>> {
        let row = match self.repo.find_by_email(&req.email).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let hash = row.password_hash.clone().unwrap_or_default();
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(UserRow {
                id: row.id,
                email: row.email,
                name: row.name,
                password_hash: None,
            }))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::auth::register::{Register, RegisterRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemUsers {
        rows: Mutex<Vec<UserRow>>,
    }

    #[async_trait]
    impl UserRepository for MemUsers {
        async fn create_user(
            &self,
            email: &str,
            name: &str,
            password_hash: &str,
        ) -> anyhow::Result<UserRow> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.email == email) {
                anyhow::bail!("duplicate email");
            }
            let row = UserRow {
                id: Uuid::new_v4(),
                email: email.into(),
                name: name.into(),
                password_hash: Some(password_hash.into()),
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.email == email)
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok(rows.len() < before)
        }
    }

    #[tokio::test]
    async fn register_then_login_strips_hash() {
        let repo = MemUsers::default();
        let created = Register { repo: &repo }
            .execute(&RegisterRequest {
                email: "kim@example.com".into(),
                name: "kim".into(),
                password: "hunter2!".into(),
            })
            .await
            .unwrap();
        assert!(created.password_hash.is_some());

        let login = Login { repo: &repo };
        let ok = login
            .execute(&LoginRequest {
                email: "kim@example.com".into(),
                password: "hunter2!".into(),
            })
            .await
            .unwrap()
            .expect("valid credentials");
        assert_eq!(ok.email, "kim@example.com");
        assert!(ok.password_hash.is_none());

        let bad = login
            .execute(&LoginRequest {
                email: "kim@example.com".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap();
        assert!(bad.is_none());
    }
}
