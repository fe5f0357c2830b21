use crate::application::ports::user_repository::{UserRepository, UserRow};

/// Re-fetch of the authoritative user record for a session, keyed by email.
/// Callers treat `Ok(None)` and `Err` the same way: proceed unattached.
pub struct CurrentUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> CurrentUser<'a, R> {
    pub async fn execute(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let row = self.repo.find_by_email(email).await?;
        Ok(row.map(|r| UserRow {
            id: r.id,
            email: r.email,
            name: r.name,
            password_hash: None,
        }))
    }
}
