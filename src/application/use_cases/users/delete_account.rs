use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;

pub struct DeleteAccount<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteAccount<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<bool> {
        self.repo.delete_user(id).await
    }
}
