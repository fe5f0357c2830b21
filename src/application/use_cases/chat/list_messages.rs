use crate::application::ports::message_repository::MessageRepository;
use crate::domain::chat::message::Message;

pub struct ListMessages<'a, M: MessageRepository + ?Sized> {
    pub messages: &'a M,
}

impl<'a, M: MessageRepository + ?Sized> ListMessages<'a, M> {
    pub async fn execute(&self, room: &str, limit: i64) -> anyhow::Result<Vec<Message>> {
        self.messages.list_recent(room, limit).await
    }
}
