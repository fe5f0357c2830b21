use crate::application::ports::message_repository::MessageRepository;
use crate::application::ports::relay_port::{RelayEvent, RelayPort};
use crate::domain::chat::message::Message;
use crate::domain::users::user::UserSnapshot;

pub struct PostMessage<'a, M: MessageRepository + ?Sized, P: RelayPort + ?Sized> {
    pub messages: &'a M,
    pub relay: &'a P,
}

impl<'a, M: MessageRepository + ?Sized, P: RelayPort + ?Sized> PostMessage<'a, M, P> {
    /// Persists first, then fans out. A relay failure is not an error for
    /// the sender; the message is already durable.
    pub async fn execute(
        &self,
        sender: &UserSnapshot,
        room: &str,
        body: &str,
    ) -> anyhow::Result<Message> {
        let msg = self
            .messages
            .append(room, sender.id, &sender.name, body)
            .await?;
        let event = RelayEvent::Message {
            room: msg.room.clone(),
            sender: msg.sender_name.clone(),
            body: msg.body.clone(),
            sent_at: msg.sent_at,
        };
        if let Err(e) = self.relay.publish(room, event).await {
            tracing::warn!(room, error = %e, "relay_publish_failed");
        }
        Ok(msg)
    }
}
