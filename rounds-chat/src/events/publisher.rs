use rounds_shared::clients::rabbitmq::RabbitMqClient;
use rounds_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Message;

const PREVIEW_LEN: usize = 80;

/// First 80 characters of the content, for event consumers that only need a
/// glimpse.
fn content_preview(content: &str) -> String {
    content.chars().take(PREVIEW_LEN).collect()
}

pub async fn publish_message_sent(rabbitmq: &RabbitMqClient, message: &Message) {
    let preview = content_preview(&message.content);

    let mut event = Event::new(
        "rounds-chat",
        routing_keys::CHAT_MESSAGE_SENT,
        payloads::MessageSent {
            message_id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            content_preview: preview,
        },
    );
    if let Some(sender_id) = message.sender_id {
        event = event.with_profile(sender_id);
    }

    if let Err(e) = rabbitmq.publish(routing_keys::CHAT_MESSAGE_SENT, &event).await {
        tracing::error!(error = %e, message_id = %message.id, "failed to publish message.sent event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_characters() {
        let short = "hello";
        assert_eq!(content_preview(short), "hello");

        let long = "x".repeat(200);
        assert_eq!(content_preview(&long).chars().count(), PREVIEW_LEN);

        // Truncation never splits a multibyte character.
        let multibyte = "é".repeat(200);
        assert_eq!(content_preview(&multibyte).chars().count(), PREVIEW_LEN);
    }
}
