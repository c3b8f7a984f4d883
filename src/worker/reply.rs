use crate::line::events::{Event, EventMessage};
use crate::line::messages::SendMessage;

/// Reply sent for any message that is not plain text.
pub const UNSUPPORTED_MESSAGE_REPLY: &str = "未対応です。。。";

/// Build the reply for an event: echo text, fall back for everything else.
#[must_use]
pub fn build_reply(event: &Event) -> SendMessage {
    match &event.message {
        Some(EventMessage::Text(message)) => SendMessage::text(message.text.clone()),
        Some(
            EventMessage::Image(_)
            | EventMessage::Video(_)
            | EventMessage::Audio(_)
            | EventMessage::File(_)
            | EventMessage::Location(_)
            | EventMessage::Sticker(_)
            | EventMessage::Unsupported,
        )
        | None => SendMessage::text(UNSUPPORTED_MESSAGE_REPLY),
    }
}
