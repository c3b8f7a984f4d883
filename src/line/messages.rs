//! Outbound LINE message payloads.

use serde::{Deserialize, Serialize};

/// A message that can be sent back to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SendMessage {
    Text { text: String },
}

impl SendMessage {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        SendMessage::Text { text: text.into() }
    }
}

/// Body of `POST /v2/bot/message/reply`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessageRequest<'a> {
    pub reply_token: &'a str,
    pub messages: &'a [SendMessage],
    pub notification_disabled: bool,
}

/// Error body returned by the Messaging API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
    pub property: Option<String>,
}

impl ApiErrorBody {
    /// One-line description: the top-level message followed by each
    /// `property: message` detail. `None` when the body carries neither.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let details: Vec<String> = self
            .details
            .iter()
            .filter_map(|d| match (&d.property, &d.message) {
                (Some(property), Some(message)) => Some(format!("{property}: {message}")),
                (None, Some(message)) => Some(message.clone()),
                (Some(property), None) => Some(property.clone()),
                (None, None) => None,
            })
            .collect();

        match (&self.message, details.is_empty()) {
            (Some(message), true) => Some(message.clone()),
            (Some(message), false) => Some(format!("{message} ({})", details.join(", "))),
            (None, false) => Some(details.join(", ")),
            (None, true) => None,
        }
    }
}
