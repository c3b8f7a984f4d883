//! Per-task pipeline: decode, classify, reply.
//!
//! Each step either advances the task or ends it in [`TaskOutcome::Failed`]
//! after logging. Nothing here retries.

use tracing::{error, info};

use super::reply::build_reply;
use crate::core::config::AppConfig;
use crate::core::payload::decode_event;
use crate::line::LineClient;

/// Step of the task pipeline at which processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStage {
    /// No usable `data` field.
    Received,
    /// Payload was not base64 or not a serialized event.
    Decoded,
    /// The LINE client could not be built.
    Client,
    /// The reply API call failed.
    Replied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Replied,
    Failed(TaskStage),
}

/// Process one deferred task's `data` field end to end.
pub async fn process_task(config: &AppConfig, data: Option<&str>) -> TaskOutcome {
    let Some(data) = data.filter(|d| !d.is_empty()) else {
        error!("No data");
        return TaskOutcome::Failed(TaskStage::Received);
    };

    let event = match decode_event(data) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to decode task: {}", e);
            return TaskOutcome::Failed(TaskStage::Decoded);
        }
    };

    let client = match LineClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize LINE client: {}", e);
            return TaskOutcome::Failed(TaskStage::Client);
        }
    };

    info!(
        event_type = %event.event_type,
        message = ?event.message,
        "Processing task"
    );
    let reply = build_reply(&event);

    let reply_token = event.reply_token.as_deref().unwrap_or_default();
    if let Err(e) = client.reply_message(reply_token, &[reply]).await {
        error!("Failed to send reply: {}", e);
        return TaskOutcome::Failed(TaskStage::Replied);
    }

    info!("Reply sent");
    TaskOutcome::Replied
}
