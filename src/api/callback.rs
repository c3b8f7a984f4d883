//! Webhook receiver for `POST /callback`.
//!
//! Verifies the LINE signature, splits the delivery into events and defers
//! each one to the task queue. No reply is sent from here.

use serde_json::Value;
use tracing::{error, info};

use super::helpers::{err_response, ok_empty};
use super::parsing::get_header_value;
use super::signature::{SIGNATURE_HEADER, verify_line_signature};
use super::state::ApiState;
use crate::core::payload::encode_event;
use crate::errors::RelayError;
use crate::line::events::{Event, parse_webhook_body};
use crate::queue::{DeferredTask, TaskQueue};

/// Encode every event into a task, in arrival order.
///
/// # Errors
///
/// Returns the first `EncodeError`; no tasks are produced in that case.
pub fn build_tasks(events: &[Event]) -> Result<Vec<DeferredTask>, RelayError> {
    events
        .iter()
        .map(|event| encode_event(event).map(DeferredTask::new))
        .collect()
}

/// Defer one task per event. Returns how many tasks were submitted.
///
/// # Errors
///
/// Returns `EncodeError` if any event fails to serialize (nothing is
/// enqueued), or the queue's error if submission fails.
pub async fn enqueue_events(queue: &dyn TaskQueue, events: &[Event]) -> Result<usize, RelayError> {
    let tasks = build_tasks(events)?;
    if tasks.is_empty() {
        return Ok(0);
    }
    queue.submit_batch(&tasks).await?;
    Ok(tasks.len())
}

/// Handle a webhook delivery.
///
/// Returns 400 for a missing or invalid signature and 500 for a body that is
/// not a webhook document. Everything after that answers 200.
pub async fn handle_callback(state: &ApiState, headers: &Value, body: &str) -> Value {
    let Some(signature) = get_header_value(headers, SIGNATURE_HEADER) else {
        error!("Missing x-line-signature header");
        return err_response(400, "Missing x-line-signature header");
    };

    if !verify_line_signature(body, signature, &state.config.channel_secret) {
        return err_response(400, "Invalid signature");
    }

    let webhook = match parse_webhook_body(body) {
        Ok(webhook) => webhook,
        Err(e) => {
            error!("{}", e);
            return err_response(500, "Invalid webhook body");
        }
    };

    info!(
        destination = %webhook.destination,
        events = webhook.events.len(),
        "Webhook verified"
    );

    match enqueue_events(state.queue.as_ref(), &webhook.events).await {
        Ok(count) => info!(count, "Tasks enqueued"),
        Err(e) => error!("Failed to enqueue tasks: {}", e),
    }

    ok_empty()
}
