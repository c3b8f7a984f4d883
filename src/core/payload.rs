//! Deferred task payload encoding.
//!
//! A payload is the standard base64 encoding of one event's JSON form.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::errors::RelayError;
use crate::line::events::Event;

/// Opaque, text-safe form of one serialized event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskPayload(String);

impl TaskPayload {
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// # Errors
///
/// Returns `EncodeError` if the event cannot be serialized.
pub fn encode_event(event: &Event) -> Result<TaskPayload, RelayError> {
    let bytes =
        serde_json::to_vec(event).map_err(|e| RelayError::EncodeError(format!("json: {e}")))?;
    Ok(TaskPayload(STANDARD.encode(bytes)))
}

/// # Errors
///
/// Returns `DecodeError` if `data` is not base64 or does not hold a
/// serialized event.
pub fn decode_event(data: &str) -> Result<Event, RelayError> {
    let bytes = STANDARD.decode(data)?;
    serde_json::from_slice(&bytes).map_err(|e| RelayError::DecodeError(format!("json: {e}")))
}
