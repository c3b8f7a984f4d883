//! Deferred work hand-off between the webhook receiver and the task processor.
//!
//! The receiver only sees [`TaskQueue`]; whether tasks travel through SQS or
//! an in-process channel is decided once at startup.

pub mod local;
pub mod sqs;

use async_trait::async_trait;
use url::form_urlencoded;

use crate::core::payload::TaskPayload;
use crate::errors::RelayError;

pub use local::{LocalTaskQueue, LocalTaskReceiver};
pub use sqs::SqsTaskQueue;

/// Endpoint every deferred task targets.
pub const TASK_PATH: &str = "/task";

/// Form field carrying the encoded event.
pub const DATA_FIELD: &str = "data";

/// One unit of deferred work: a target path and its encoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTask {
    pub path: String,
    pub payload: TaskPayload,
}

impl DeferredTask {
    #[must_use]
    pub fn new(payload: TaskPayload) -> Self {
        Self {
            path: TASK_PATH.to_string(),
            payload,
        }
    }

    /// The `application/x-www-form-urlencoded` body delivered to [`TASK_PATH`].
    #[must_use]
    pub fn form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(DATA_FIELD, self.payload.as_str())
            .finish()
    }
}

/// Extract the `data` field from a task's form body.
#[must_use]
pub fn task_data(form_body: &str) -> Option<String> {
    form_urlencoded::parse(form_body.as_bytes())
        .find(|(key, _)| key == DATA_FIELD)
        .map(|(_, value)| value.into_owned())
}

#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// # Errors
    ///
    /// Returns `QueueError` if the task could not be handed to the queue.
    async fn submit(&self, task: &DeferredTask) -> Result<(), RelayError>;

    /// Submit tasks in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first `submit` error; tasks before it stay enqueued.
    async fn submit_batch(&self, tasks: &[DeferredTask]) -> Result<(), RelayError> {
        for task in tasks {
            self.submit(task).await?;
        }
        Ok(())
    }
}
