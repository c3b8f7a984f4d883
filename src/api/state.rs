//! Process-wide state shared by every API invocation.

use std::sync::Arc;
use tracing::info;

use crate::core::config::AppConfig;
use crate::errors::RelayError;
use crate::queue::{SqsTaskQueue, TaskQueue};

/// Configuration and queue handle, built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<AppConfig>,
    pub queue: Arc<dyn TaskQueue>,
}

impl ApiState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, queue: Arc<dyn TaskQueue>) -> Self {
        Self { config, queue }
    }

    /// Build the Lambda's state on top of the SQS task queue.
    ///
    /// Lambda freezes the environment once a response is returned, so work
    /// cannot be left running in-process; a durable queue is required.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `TASK_QUEUE_URL` is not set.
    pub async fn from_config(config: AppConfig) -> Result<Self, RelayError> {
        let queue_url = config.task_queue_url.clone().ok_or_else(|| {
            RelayError::ConfigError("TASK_QUEUE_URL is not set".to_string())
        })?;

        info!(queue_url = %queue_url, "Using SQS task queue");
        let queue = SqsTaskQueue::from_env(queue_url).await;
        Ok(Self::new(Arc::new(config), Arc::new(queue)))
    }
}
