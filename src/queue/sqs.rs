use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::types::{MessageAttributeValue, SendMessageBatchRequestEntry};
use tracing::{error, info};

use super::{DeferredTask, TaskQueue};
use crate::errors::RelayError;

/// Maximum entries SQS accepts in one `SendMessageBatch` call.
pub const SQS_BATCH_LIMIT: usize = 10;

/// Message attribute naming the path a task targets.
pub const TARGET_ATTRIBUTE: &str = "target";

pub struct SqsTaskQueue {
    client: SqsClient,
    queue_url: String,
}

impl SqsTaskQueue {
    #[must_use]
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }

    /// Build a queue client from the ambient AWS configuration.
    pub async fn from_env(queue_url: String) -> Self {
        let shared_config = aws_config::from_env().load().await;
        Self::new(SqsClient::new(&shared_config), queue_url)
    }
}

fn target_attribute(task: &DeferredTask) -> Result<MessageAttributeValue, RelayError> {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(&task.path)
        .build()
        .map_err(|e| RelayError::QueueError(format!("message attribute: {e}")))
}

/// Batch entries for one chunk; ids are positions within the whole batch.
pub(crate) fn batch_entries(
    offset: usize,
    chunk: &[DeferredTask],
) -> Result<Vec<SendMessageBatchRequestEntry>, RelayError> {
    chunk
        .iter()
        .enumerate()
        .map(|(i, task)| {
            SendMessageBatchRequestEntry::builder()
                .id((offset + i).to_string())
                .message_body(task.form_body())
                .message_attributes(TARGET_ATTRIBUTE, target_attribute(task)?)
                .build()
                .map_err(|e| RelayError::QueueError(format!("batch entry: {e}")))
        })
        .collect()
}

#[async_trait]
impl TaskQueue for SqsTaskQueue {
    async fn submit(&self, task: &DeferredTask) -> Result<(), RelayError> {
        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(task.form_body())
            .message_attributes(TARGET_ATTRIBUTE, target_attribute(task)?)
            .send()
            .await?;
        Ok(())
    }

    async fn submit_batch(&self, tasks: &[DeferredTask]) -> Result<(), RelayError> {
        for (n, chunk) in tasks.chunks(SQS_BATCH_LIMIT).enumerate() {
            let entries = batch_entries(n * SQS_BATCH_LIMIT, chunk)?;
            let output = self
                .client
                .send_message_batch()
                .queue_url(&self.queue_url)
                .set_entries(Some(entries))
                .send()
                .await?;

            let failed = output.failed();
            if !failed.is_empty() {
                for entry in failed {
                    error!(
                        "SQS rejected task {}: {} {}",
                        entry.id(),
                        entry.code(),
                        entry.message().unwrap_or("")
                    );
                }
                return Err(RelayError::QueueError(format!(
                    "{} of {} tasks rejected by SQS",
                    failed.len(),
                    chunk.len()
                )));
            }
        }
        info!(count = tasks.len(), "Tasks sent to SQS");
        Ok(())
    }
}
