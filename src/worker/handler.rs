use futures::future::join_all;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::process::{TaskOutcome, process_task};
use crate::core::config::AppConfig;
use crate::queue::task_data;

/// Bodies of every record in an SQS event, in delivery order.
#[must_use]
pub fn record_bodies(payload: &Value) -> Vec<&str> {
    payload
        .get("Records")
        .and_then(|records| records.as_array())
        .map(|records| {
            records
                .iter()
                .filter_map(|record| record.get("body").and_then(|b| b.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

/// Lambda handler for the Worker entrypoint. Runs each SQS record as an independent task.
///
/// Failed tasks are logged and acknowledged; redelivery is never requested.
///
/// # Errors
///
/// Never fails today; the `Result` matches the Lambda runtime contract.
pub async fn function_handler(config: &AppConfig, event: LambdaEvent<Value>) -> Result<(), Error> {
    let bodies = record_bodies(&event.payload);
    if bodies.is_empty() {
        warn!("Worker Lambda received an event without SQS records");
        return Ok(());
    }
    info!(records = bodies.len(), "Worker Lambda received SQS batch");

    let outcomes = join_all(bodies.iter().map(|body| async move {
        let data = task_data(body);
        process_task(config, data.as_deref()).await
    }))
    .await;

    let failed: Vec<_> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            TaskOutcome::Failed(stage) => Some(*stage),
            TaskOutcome::Replied => None,
        })
        .collect();
    if !failed.is_empty() {
        error!(
            failed = failed.len(),
            total = outcomes.len(),
            stages = ?failed,
            "Some tasks were not replied"
        );
    }

    Ok(())
}
