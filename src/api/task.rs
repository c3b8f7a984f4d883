use serde_json::Value;

use super::helpers::{ok_empty, status_only};
use crate::core::config::AppConfig;
use crate::queue::task_data;
use crate::worker::{TaskOutcome, process_task};

/// Handle a queued task delivered to `POST /task`.
///
/// A replied task answers `200 {}`. A failed one has already been logged and
/// answers a bare 200 so the queue does not redeliver it.
pub async fn handle_task(config: &AppConfig, body: &str) -> Value {
    let data = task_data(body);
    match process_task(config, data.as_deref()).await {
        TaskOutcome::Replied => ok_empty(),
        TaskOutcome::Failed(_) => status_only(200),
    }
}
