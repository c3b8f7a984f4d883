use async_trait::async_trait;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::debug;

use super::{DeferredTask, TaskQueue};
use crate::errors::RelayError;

/// In-process queue backed by an unbounded tokio channel.
///
/// Tasks only move when a [`LocalTaskReceiver`] is driven, so this queue is
/// for tests and local harnesses, never for a Lambda deployment.
#[derive(Debug, Clone)]
pub struct LocalTaskQueue {
    sender: mpsc::UnboundedSender<DeferredTask>,
}

/// Consuming side of a [`LocalTaskQueue`].
#[derive(Debug)]
pub struct LocalTaskReceiver {
    receiver: mpsc::UnboundedReceiver<DeferredTask>,
}

impl LocalTaskQueue {
    #[must_use]
    pub fn channel() -> (Self, LocalTaskReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, LocalTaskReceiver { receiver })
    }
}

#[async_trait]
impl TaskQueue for LocalTaskQueue {
    async fn submit(&self, task: &DeferredTask) -> Result<(), RelayError> {
        self.sender
            .send(task.clone())
            .map_err(|_| RelayError::QueueError("local task worker has stopped".to_string()))?;
        debug!(path = %task.path, "Task queued locally");
        Ok(())
    }
}

impl LocalTaskReceiver {
    /// Take a task that is already queued without waiting.
    pub fn try_recv(&mut self) -> Option<DeferredTask> {
        self.receiver.try_recv().ok()
    }

    /// Drive every task through `handler` until all queue handles are dropped.
    pub async fn run<F, Fut>(mut self, mut handler: F)
    where
        F: FnMut(DeferredTask) -> Fut,
        Fut: Future<Output = ()>,
    {
        while let Some(task) = self.receiver.recv().await {
            handler(task).await;
        }
        debug!("Local task queue closed");
    }
}
