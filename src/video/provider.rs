//! Task provider trait and polling extension.

use crate::error::Result;
use crate::video::poll::{poll_until_terminal, PollPolicy};
use crate::video::types::{GenerationRequest, Task};
use async_trait::async_trait;

/// Video provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// ByteDance ModelArk (BytePlus).
    Ark,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ark => write!(f, "ark"),
        }
    }
}

/// A backend that runs asynchronous video generation tasks.
///
/// Every call is a single round trip with no internal retries.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Validates the request and submits a new generation task.
    async fn create_task(&self, request: &GenerationRequest) -> Result<Task>;

    /// Fetches the current state of a task.
    async fn get_task(&self, task_id: &str) -> Result<Task>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ProviderKind::Ark => "ModelArk (BytePlus)",
        }
    }
}

/// Extension trait that layers status polling on top of a provider.
#[async_trait]
pub trait TaskProviderExt: TaskProvider {
    /// Polls `task_id` until it reaches a terminal status.
    async fn wait_for_task(&self, task_id: &str, policy: &PollPolicy) -> Result<Task> {
        poll_until_terminal(task_id, policy, || self.get_task(task_id)).await
    }

    /// Creates a task and waits for it to finish.
    async fn generate(&self, request: &GenerationRequest, policy: &PollPolicy) -> Result<Task> {
        let task = self.create_task(request).await?;
        tracing::debug!(task_id = %task.id, "submitted video generation task");
        self.wait_for_task(&task.id, policy).await
    }
}

impl<T: TaskProvider + ?Sized> TaskProviderExt for T {}
