//! Video generation tasks: validation, payloads, providers and polling.

pub mod payload;
mod poll;
mod provider;
pub mod providers;
mod types;
pub mod validate;

pub use poll::{poll_until_terminal, PollPolicy, MIN_INTERVAL};
pub use provider::{ProviderKind, TaskProvider, TaskProviderExt};
pub use types::{
    ContentItem, GenerationRequest, Task, TaskFailure, TaskResult, TaskStatus,
};
