#![warn(missing_docs)]
//! vidgen - asynchronous video generation tasks behind a small HTTP API.
//!
//! A caller submits a text prompt (optionally with a first-frame image), gets
//! back a provider task id, and later queries the task until it finishes.
//! The provider is the system of record; nothing is persisted locally.
//!
//! # Quick Start - Library
//!
//! ```no_run
//! use vidgen::{ArkProvider, GenerationRequest, PollPolicy, TaskProvider, TaskProviderExt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ArkProvider::builder()
//!         .api_key("ark-key")
//!         .model("ep-20260129105436-445p4")
//!         .build()?;
//!
//!     let request = GenerationRequest::new("A cute cat playing on the grass")
//!         .with_image_url("https://example.com/cat.jpg")
//!         .with_duration(8);
//!     let task = provider.create_task(&request).await?;
//!
//!     let done = provider.wait_for_task(&task.id, &PollPolicy::default()).await?;
//!     println!("{}: {:?}", done.status, done.video_url());
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Server
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidgen::server::{serve, shutdown_signal, AppState};
//! use vidgen::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     vidgen::logging::init(&settings);
//!
//!     let state = AppState::new(Arc::new(settings.ark_provider()?));
//!     let listener = tokio::net::TcpListener::bind(settings.listen_addr()).await?;
//!     serve(listener, state, shutdown_signal()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `ark`: ModelArk (BytePlus / ByteDance Seedance) provider
//! - `server`: axum HTTP API
//! - `cli`: `vidgen` command-line binary

pub mod config;
mod error;
pub mod logging;
pub mod video;

#[cfg(feature = "server")]
pub mod server;

// Re-export error types at crate root
pub use error::{ConfigError, Result, VidGenError};

pub use config::Settings;

pub use video::{
    ContentItem, GenerationRequest, PollPolicy, ProviderKind, Task, TaskFailure, TaskProvider,
    TaskProviderExt, TaskResult, TaskStatus,
};

#[cfg(feature = "ark")]
pub use video::providers::{ArkProvider, ArkProviderBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, VidGenError};
    pub use crate::video::{
        GenerationRequest, PollPolicy, Task, TaskProvider, TaskProviderExt, TaskStatus,
    };

    #[cfg(feature = "ark")]
    pub use crate::video::providers::ArkProvider;
}
