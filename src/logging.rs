//! Tracing subscriber setup.

use crate::config::Settings;
use tracing_subscriber::EnvFilter;

/// Builds the log filter: `RUST_LOG` wins, otherwise `LOG_LEVEL`.
///
/// Outside development, chatty HTTP internals are limited to warnings.
pub fn env_filter(settings: &Settings) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = settings.log_level.to_ascii_lowercase();
    if !settings.is_dev() {
        directives.push_str(",hyper=warn,reqwest=warn");
    }
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Development gets human-readable output; every other environment emits
/// one JSON object per line. Calling this twice is a no-op.
pub fn init(settings: &Settings) {
    let filter = env_filter(settings);

    let result = if settings.is_dev() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
