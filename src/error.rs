//! Error types for video task orchestration.

use std::time::Duration;

/// Maximum length of a provider-supplied message surfaced to callers.
const MAX_MESSAGE_CHARS: usize = 500;

/// Errors that can occur while submitting or querying a generation task.
///
/// Each variant is assigned once, at the boundary nearest to its cause:
/// the validator raises `InvalidParameter`, the provider client raises the
/// rest. Callers never re-classify.
#[derive(Debug, thiserror::Error)]
pub enum VidGenError {
    /// The request violated a provider-accepted constraint.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The provider was unreachable or answered with a non-2xx status.
    #[error("provider connection failed: {0}")]
    ConnectionFailure(String),

    /// An outbound call (or a poll loop) exceeded its time budget.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered but the result could not be interpreted,
    /// or polling could not reach a usable terminal state.
    #[error("video generation failed: {0}")]
    GenerationFailure(String),
}

impl VidGenError {
    /// Returns true if this error is likely transient and worth retrying.
    ///
    /// Only idempotent reads should act on this; task creation is never
    /// retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailure(_) | Self::Timeout(_))
    }

    /// Short machine-friendly name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::ConnectionFailure(_) => "connection_failure",
            Self::Timeout(_) => "timeout",
            Self::GenerationFailure(_) => "generation_failure",
        }
    }
}

/// Result type alias for task operations.
pub type Result<T> = std::result::Result<T, VidGenError>;

/// Fatal startup errors: missing or malformed configuration.
///
/// These never reach the HTTP surface; the process refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A setting is present but unusable.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Normalizes a provider error body into a short human-readable message.
///
/// Ark wraps failures as `{"error": {"code": .., "message": ..}}`; when the
/// body has that shape only the message (prefixed by the code) is kept.
/// Anything else is trimmed and truncated on a char boundary.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let extracted = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|body| {
            let error = body.get("error")?;
            let message = error.get("message")?.as_str()?.to_string();
            match error.get("code").and_then(|c| c.as_str()) {
                Some(code) => Some(format!("{code}: {message}")),
                None => Some(message),
            }
        });

    let text = extracted.as_deref().unwrap_or(text).trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    truncate_chars(text, MAX_MESSAGE_CHARS)
}

/// Truncates to at most `max` characters, appending an ellipsis when cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
