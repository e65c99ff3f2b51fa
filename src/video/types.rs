//! Core types for video generation tasks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One atomic unit of a generation request's payload.
///
/// Order is significant: text items precede image items when a request is
/// assembled from a prompt and an optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    /// A text prompt.
    Text {
        /// Prompt text, sent verbatim.
        value: String,
    },
    /// A reference image (for image-to-video).
    ImageRef {
        /// Absolute HTTP/HTTPS URL of the image.
        url: String,
    },
}

impl ContentItem {
    /// Creates a text item.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Creates an image reference item.
    pub fn image(url: impl Into<String>) -> Self {
        Self::ImageRef { url: url.into() }
    }

    /// Returns true for text items.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// A request to generate a video.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationRequest {
    /// Content items in the order they are sent to the provider.
    pub content: Vec<ContentItem>,
    /// Desired video duration in seconds (4, 8 or 12).
    pub duration_secs: Option<u32>,
    /// Whether the provider should also generate an audio track.
    pub generate_audio: Option<bool>,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(prompt)],
            duration_secs: None,
            generate_audio: None,
        }
    }

    /// Creates a request from an already-shaped content list.
    pub fn from_content(content: Vec<ContentItem>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Appends a reference image for image-to-video generation.
    ///
    /// Blank URLs are treated as absent.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.content.push(ContentItem::ImageRef { url });
        }
        self
    }

    /// Sets the desired video duration in seconds.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Enables or disables audio generation.
    pub fn with_audio(mut self, generate_audio: bool) -> Self {
        self.generate_audio = Some(generate_audio);
        self
    }

    /// Returns the first text item, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.content.iter().find_map(|item| match item {
            ContentItem::Text { value } => Some(value.as_str()),
            ContentItem::ImageRef { .. } => None,
        })
    }
}

/// Lifecycle state of a provider task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Accepted and waiting to run (`queued` / `pending`).
    #[default]
    Pending,
    /// Generation in progress (`running` / `processing`).
    Running,
    /// Finished with a result.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
    /// A status string this client does not recognize.
    Unknown(String),
}

impl TaskStatus {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true if the task can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Returns true for statuses this client knows how to interpret.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" => Self::Pending,
            "running" | "processing" => Self::Running,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a succeeded task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskResult {
    /// Download URL of the generated video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Any other fields the provider returns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error details of a failed task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFailure {
    /// Provider error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Provider error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (None, Some(message)) => f.write_str(message),
            (Some(code), None) => f.write_str(code),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

/// A provider task, as last reported by the provider.
///
/// The provider is the system of record; a `Task` is a snapshot that is
/// re-fetched on every query and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque provider-issued identifier.
    pub id: String,
    /// Model that runs the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Current status. A bare create response defaults to `pending`.
    #[serde(default)]
    pub status: TaskStatus,
    /// Creation time (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Last update time (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Generated output; only present when the task succeeded.
    #[serde(
        default,
        rename(serialize = "result", deserialize = "content"),
        alias = "result",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<TaskResult>,
    /// Failure details; only present when the task failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskFailure>,
    /// Other fields echoed back by the provider.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Drops `result`/`error` when they contradict the status.
    pub fn normalized(mut self) -> Self {
        if self.status != TaskStatus::Succeeded {
            self.result = None;
        }
        if self.status != TaskStatus::Failed {
            self.error = None;
        }
        self
    }

    /// Returns true if the task reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the generated video URL, if the task succeeded.
    pub fn video_url(&self) -> Option<&str> {
        self.result.as_ref()?.video_url.as_deref()
    }
}
