//! Request validation against provider-accepted constraints.
//!
//! Runs before any network call. Checks are ordered and stop at the first
//! violation: non-empty content, presence of a text item, per-item rules in
//! list order, then request options.

use crate::error::{truncate_chars, Result, VidGenError};
use crate::video::types::{ContentItem, GenerationRequest};

/// Maximum prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Durations (in seconds) the provider accepts.
pub const VALID_DURATIONS: [u32; 3] = [4, 8, 12];

/// How much of an offending URL is echoed back in error messages.
const URL_PREVIEW_CHARS: usize = 64;

/// Validates a content list, returning it unchanged on success.
pub fn validate_content(content: &[ContentItem]) -> Result<&[ContentItem]> {
    if content.is_empty() {
        return Err(VidGenError::InvalidParameter(
            "content cannot be empty".into(),
        ));
    }

    if !content.iter().any(ContentItem::is_text) {
        return Err(VidGenError::InvalidParameter(
            "content must contain at least one text item".into(),
        ));
    }

    for item in content {
        match item {
            ContentItem::Text { value } => validate_text(value)?,
            ContentItem::ImageRef { url } => validate_image_url(url)?,
        }
    }

    Ok(content)
}

/// Validates a full request: its content first, then its options.
pub fn validate_request(request: &GenerationRequest) -> Result<&GenerationRequest> {
    validate_content(&request.content)?;

    if let Some(duration) = request.duration_secs {
        if !VALID_DURATIONS.contains(&duration) {
            return Err(VidGenError::InvalidParameter(format!(
                "duration must be 4, 8, or 12 seconds, current value: {duration}"
            )));
        }
    }

    Ok(request)
}

fn validate_text(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VidGenError::InvalidParameter(
            "text prompt cannot be empty".into(),
        ));
    }

    let length = value.chars().count();
    if length > MAX_PROMPT_CHARS {
        return Err(VidGenError::InvalidParameter(format!(
            "text prompt length cannot exceed {MAX_PROMPT_CHARS} characters, current length: {length}"
        )));
    }

    Ok(())
}

fn validate_image_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    Err(VidGenError::InvalidParameter(format!(
        "image url must be a valid HTTP/HTTPS URL: {}",
        truncate_chars(url, URL_PREVIEW_CHARS)
    )))
}
