//! Conversion of content items into the provider's content-array format.

use crate::video::types::ContentItem;
use serde::{Deserialize, Serialize};

/// One element of the provider's `content` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// `{"type": "text", "text": ...}`
    Text {
        /// Prompt text.
        text: String,
    },
    /// `{"type": "image_url", "image_url": {"url": ...}}`
    ImageUrl {
        /// Wrapped image location.
        image_url: ImageUrl,
    },
}

/// Image location wrapper used by [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Absolute image URL.
    pub url: String,
}

impl From<&ContentItem> for ContentPart {
    fn from(item: &ContentItem) -> Self {
        match item {
            ContentItem::Text { value } => Self::Text {
                text: value.clone(),
            },
            ContentItem::ImageRef { url } => Self::ImageUrl {
                image_url: ImageUrl { url: url.clone() },
            },
        }
    }
}

/// Builds the provider payload, preserving item count and order.
///
/// Expects content that already passed validation.
pub fn build_payload(content: &[ContentItem]) -> Vec<ContentPart> {
    content.iter().map(ContentPart::from).collect()
}
