//! Media Entry Model

use serde::{Deserialize, Serialize};

/// Kind of a media asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single media entry owned by a product, an inline SKU, or a variant.
///
/// `url` is the durable path returned by the media store, relative to the
/// deployment's public media prefix. Entries are never shared between owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub position: i32,
}

impl Media {
    /// Media entry for a freshly stored file, appended at the given position.
    pub fn for_stored_file(url: String, alt: impl Into<String>, position: i32) -> Self {
        Self {
            url,
            alt: alt.into(),
            kind: MediaKind::Image,
            position,
        }
    }
}
