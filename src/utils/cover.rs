//! Cover image URL resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Open Library cover service root for numeric cover ids
pub const COVERS_BASE_URL: &str = "https://covers.openlibrary.org/b/id";

/// Asset shown when a book has no cover id
pub const PLACEHOLDER_COVER: &str = "/book-placeholder.png";

/// Cover size variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSize {
    /// Thumbnail used on result cards
    Medium,
    /// Large image used in the detail view
    Large,
}

impl CoverSize {
    /// Size suffix understood by the cover service
    pub fn suffix(self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Result of resolving a cover id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoverImage {
    Url(String),
    Placeholder,
}

impl CoverImage {
    /// URL of the image, `None` for the placeholder
    pub fn url(&self) -> Option<&str> {
        match self {
            CoverImage::Url(url) => Some(url),
            CoverImage::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CoverImage::Placeholder)
    }
}

impl fmt::Display for CoverImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverImage::Url(url) => f.write_str(url),
            CoverImage::Placeholder => f.write_str(PLACEHOLDER_COVER),
        }
    }
}

/// Builds cover URLs against a configurable cover host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverResolver {
    base_url: String,
}

impl Default for CoverResolver {
    fn default() -> Self {
        Self::new(COVERS_BASE_URL)
    }
}

impl CoverResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{id}-{size}.jpg`, or the placeholder when `cover_id` is absent
    pub fn resolve(&self, cover_id: Option<u64>, size: CoverSize) -> CoverImage {
        match cover_id {
            Some(id) => CoverImage::Url(format!("{}/{}-{}.jpg", self.base_url, id, size.suffix())),
            None => CoverImage::Placeholder,
        }
    }
}

/// Resolve against the public cover service
pub fn cover_url(cover_id: Option<u64>, size: CoverSize) -> CoverImage {
    CoverResolver::default().resolve(cover_id, size)
}
