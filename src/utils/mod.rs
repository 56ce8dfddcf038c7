//! Utility modules supporting catalog access and rendering.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and user agent
//! - [`CoverResolver`] / [`cover_url`]: cover image URLs for a cover id
//! - [`truncate_with_ellipsis`], [`truncate_at_word`], [`wrap_text`]: width-aware text layout
//!
//! # Cover URLs
//!
//! ```rust
//! use book_finder::utils::{cover_url, CoverSize};
//!
//! let thumb = cover_url(Some(8_739_161), CoverSize::Medium);
//! assert_eq!(thumb.to_string(), "https://covers.openlibrary.org/b/id/8739161-M.jpg");
//! assert!(cover_url(None, CoverSize::Large).is_placeholder());
//! ```

mod cover;
mod display;
mod http;

pub use cover::{
    cover_url, CoverImage, CoverResolver, CoverSize, COVERS_BASE_URL, PLACEHOLDER_COVER,
};
pub use display::{
    book_table_columns, terminal_dimensions, truncate_at_word, truncate_with_ellipsis, wrap_text,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
pub use http::{HttpClient, DEFAULT_TIMEOUT};
