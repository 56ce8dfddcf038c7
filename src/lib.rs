//! # Book Finder
//!
//! Search the Open Library catalog by title, page through the results and
//! inspect a single book in detail.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Book, TitleQuery, SearchPage, etc.)
//! - [`catalog`]: The [`Catalog`] trait, the Open Library client and a mock
//! - [`search`]: Pagination state machine, search sessions, load-more triggers and debouncing
//! - [`ui`]: Terminal rendering of session snapshots
//! - [`utils`]: HTTP client, cover URLs and text layout helpers
//! - [`config`]: Configuration management

pub mod catalog;
pub mod config;
pub mod models;
pub mod search;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, OpenLibraryCatalog};
pub use models::Book;
pub use search::{SearchSession, SearchState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
