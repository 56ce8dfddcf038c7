//! Book catalog clients.
//!
//! This module defines the [`Catalog`] trait the search session depends on.
//! [`OpenLibraryCatalog`] talks to the public Open Library API, and
//! [`MockCatalog`] replays scripted pages for tests.
//!
//! Both operations are read-only GETs. Clients never retry: a failed request is
//! reported once and the caller decides whether to try again.

mod mock;
mod open_library;

pub use mock::{make_book, make_books, MockCatalog};
pub use open_library::{OpenLibraryCatalog, OPEN_LIBRARY_BASE_URL};

use crate::models::{SearchPage, TitleQuery, WorkDetails};
use async_trait::async_trait;

/// Read-only access to a book catalog.
///
/// Implementations are injected into [`crate::search::SearchSession`], which is
/// how tests substitute [`MockCatalog`] for the network client.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this catalog
    fn name(&self) -> &str;

    /// Search books by title, one page at a time
    async fn search_by_title(&self, query: &TitleQuery) -> Result<SearchPage, CatalogError>;

    /// Fetch the work record for a single book key
    async fn get_details(&self, key: &str) -> Result<WorkDetails, CatalogError>;
}

/// Errors that can occur when talking to a catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog answered with a non-success status
    #[error("API error: status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(format!("JSON: {}", err))
    }
}
