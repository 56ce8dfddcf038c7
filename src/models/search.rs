//! Search request and response models.

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A single title search request against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleQuery {
    /// Free-text title
    pub title: String,

    /// 1-based page number
    pub page: u32,

    /// Maximum number of documents per page
    pub limit: usize,
}

impl Default for TitleQuery {
    fn default() -> Self {
        Self {
            title: String::new(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TitleQuery {
    /// Create a query for the first page
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the page number
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Whether the title is blank after trimming
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Documents in arrival order
    #[serde(default, rename = "docs")]
    pub items: Vec<Book>,

    /// Total number of matches reported by the catalog.
    ///
    /// Informational only: pagination never consults it.
    #[serde(default, rename = "numFound", skip_serializing_if = "Option::is_none")]
    pub num_found: Option<u64>,
}

impl SearchPage {
    /// Create a page from a list of books
    pub fn new(items: Vec<Book>) -> Self {
        Self {
            items,
            num_found: None,
        }
    }

    /// Whether another page is likely to exist.
    ///
    /// A full page is taken to mean more results follow. This is a heuristic:
    /// a short page with more remaining, or a full final page, both give the
    /// wrong answer.
    pub fn is_full(&self, limit: usize) -> bool {
        self.items.len() == limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_query_builder() {
        let q = TitleQuery::new("dune").page(3).limit(100);
        assert_eq!(q.title, "dune");
        assert_eq!(q.page, 3);
        assert_eq!(q.limit, 100);
    }

    #[test]
    fn test_title_query_blank() {
        assert!(TitleQuery::new("   \t").is_blank());
        assert!(TitleQuery::new("").is_blank());
        assert!(!TitleQuery::new(" 1984 ").is_blank());
    }

    #[test]
    fn test_search_page_missing_docs() {
        let page: SearchPage = serde_json::from_str(r#"{"numFound": 0}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.num_found, Some(0));
    }

    #[test]
    fn test_is_full_is_exact_equality() {
        let books = |n: usize| (0..n).map(|i| Book::new(format!("/works/OL{}W", i))).collect();

        assert!(SearchPage::new(books(20)).is_full(20));
        assert!(!SearchPage::new(books(19)).is_full(20));
        assert!(!SearchPage::new(books(20)).is_full(100));
        assert!(!SearchPage::new(Vec::new()).is_full(20));
    }
}
