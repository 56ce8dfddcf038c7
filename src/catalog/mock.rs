//! Mock catalog for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogError};
use crate::models::{Book, SearchPage, TitleQuery, WorkDetails};

#[derive(Debug, Clone)]
struct Scripted {
    result: Result<SearchPage, CatalogError>,
    delay: Option<Duration>,
}

/// A catalog that replays scripted responses.
///
/// Search responses are queued per `(title, page)` and consumed in order; an
/// unscripted request answers with an empty page. Every search request is
/// recorded so tests can assert on what was (or was not) sent.
#[derive(Debug, Default)]
pub struct MockCatalog {
    searches: Mutex<HashMap<(String, u32), VecDeque<Scripted>>>,
    details: Mutex<HashMap<String, Result<WorkDetails, CatalogError>>>,
    requests: Mutex<Vec<TitleQuery>>,
}

impl MockCatalog {
    /// Create a new mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page for `(title, page)`.
    pub fn push_page(&self, title: &str, page: u32, items: Vec<Book>) {
        self.push(title, page, Ok(SearchPage::new(items)), None);
    }

    /// Queue a successful page that resolves only after `delay`.
    pub fn push_delayed_page(&self, title: &str, page: u32, items: Vec<Book>, delay: Duration) {
        self.push(title, page, Ok(SearchPage::new(items)), Some(delay));
    }

    /// Queue a failure for `(title, page)`.
    pub fn push_error(&self, title: &str, page: u32, error: CatalogError) {
        self.push(title, page, Err(error), None);
    }

    /// Set the detail response for a key.
    pub fn set_details(&self, key: &str, result: Result<WorkDetails, CatalogError>) {
        let mut guard = self.details.lock().unwrap();
        guard.insert(key.to_string(), result);
    }

    /// All search requests received so far, in order.
    pub fn requests(&self) -> Vec<TitleQuery> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of search requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(
        &self,
        title: &str,
        page: u32,
        result: Result<SearchPage, CatalogError>,
        delay: Option<Duration>,
    ) {
        let mut guard = self.searches.lock().unwrap();
        guard
            .entry((title.to_string(), page))
            .or_default()
            .push_back(Scripted { result, delay });
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &str {
        "Mock Catalog"
    }

    async fn search_by_title(&self, query: &TitleQuery) -> Result<SearchPage, CatalogError> {
        self.requests.lock().unwrap().push(query.clone());

        let scripted = {
            let mut guard = self.searches.lock().unwrap();
            guard
                .get_mut(&(query.title.clone(), query.page))
                .and_then(|queue| queue.pop_front())
        };

        match scripted {
            Some(Scripted { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(SearchPage::default()),
        }
    }

    async fn get_details(&self, key: &str) -> Result<WorkDetails, CatalogError> {
        let guard = self.details.lock().unwrap();
        match guard.get(key) {
            Some(result) => result.clone(),
            None => Err(CatalogError::Status {
                status: 404,
                url: format!("mock://{}", key),
            }),
        }
    }
}

/// Helper function to create a book for testing.
pub fn make_book(key: &str, title: &str) -> Book {
    Book {
        key: key.to_string(),
        title: Some(title.to_string()),
        ..Default::default()
    }
}

/// Helper function to create `count` distinct books whose keys start at `first`.
pub fn make_books(prefix: &str, first: usize, count: usize) -> Vec<Book> {
    (first..first + count)
        .map(|i| make_book(&format!("/works/{}{}W", prefix, i), &format!("{} {}", prefix, i)))
        .collect()
}
