//! Search and pagination state machine.
//!
//! [`SearchMachine`] is synchronous and does no I/O. Each entry point either
//! refuses (returns `None`) or hands back a [`FetchTicket`] describing the
//! request to issue. The caller performs the fetch and feeds the result back
//! through [`SearchMachine::complete`], which applies it only if the ticket is
//! still the one the machine is waiting for.

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::CatalogError;
use crate::models::{Book, SearchPage, TitleQuery};

/// Message shown to the user for any failed fetch
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch books. Please try again.";

/// Coarse lifecycle of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    /// No search has completed yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed
    Failed,
}

/// Immutable snapshot of a search session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    /// Active query: the one the accumulated results belong to
    pub query: Option<String>,

    /// Last page requested for the active query, starting at 1
    pub page: u32,

    /// Accumulated results in arrival order
    pub results: Vec<Book>,

    /// A fetch is in flight
    pub loading: bool,

    /// User-facing error of the last fetch
    pub error: Option<String>,

    /// Whether the last page was full
    pub has_more: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: None,
            page: 1,
            results: Vec::new(),
            loading: false,
            error: None,
            has_more: false,
        }
    }
}

impl SearchState {
    pub fn phase(&self) -> SearchPhase {
        if self.loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Failed
        } else if self.query.is_some() {
            SearchPhase::Loaded
        } else {
            SearchPhase::Idle
        }
    }

    /// A search completed successfully and found nothing
    pub fn is_empty_result(&self) -> bool {
        self.phase() == SearchPhase::Loaded && self.results.is_empty()
    }

    /// Whether `load_more` would currently issue a request
    pub fn can_load_more(&self) -> bool {
        !self.loading && self.has_more && self.query.is_some()
    }
}

/// Whether a fetch starts a new search or continues the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    NewSearch,
    Continuation,
}

/// A request issued by the machine, tagged so its response can be matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
    query: TitleQuery,
}

impl FetchTicket {
    /// The catalog request to perform
    pub fn query(&self) -> &TitleQuery {
        &self.query
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// What happened to a search entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Preconditions not met; nothing was requested
    Skipped,
    /// The page was applied
    Loaded { returned: usize },
    /// The fetch failed and the error was recorded
    Failed,
    /// A newer request superseded this one; the response was discarded
    Stale,
}

/// Owns a [`SearchState`] and enforces its transitions
#[derive(Debug, Clone)]
pub struct SearchMachine {
    state: SearchState,
    page_size: usize,
    generation: u64,
    in_flight: Option<FetchTicket>,
}

impl SearchMachine {
    /// Create an idle machine. `page_size` is sent as the request limit and
    /// is the value a page is compared against to decide `has_more`.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: SearchState::default(),
            page_size: page_size.max(1),
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Start a new search for `query`.
    ///
    /// Returns `None` for a blank query and leaves the state untouched.
    /// Otherwise any in-flight request is superseded.
    pub fn begin_search(&mut self, query: &str) -> Option<FetchTicket> {
        let title = query.trim();
        if title.is_empty() {
            return None;
        }

        self.generation += 1;

        if self.state.query.as_deref() != Some(title) {
            self.state.results.clear();
            self.state.has_more = false;
        }
        self.state.loading = true;
        self.state.error = None;
        self.state.page = 1;

        let ticket = FetchTicket {
            generation: self.generation,
            kind: FetchKind::NewSearch,
            query: TitleQuery::new(title).page(1).limit(self.page_size),
        };
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Request the next page of the active query.
    ///
    /// Returns `None` while loading, when the last page was short, or before
    /// any search has succeeded.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if !self.state.can_load_more() {
            return None;
        }
        let title = self.state.query.clone()?;

        self.state.loading = true;
        self.state.error = None;
        self.state.page += 1;

        let ticket = FetchTicket {
            generation: self.generation,
            kind: FetchKind::Continuation,
            query: TitleQuery::new(title)
                .page(self.state.page)
                .limit(self.page_size),
        };
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Apply the response for `ticket`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<SearchPage, CatalogError>,
    ) -> FetchOutcome {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                title = %ticket.query.title,
                page = ticket.query.page,
                "Discarding stale search response"
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        self.state.loading = false;

        match (ticket.kind, result) {
            (FetchKind::NewSearch, Ok(page)) => {
                let returned = page.items.len();
                self.state.has_more = page.is_full(self.page_size);
                self.state.results = page.items;
                self.state.query = Some(ticket.query.title.clone());
                FetchOutcome::Loaded { returned }
            }
            (FetchKind::Continuation, Ok(page)) => {
                let returned = page.items.len();
                self.state.has_more = page.is_full(self.page_size);
                self.state.results.extend(page.items);
                FetchOutcome::Loaded { returned }
            }
            (FetchKind::NewSearch, Err(e)) => {
                warn!(title = %ticket.query.title, error = %e, "Search failed");
                self.state.error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.state.results.clear();
                self.state.has_more = false;
                self.state.query = None;
                FetchOutcome::Failed
            }
            (FetchKind::Continuation, Err(e)) => {
                warn!(
                    title = %ticket.query.title,
                    page = ticket.query.page,
                    error = %e,
                    "Loading more results failed"
                );
                self.state.error = Some(FETCH_FAILED_MESSAGE.to_string());
                // Retry re-requests the page that failed
                self.state.page = ticket.query.page.saturating_sub(1).max(1);
                FetchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::make_books;

    fn network_error() -> CatalogError {
        CatalogError::Network("connection reset".to_string())
    }

    fn loaded(page_size: usize, query: &str, count: usize) -> SearchMachine {
        let mut m = SearchMachine::new(page_size);
        let ticket = m.begin_search(query).unwrap();
        m.complete(&ticket, Ok(SearchPage::new(make_books("A", 0, count))));
        m
    }

    #[test]
    fn test_initial_state() {
        let m = SearchMachine::new(20);
        assert_eq!(m.state(), &SearchState::default());
        assert_eq!(m.state().page, 1);
        assert_eq!(m.state().phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let mut m = SearchMachine::new(20);
        for q in ["", "   ", "\t\n"] {
            assert!(m.begin_search(q).is_none());
        }
        assert_eq!(m.state(), &SearchState::default());

        let mut m = loaded(20, "dune", 20);
        let before = m.state().clone();
        assert!(m.begin_search("  ").is_none());
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_begin_search_sets_loading() {
        let mut m = SearchMachine::new(20);
        let ticket = m.begin_search("  Dune ").unwrap();

        assert_eq!(ticket.query(), &TitleQuery::new("Dune").page(1).limit(20));
        assert_eq!(ticket.kind(), FetchKind::NewSearch);
        assert!(m.state().loading);
        assert!(m.state().error.is_none());
        assert_eq!(m.state().phase(), SearchPhase::Loading);
    }

    #[test]
    fn test_first_page_replaces_results() {
        let m = loaded(20, "dune", 7);
        assert_eq!(m.state().results.len(), 7);
        assert_eq!(m.state().page, 1);
        assert_eq!(m.state().query.as_deref(), Some("dune"));
        assert!(!m.state().has_more);
        assert_eq!(m.state().phase(), SearchPhase::Loaded);
    }

    #[test]
    fn test_has_more_follows_page_size() {
        assert!(loaded(20, "x", 20).state().has_more);
        assert!(!loaded(20, "x", 19).state().has_more);
        assert!(!loaded(20, "x", 0).state().has_more);
        assert!(loaded(100, "x", 100).state().has_more);
    }

    #[test]
    fn test_load_more_appends_in_order() {
        let mut m = SearchMachine::new(2);
        let t = m.begin_search("x").unwrap();
        let first = make_books("A", 0, 2);
        m.complete(&t, Ok(SearchPage::new(first.clone())));

        let t = m.begin_load_more().unwrap();
        assert_eq!(t.query().page, 2);
        assert_eq!(t.kind(), FetchKind::Continuation);
        let second = make_books("C", 0, 2);
        m.complete(&t, Ok(SearchPage::new(second.clone())));

        let expected: Vec<Book> = first.into_iter().chain(second).collect();
        assert_eq!(m.state().results, expected);
        assert_eq!(m.state().page, 2);
    }

    #[test]
    fn test_load_more_noop_while_loading() {
        let mut m = loaded(20, "x", 20);
        let _pending = m.begin_load_more().unwrap();
        let before = m.state().clone();

        assert!(m.begin_load_more().is_none());
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_load_more_noop_without_more() {
        let mut m = loaded(20, "x", 5);
        let before = m.state().clone();
        assert!(m.begin_load_more().is_none());
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_load_more_noop_before_any_search() {
        let mut m = SearchMachine::new(20);
        assert!(m.begin_load_more().is_none());
        assert_eq!(m.state(), &SearchState::default());
    }

    #[test]
    fn test_new_search_failure_clears_results() {
        let mut m = loaded(20, "dune", 20);
        let t = m.begin_search("hyperion").unwrap();
        assert_eq!(m.complete(&t, Err(network_error())), FetchOutcome::Failed);

        let s = m.state();
        assert_eq!(s.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(s.results.is_empty());
        assert!(!s.loading);
        assert!(!s.has_more);
        assert_eq!(s.phase(), SearchPhase::Failed);
    }

    #[test]
    fn test_load_more_failure_rolls_back_page() {
        let mut m = loaded(20, "x", 20);
        let t = m.begin_load_more().unwrap();
        assert_eq!(m.state().page, 2);
        m.complete(&t, Err(network_error()));

        assert_eq!(m.state().page, 1);
        assert_eq!(m.state().results.len(), 20);
        assert!(m.state().has_more);
        assert!(m.state().error.is_some());

        // Retry asks for the same page again and clears the error
        let retry = m.begin_load_more().unwrap();
        assert_eq!(retry.query().page, 2);
        assert!(m.state().error.is_none());
    }

    #[test]
    fn test_error_and_loading_exclusive() {
        let mut m = SearchMachine::new(20);
        let t = m.begin_search("x").unwrap();
        m.complete(&t, Err(network_error()));
        assert!(m.state().error.is_some() && !m.state().loading);

        m.begin_search("x").unwrap();
        assert!(m.state().loading && m.state().error.is_none());
    }

    #[test]
    fn test_stale_continuation_discarded_after_new_search() {
        let mut m = loaded(20, "x", 20);
        let page2 = m.begin_load_more().unwrap();
        let fresh = m.begin_search("y").unwrap();

        let outcome = m.complete(&page2, Ok(SearchPage::new(make_books("S", 0, 20))));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(m.state().loading);

        m.complete(&fresh, Ok(SearchPage::new(make_books("Y", 0, 3))));
        assert_eq!(m.state().results.len(), 3);
        assert_eq!(m.state().query.as_deref(), Some("y"));
    }

    #[test]
    fn test_repeated_same_query_uses_latest_response() {
        let mut m = SearchMachine::new(20);
        let first = m.begin_search("x").unwrap();
        let second = m.begin_search("x").unwrap();
        assert_ne!(first, second);

        m.complete(&second, Ok(SearchPage::new(make_books("B", 0, 2))));
        assert_eq!(
            m.complete(&first, Ok(SearchPage::new(make_books("A", 0, 5)))),
            FetchOutcome::Stale
        );
        assert_eq!(m.state().results.len(), 2);
    }

    #[test]
    fn test_same_query_keeps_results_until_replaced() {
        let mut m = loaded(20, "x", 20);
        m.begin_search("x").unwrap();
        assert_eq!(m.state().results.len(), 20);

        m.begin_search("other").unwrap();
        assert!(m.state().results.is_empty());
        assert!(!m.state().has_more);
    }

    #[test]
    fn test_empty_result_detection() {
        let m = loaded(20, "zzzzz-nonexistent", 0);
        assert!(m.state().is_empty_result());
        assert!(m.state().error.is_none());
        assert!(!loaded(20, "x", 1).state().is_empty_result());
        assert!(!SearchMachine::new(20).state().is_empty_result());
    }
}
