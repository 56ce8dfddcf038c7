//! Search sessions: pagination state, triggers and detail loading.
//!
//! A [`SearchSession`] couples a [`SearchMachine`] with an injected
//! [`Catalog`]. Every state change is published as an immutable
//! [`SearchState`] snapshot on a `tokio::sync::watch` channel, so any number
//! of views can follow a session without polling it.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use book_finder::catalog::OpenLibraryCatalog;
//! use book_finder::search::SearchSession;
//! use book_finder::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(OpenLibraryCatalog::new(HttpClient::new()?));
//! let session = SearchSession::new(catalog, 20);
//!
//! session.start_search("The Hobbit").await;
//! while session.state().has_more {
//!     session.load_more().await;
//! }
//! println!("{} books", session.state().results.len());
//! # Ok(())
//! # }
//! ```

mod debounce;
mod detail;
mod state;
mod trending;
mod trigger;

pub use debounce::{QueryDebouncer, DEFAULT_QUIET_PERIOD};
pub use detail::{fetch_work, load_detail, BookDetail, DETAILS_FAILED_MESSAGE};
pub use state::{
    FetchKind, FetchOutcome, FetchTicket, SearchMachine, SearchPhase, SearchState,
    FETCH_FAILED_MESSAGE,
};
pub use trending::TRENDING_SEARCHES;
pub use trigger::{ScrollTrigger, Viewport, DEFAULT_SCROLL_THRESHOLD, MAX_SCROLL_THRESHOLD};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::catalog::Catalog;
use crate::models::TitleQuery;
use tracing::warn;

/// Fetch one specific page outside of a session.
///
/// The returned snapshot follows the same rules as a session's first page:
/// a blank title sends nothing, and a failed request is logged and reported
/// only through [`FETCH_FAILED_MESSAGE`].
pub async fn fetch_page<C: Catalog + ?Sized>(
    catalog: &C,
    title: &str,
    page: u32,
    page_size: usize,
) -> SearchState {
    let query = TitleQuery::new(title.trim())
        .page(page.max(1))
        .limit(page_size.max(1));
    if query.is_blank() {
        return SearchState::default();
    }

    match catalog.search_by_title(&query).await {
        Ok(found) => SearchState {
            has_more: found.is_full(query.limit),
            results: found.items,
            query: Some(query.title),
            page: query.page,
            ..Default::default()
        },
        Err(e) => {
            warn!(title = %query.title, page = query.page, error = %e, "Search failed");
            SearchState {
                error: Some(FETCH_FAILED_MESSAGE.to_string()),
                page: query.page,
                ..Default::default()
            }
        }
    }
}

/// A search session over one catalog.
///
/// The machine lock is only held while a transition runs, never across a
/// fetch, so a new search can be started while an older request is still in
/// flight. Out-of-date responses are dropped by the machine.
#[derive(Debug)]
pub struct SearchSession<C: ?Sized> {
    catalog: Arc<C>,
    machine: Mutex<SearchMachine>,
    updates: watch::Sender<SearchState>,
}

impl<C: Catalog + ?Sized> SearchSession<C> {
    /// Create an idle session. `page_size` is both the request limit and the
    /// threshold for `has_more`.
    pub fn new(catalog: Arc<C>, page_size: usize) -> Self {
        let machine = SearchMachine::new(page_size);
        let (updates, _) = watch::channel(machine.state().clone());
        Self {
            catalog,
            machine: Mutex::new(machine),
            updates,
        }
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.catalog
    }

    /// Current snapshot
    pub fn state(&self) -> SearchState {
        self.updates.borrow().clone()
    }

    /// Receive every snapshot published after this call
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.updates.subscribe()
    }

    pub fn page_size(&self) -> usize {
        self.lock().page_size()
    }

    /// Start a new search. Blank queries are ignored.
    pub async fn start_search(&self, query: &str) -> FetchOutcome {
        let ticket = self.transition(|m| m.begin_search(query));
        match ticket {
            Some(ticket) => self.fetch(ticket).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Fetch the next page of the active query, if there is one and nothing
    /// is loading.
    pub async fn load_more(&self) -> FetchOutcome {
        let ticket = self.transition(|m| m.begin_load_more());
        match ticket {
            Some(ticket) => self.fetch(ticket).await,
            None => FetchOutcome::Skipped,
        }
    }

    async fn fetch(&self, ticket: FetchTicket) -> FetchOutcome {
        let result = self.catalog.search_by_title(ticket.query()).await;
        let mut machine = self.lock();
        let outcome = machine.complete(&ticket, result);
        if outcome != FetchOutcome::Stale {
            self.updates.send_replace(machine.state().clone());
        }
        outcome
    }

    fn transition(
        &self,
        f: impl FnOnce(&mut SearchMachine) -> Option<FetchTicket>,
    ) -> Option<FetchTicket> {
        let mut machine = self.lock();
        let ticket = f(&mut *machine)?;
        self.updates.send_replace(machine.state().clone());
        Some(ticket)
    }

    fn lock(&self) -> MutexGuard<'_, SearchMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
