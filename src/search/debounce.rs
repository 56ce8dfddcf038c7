//! Search-as-you-type input coalescing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::catalog::Catalog;
use crate::search::{FetchOutcome, SearchSession};

/// Quiet period used when none is configured
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Collapses rapid query changes into one search.
///
/// Each [`input`](Self::input) restarts the quiet-period timer; only the last
/// query typed before the timer elapses is searched. A search that has already
/// been sent is never interrupted, the session discards its response if a
/// newer search overtakes it.
#[derive(Debug)]
pub struct QueryDebouncer<C: ?Sized + 'static> {
    session: Arc<SearchSession<C>>,
    quiet: Duration,
    epoch: Arc<AtomicU64>,
    pending: Option<JoinHandle<FetchOutcome>>,
}

impl<C: Catalog + ?Sized + 'static> QueryDebouncer<C> {
    pub fn new(session: Arc<SearchSession<C>>, quiet: Duration) -> Self {
        Self {
            session,
            quiet,
            epoch: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Register a new query value, cancelling the previous pending one.
    pub fn input(&mut self, query: impl Into<String>) {
        let query = query.into();
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.epoch);
        let session = Arc::clone(&self.session);
        let quiet = self.quiet;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if current.load(Ordering::SeqCst) != epoch {
                trace!(%query, "Superseded before quiet period elapsed");
                return FetchOutcome::Skipped;
            }
            session.start_search(&query).await
        }));
    }

    /// Drop any query that has not fired yet.
    pub fn cancel(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.pending = None;
    }

    /// Wait for the latest input to fire and finish.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn flush(&mut self) -> Option<FetchOutcome> {
        let handle = self.pending.take()?;
        handle.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{make_books, MockCatalog};

    fn debouncer() -> (Arc<MockCatalog>, QueryDebouncer<MockCatalog>) {
        let catalog = Arc::new(MockCatalog::new());
        let session = Arc::new(SearchSession::new(catalog.clone(), 20));
        (catalog, QueryDebouncer::new(session, DEFAULT_QUIET_PERIOD))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_collapses_to_last_query() {
        let (catalog, mut debouncer) = debouncer();
        catalog.push_page("dune", 1, make_books("D", 0, 3));

        for partial in ["d", "du", "dun", "dune"] {
            debouncer.input(partial);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(
            debouncer.flush().await,
            Some(FetchOutcome::Loaded { returned: 3 })
        );
        // Let the superseded timers run out
        tokio::time::sleep(DEFAULT_QUIET_PERIOD).await;

        let titles: Vec<String> = catalog.requests().into_iter().map(|q| q.title).collect();
        assert_eq!(titles, vec!["dune"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_quiet_period() {
        let (catalog, mut debouncer) = debouncer();

        debouncer.input("dune");
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(catalog.request_count(), 0);

        debouncer.flush().await;
        assert_eq!(catalog.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_query() {
        let (catalog, mut debouncer) = debouncer();

        debouncer.input("dune");
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(catalog.request_count(), 0);
        assert_eq!(debouncer.flush().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_inputs_both_fire() {
        let (catalog, mut debouncer) = debouncer();

        debouncer.input("dune");
        debouncer.flush().await;
        debouncer.input("emma");
        debouncer.flush().await;

        assert_eq!(catalog.request_count(), 2);
    }
}
