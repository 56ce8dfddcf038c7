//! Load-more triggers driven by scroll position or explicit activation.

use crate::catalog::Catalog;
use crate::search::{FetchOutcome, SearchSession, SearchState};

/// Distance from the bottom, in viewport units, that counts as "near"
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 50;

/// Largest accepted threshold
pub const MAX_SCROLL_THRESHOLD: u32 = 100;

/// Scroll position of a view over the result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Visible height
    pub height: u32,
    /// Distance scrolled from the top
    pub scroll_offset: u32,
    /// Height of the whole rendered content
    pub content_height: u32,
}

impl Viewport {
    pub fn new(height: u32, scroll_offset: u32, content_height: u32) -> Self {
        Self {
            height,
            scroll_offset,
            content_height,
        }
    }

    /// `height + scroll_offset >= content_height - threshold`
    pub fn is_near_bottom(&self, threshold: u32) -> bool {
        let seen = u64::from(self.height) + u64::from(self.scroll_offset);
        seen + u64::from(threshold) >= u64::from(self.content_height)
    }
}

/// Decides when a scroll or button press should load the next page.
///
/// A trigger fires at most once per scroll position: an event reporting the
/// same viewport as the previous one is ignored. Whether a fetch is already
/// running is left to the session's own `load_more` guard.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold: u32,
    last_position: Option<Viewport>,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollTrigger {
    /// Create a trigger; the threshold is clamped to [`MAX_SCROLL_THRESHOLD`]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.min(MAX_SCROLL_THRESHOLD),
            last_position: None,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record a scroll event and report whether it should load more.
    pub fn should_load_on_scroll(&mut self, viewport: Viewport, state: &SearchState) -> bool {
        if self.last_position == Some(viewport) {
            return false;
        }
        self.last_position = Some(viewport);
        viewport.is_near_bottom(self.threshold) && state.can_load_more()
    }

    /// Whether an explicit "load more" activation should load more
    pub fn should_load_on_activate(&self, state: &SearchState) -> bool {
        state.can_load_more()
    }

    /// Forget the last position, e.g. after a new search replaced the content
    pub fn reset(&mut self) {
        self.last_position = None;
    }

    /// Handle a scroll event against a session
    pub async fn scrolled<C: Catalog + ?Sized>(
        &mut self,
        session: &SearchSession<C>,
        viewport: Viewport,
    ) -> FetchOutcome {
        if self.should_load_on_scroll(viewport, &session.state()) {
            session.load_more().await
        } else {
            FetchOutcome::Skipped
        }
    }

    /// Handle a "load more" button press against a session
    pub async fn activated<C: Catalog + ?Sized>(
        &self,
        session: &SearchSession<C>,
    ) -> FetchOutcome {
        if self.should_load_on_activate(&session.state()) {
            session.load_more().await
        } else {
            FetchOutcome::Skipped
        }
    }
}
