//! Search input debouncing.
//!
//! Clock-injected so the 500ms window is testable without sleeping: callers
//! pass `Instant::now()` (or a fabricated instant in tests) to both
//! [`SearchDebouncer::submit`] and [`SearchDebouncer::fire`].

use std::time::{Duration, Instant};

/// Default debounce window between keystrokes and the fired query.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending {
    term: String,
    due: Instant,
}

/// Collapses a burst of search-input events into one query for the last
/// term typed.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    window: Duration,
    pending: Option<Pending>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl SearchDebouncer {
    /// Create a debouncer with a custom window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a keystroke. Any previously pending term is replaced and its
    /// deadline restarted.
    pub fn submit(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            term: term.into(),
            due: now + self.window,
        });
    }

    /// Take the pending term if its window has elapsed.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|pending| pending.due <= now) {
            self.pending.take().map(|pending| pending.term)
        } else {
            None
        }
    }

    /// Whether a term is waiting for its window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending term without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
