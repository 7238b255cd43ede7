use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::services::ApiClient;

/// Default idle period before a typed prefix is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// One fired debounce window: the text at dispatch time plus the
/// generation stamp that decides whether its response is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct PendingWindow {
    query: String,
    fire_at: Instant,
}

/// What `on_input` did with the keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Blank input: suggestions clear immediately, nothing is scheduled.
    Cleared,
    /// A fresh window was scheduled; any previous pending window is gone.
    Scheduled,
}

/// Turns a rapid stream of raw query-text events into at most one dispatch
/// per idle period.
///
/// The debouncer is also the generation authority: each dispatched window
/// gets a fresh generation, and responses are applied only while their
/// generation is still current. Cancelling a timer does not cancel an
/// already-dispatched request, so the generation check is what actually
/// drops stale responses.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<PendingWindow>,
    generation: u64,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
        }
    }

    /// Feed one keystroke's worth of text. Any pending window is discarded
    /// entirely. Blank input invalidates the current generation so an
    /// in-flight response cannot resurrect suggestions over a cleared box.
    pub fn on_input(&mut self, text: &str, now: Instant) -> InputOutcome {
        self.pending = None;

        if text.trim().is_empty() {
            self.generation += 1;
            return InputOutcome::Cleared;
        }

        self.pending = Some(PendingWindow {
            query: text.to_string(),
            fire_at: now + self.delay,
        });
        InputOutcome::Scheduled
    }

    /// When the event loop should next wake to fire a window.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.fire_at)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Dispatch the pending window if its timer has expired. Increments the
    /// generation counter before handing the session out, superseding any
    /// still-in-flight older request.
    pub fn fire(&mut self, now: Instant) -> Option<SearchSession> {
        let due = matches!(&self.pending, Some(p) if p.fire_at <= now);
        if !due {
            return None;
        }

        let window = self.pending.take().expect("pending window checked above");
        self.generation += 1;

        tracing::debug!(
            "Dispatching search window '{}' (generation {})",
            window.query,
            self.generation
        );

        Some(SearchSession {
            query: window.query,
            generation: self.generation,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Is a response with this generation still the one the user wants?
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Issues the prefix-search request for one fired window.
///
/// Owns the failure-to-empty policy: any transport or server error degrades
/// to an empty list, never partial data and never a surfaced error.
#[derive(Clone)]
pub struct SuggestionFetcher {
    api: Arc<ApiClient>,
}

impl SuggestionFetcher {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, session: &SearchSession) -> Vec<String> {
        // Defensive restatement: blank prefixes are cleared upstream and
        // must never reach the wire.
        if session.query.trim().is_empty() {
            return Vec::new();
        }

        match self.api.search_prefix(&session.query).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::debug!(
                    "Suggestion fetch for '{}' failed, degrading to empty: {}",
                    session.query,
                    e
                );
                Vec::new()
            }
        }
    }
}

/// Visible suggestion state: the list the user sees plus the loading flag.
///
/// Applies results only while their generation is current; a stale
/// resolution neither overwrites the list nor toggles the loading flag.
#[derive(Debug, Default)]
pub struct SuggestionPanel {
    suggestions: Vec<String>,
    loading: bool,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a current-generation dispatch as in flight.
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Install the result of a fetch if its generation is still current.
    /// Returns whether the result was applied.
    pub fn apply(
        &mut self,
        debouncer: &SearchDebouncer,
        generation: u64,
        suggestions: Vec<String>,
    ) -> bool {
        if !debouncer.is_current(generation) {
            tracing::debug!(
                "Dropping stale suggestion response (generation {} != {})",
                generation,
                debouncer.generation()
            );
            return false;
        }

        self.suggestions = suggestions;
        self.loading = false;
        true
    }

    /// Clear the visible list (blank input).
    pub fn clear(&mut self) {
        self.suggestions.clear();
        self.loading = false;
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: Duration = Duration::from_millis(250);

    fn suggestions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rapid_input_coalesces_to_last_text() {
        let mut debouncer = SearchDebouncer::new(D);
        let t0 = Instant::now();

        debouncer.on_input("ja", t0);
        debouncer.on_input("jav", t0 + Duration::from_millis(50));
        debouncer.on_input("java", t0 + Duration::from_millis(100));

        // Nothing fires before the last window's deadline
        assert!(debouncer.fire(t0 + Duration::from_millis(300)).is_none());

        let session = debouncer
            .fire(t0 + Duration::from_millis(350))
            .expect("window due");
        assert_eq!(session.query, "java");
        assert_eq!(session.generation, 1);

        // Exactly one dispatch per idle period
        assert!(debouncer.fire(t0 + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_blank_input_clears_without_scheduling() {
        let mut debouncer = SearchDebouncer::new(D);
        let t0 = Instant::now();

        assert_eq!(debouncer.on_input("   ", t0), InputOutcome::Cleared);
        assert!(!debouncer.has_pending());
        assert!(debouncer.fire(t0 + D + D).is_none());
    }

    #[test]
    fn test_blank_input_invalidates_in_flight_generation() {
        let mut debouncer = SearchDebouncer::new(D);
        let t0 = Instant::now();

        debouncer.on_input("java", t0);
        let session = debouncer.fire(t0 + D).expect("window due");
        assert!(debouncer.is_current(session.generation));

        // User clears the box while the request is in flight
        debouncer.on_input("", t0 + D + Duration::from_millis(10));
        assert!(!debouncer.is_current(session.generation));
    }

    #[test]
    fn test_new_dispatch_supersedes_older_generation() {
        let mut debouncer = SearchDebouncer::new(D);
        let t0 = Instant::now();

        debouncer.on_input("rust", t0);
        let first = debouncer.fire(t0 + D).unwrap();

        debouncer.on_input("rust eng", t0 + D);
        let second = debouncer.fire(t0 + D + D).unwrap();

        assert!(second.generation > first.generation);
        assert!(!debouncer.is_current(first.generation));
        assert!(debouncer.is_current(second.generation));
    }

    #[test]
    fn test_panel_drops_stale_response() {
        let mut debouncer = SearchDebouncer::new(D);
        let mut panel = SuggestionPanel::new();
        let t0 = Instant::now();

        debouncer.on_input("ja", t0);
        let first = debouncer.fire(t0 + D).unwrap();
        panel.begin();

        debouncer.on_input("java", t0 + D);
        let second = debouncer.fire(t0 + D + D).unwrap();
        panel.begin();

        // Later-dispatched request resolves first and is shown
        assert!(panel.apply(&debouncer, second.generation, suggestions(&["java developer"])));
        assert!(!panel.is_loading());

        // The earlier request's late resolution must not overwrite it
        assert!(!panel.apply(&debouncer, first.generation, suggestions(&["jazz musician"])));
        assert_eq!(panel.suggestions(), ["java developer".to_string()]);
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_stale_resolution_does_not_toggle_loading() {
        let mut debouncer = SearchDebouncer::new(D);
        let mut panel = SuggestionPanel::new();
        let t0 = Instant::now();

        debouncer.on_input("ja", t0);
        let first = debouncer.fire(t0 + D).unwrap();
        panel.begin();

        debouncer.on_input("java", t0 + D);
        let _second = debouncer.fire(t0 + D + D).unwrap();
        panel.begin();
        assert!(panel.is_loading());

        // Stale resolution while the current call is still in flight
        assert!(!panel.apply(&debouncer, first.generation, vec![]));
        assert!(panel.is_loading(), "current-generation call still in flight");
    }

    #[test]
    fn test_clear_empties_panel() {
        let mut debouncer = SearchDebouncer::new(D);
        let mut panel = SuggestionPanel::new();
        let t0 = Instant::now();

        debouncer.on_input("java", t0);
        let session = debouncer.fire(t0 + D).unwrap();
        panel.begin();
        panel.apply(&debouncer, session.generation, suggestions(&["java developer"]));

        panel.clear();
        assert!(panel.suggestions().is_empty());
        assert!(!panel.is_loading());
    }
}
