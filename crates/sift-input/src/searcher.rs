//! The shared search session.
//!
//! The `Searcher` trait is the widget's view of the search session: it owns
//! the authoritative query text, query language and `have_searched` flag.
//! The widget holds an `Arc<dyn Searcher>` and re-reads it on every update.
//!
//! `InMemorySearcher` is a self-contained implementation: every mutation
//! broadcasts the new `SessionState` over a `tokio::sync::watch` channel.

use parking_lot::RwLock;
use sift_core::{QueryLanguage, SessionState};
use tokio::sync::watch;

// =============================================================================
// Searcher Trait
// =============================================================================

/// Session operations consumed by the input widget.
///
/// All operations are infallible from the widget's point of view; the
/// session is a trusted in-process collaborator.
pub trait Searcher: Send + Sync {
    /// Current query text.
    fn query(&self) -> String;

    /// Current query language.
    fn query_language(&self) -> QueryLanguage;

    /// Whether a search has already run in this session.
    fn have_searched(&self) -> bool;

    /// Set the query, reset filters and run a fresh search.
    fn set_query_and_search(&self, query: &str);

    /// Re-run the search for the staged query, keeping filters.
    fn do_search(&self);

    /// Stage query text without searching.
    fn update_query(&self, query: &str);

    /// Switch query language without searching.
    fn update_query_language(&self, language: QueryLanguage);

    /// Encode a session state as a location query string.
    fn generate_location_query_string(&self, state: &SessionState) -> String;

    /// Snapshot of the current state.
    fn state(&self) -> SessionState {
        SessionState {
            query: self.query(),
            query_language: self.query_language(),
            have_searched: self.have_searched(),
        }
    }
}

// =============================================================================
// In-Memory Searcher
// =============================================================================

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    filters: Vec<(String, String)>,
    search_count: u64,
}

/// A searcher that keeps its state in memory and broadcasts every change.
pub struct InMemorySearcher {
    inner: RwLock<Inner>,
    tx: watch::Sender<SessionState>,
    rx: watch::Receiver<SessionState>,
}

impl InMemorySearcher {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(SessionState::default());
        Self {
            inner: RwLock::new(Inner::default()),
            tx,
            rx,
        }
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.rx.clone()
    }

    /// Add a result filter. Filters survive `do_search` but are cleared by
    /// `set_query_and_search`.
    pub fn add_filter(&self, field: impl Into<String>, value: impl Into<String>) {
        let snapshot = {
            let mut inner = self.inner.write();
            inner.filters.push((field.into(), value.into()));
            inner.state.clone()
        };
        let _ = self.tx.send(snapshot);
    }

    /// Active filters.
    pub fn filters(&self) -> Vec<(String, String)> {
        self.inner.read().filters.clone()
    }

    /// Number of searches executed so far.
    pub fn search_count(&self) -> u64 {
        self.inner.read().search_count
    }

    /// Reset the session lifecycle. Only the session owner calls this.
    pub fn reset(&self) {
        {
            let mut inner = self.inner.write();
            *inner = Inner::default();
        }
        let _ = self.tx.send(SessionState::default());
    }

    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut Inner),
    {
        let snapshot = {
            let mut inner = self.inner.write();
            f(&mut inner);
            inner.state.clone()
        };
        let _ = self.tx.send(snapshot);
    }
}

impl Default for InMemorySearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher for InMemorySearcher {
    fn query(&self) -> String {
        self.inner.read().state.query.clone()
    }

    fn query_language(&self) -> QueryLanguage {
        self.inner.read().state.query_language
    }

    fn have_searched(&self) -> bool {
        self.inner.read().state.have_searched
    }

    fn set_query_and_search(&self, query: &str) {
        self.mutate(|inner| {
            inner.state.query = query.to_string();
            inner.filters.clear();
            inner.state.have_searched = true;
            inner.search_count += 1;
        });
        tracing::debug!("Searching for {:?} with filters reset", query);
    }

    fn do_search(&self) {
        self.mutate(|inner| {
            inner.state.have_searched = true;
            inner.search_count += 1;
        });
        tracing::debug!("Re-running search");
    }

    fn update_query(&self, query: &str) {
        self.mutate(|inner| inner.state.query = query.to_string());
    }

    fn update_query_language(&self, language: QueryLanguage) {
        self.mutate(|inner| inner.state.query_language = language);
    }

    fn generate_location_query_string(&self, state: &SessionState) -> String {
        let mut pairs = vec![
            format!("q={}", urlencoding::encode(&state.query)),
            format!("ql={}", state.query_language),
        ];
        for (field, value) in self.inner.read().filters.iter() {
            pairs.push(format!(
                "f={}",
                urlencoding::encode(&format!("{}:{}", field, value))
            ));
        }
        pairs.join("&")
    }
}

// =============================================================================
// Recording Searcher for Testing
// =============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// A session call observed by `RecordingSearcher`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SessionCall {
        SetQueryAndSearch(String),
        DoSearch,
        UpdateQuery(String),
        UpdateQueryLanguage(QueryLanguage),
    }

    /// Searcher double that records every mutating call.
    ///
    /// State changes follow the same rules as `InMemorySearcher` so the
    /// widget sees realistic post-update reads.
    pub struct RecordingSearcher {
        pub state: Mutex<SessionState>,
        pub calls: Mutex<Vec<SessionCall>>,
    }

    impl RecordingSearcher {
        pub fn new() -> Self {
            Self {
                state: Mutex::new(SessionState::default()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_query(self, query: &str) -> Self {
            self.state.lock().query = query.to_string();
            self
        }

        pub fn with_have_searched(self, have_searched: bool) -> Self {
            self.state.lock().have_searched = have_searched;
            self
        }

        pub fn calls(&self) -> Vec<SessionCall> {
            self.calls.lock().clone()
        }

        pub fn count(&self, pred: impl Fn(&SessionCall) -> bool) -> usize {
            self.calls.lock().iter().filter(|&c| pred(c)).count()
        }
    }

    impl Default for RecordingSearcher {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Searcher for RecordingSearcher {
        fn query(&self) -> String {
            self.state.lock().query.clone()
        }

        fn query_language(&self) -> QueryLanguage {
            self.state.lock().query_language
        }

        fn have_searched(&self) -> bool {
            self.state.lock().have_searched
        }

        fn set_query_and_search(&self, query: &str) {
            self.calls
                .lock()
                .push(SessionCall::SetQueryAndSearch(query.to_string()));
            let mut state = self.state.lock();
            state.query = query.to_string();
            state.have_searched = true;
        }

        fn do_search(&self) {
            self.calls.lock().push(SessionCall::DoSearch);
            self.state.lock().have_searched = true;
        }

        fn update_query(&self, query: &str) {
            self.calls
                .lock()
                .push(SessionCall::UpdateQuery(query.to_string()));
            self.state.lock().query = query.to_string();
        }

        fn update_query_language(&self, language: QueryLanguage) {
            self.calls
                .lock()
                .push(SessionCall::UpdateQueryLanguage(language));
            self.state.lock().query_language = language;
        }

        fn generate_location_query_string(&self, state: &SessionState) -> String {
            format!(
                "q={}&ql={}",
                urlencoding::encode(&state.query),
                state.query_language
            )
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_does_not_search() {
        let searcher = InMemorySearcher::new();
        searcher.update_query("jazz");

        assert_eq!(searcher.query(), "jazz");
        assert!(!searcher.have_searched());
        assert_eq!(searcher.search_count(), 0);
    }

    #[test]
    fn test_set_query_and_search_resets_filters() {
        let searcher = InMemorySearcher::new();
        searcher.add_filter("genre", "bebop");
        searcher.set_query_and_search("jazz");

        assert_eq!(searcher.query(), "jazz");
        assert!(searcher.have_searched());
        assert!(searcher.filters().is_empty());
        assert_eq!(searcher.search_count(), 1);
    }

    #[test]
    fn test_do_search_keeps_filters() {
        let searcher = InMemorySearcher::new();
        searcher.set_query_and_search("jazz");
        searcher.add_filter("genre", "bebop");
        searcher.do_search();

        assert_eq!(searcher.filters().len(), 1);
        assert_eq!(searcher.search_count(), 2);
    }

    #[test]
    fn test_have_searched_only_reset_by_owner() {
        let searcher = InMemorySearcher::new();
        searcher.set_query_and_search("jazz");
        searcher.update_query("blues");
        searcher.update_query_language(QueryLanguage::Advanced);
        assert!(searcher.have_searched());

        searcher.reset();
        assert!(!searcher.have_searched());
        assert!(searcher.query().is_empty());
    }

    #[test]
    fn test_location_query_string() {
        let searcher = InMemorySearcher::new();
        searcher.set_query_and_search("miles davis");
        searcher.add_filter("decade", "1950s");

        let qs = searcher.generate_location_query_string(&searcher.state());
        insta::assert_snapshot!(qs, @"q=miles%20davis&ql=simple&f=decade%3A1950s");
    }

    #[tokio::test]
    async fn test_subscribe_sees_mutations() {
        let searcher = InMemorySearcher::new();
        let mut rx = searcher.subscribe();

        searcher.update_query("jazz");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().query, "jazz");
        assert!(!rx.borrow().have_searched);
    }
}
