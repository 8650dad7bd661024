//! Query update coordinator.
//!
//! Every query-affecting user action ends up here. The coordinator decides
//! whether text is staged or committed, whether a commit is a fresh search
//! or a re-run, and when navigation happens. It reads the searcher fresh on
//! every call and never keeps a copy of the query.

use sift_core::{Location, SignalTemplate};
use std::sync::Arc;

use crate::navigation::Navigator;
use crate::searcher::Searcher;
use crate::signal::SignalEmitter;

/// What an update did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No session is mounted; nothing happened.
    NoSession,
    /// Nothing to do for the current session state.
    Ignored,
    /// Query text staged, no search.
    Staged,
    /// First search of the session via `set_query_and_search`.
    Searched,
    /// Staged query re-run via `do_search`.
    Researched,
    /// Navigated to the configured route without searching here.
    Navigated,
}

/// Reconciles input events with the shared search session.
pub struct QueryCoordinator {
    searcher: Option<Arc<dyn Searcher>>,
    navigator: Arc<dyn Navigator>,
    route: Option<String>,
    emitter: SignalEmitter,
}

impl QueryCoordinator {
    pub fn new(
        searcher: Option<Arc<dyn Searcher>>,
        navigator: Arc<dyn Navigator>,
        route: Option<String>,
        emitter: SignalEmitter,
    ) -> Self {
        Self {
            searcher,
            navigator,
            route: route.filter(|r| !r.is_empty()),
            emitter,
        }
    }

    pub fn searcher(&self) -> Option<&Arc<dyn Searcher>> {
        self.searcher.as_ref()
    }

    /// Stage or commit new query text.
    ///
    /// `accepted` is set when the text comes from an autocomplete
    /// suggestion; a signal is emitted for it before anything else.
    ///
    /// On commit, a session that has not searched yet gets
    /// `set_query_and_search(text)` followed by navigation to the route.
    /// A session that has already searched gets a plain `do_search()`
    /// against its staged query.
    pub fn update_query(
        &self,
        text: &str,
        commit: bool,
        accepted: Option<&SignalTemplate>,
    ) -> UpdateOutcome {
        if let Some(template) = accepted {
            self.emitter.emit(text, template);
        }

        let Some(searcher) = &self.searcher else {
            return UpdateOutcome::NoSession;
        };

        if !commit {
            searcher.update_query(text);
            return UpdateOutcome::Staged;
        }

        if searcher.have_searched() {
            tracing::debug!("Re-running search");
            searcher.do_search();
            UpdateOutcome::Researched
        } else {
            tracing::debug!("Starting search for {:?}", text);
            searcher.set_query_and_search(text);
            self.navigate_to_route(searcher.as_ref());
            UpdateOutcome::Searched
        }
    }

    /// Commit text straight to a fresh search, skipping stage semantics.
    /// Used by voice input.
    pub fn search_now(&self, text: &str) -> UpdateOutcome {
        let Some(searcher) = &self.searcher else {
            return UpdateOutcome::NoSession;
        };
        tracing::debug!("Searching for transcript {:?}", text);
        searcher.set_query_and_search(text);
        UpdateOutcome::Searched
    }

    /// The submit button.
    ///
    /// With a route configured this always navigates, building the query
    /// string from the session's current state. Otherwise an empty query
    /// is ignored until a search has run, after which it re-runs like any
    /// other query.
    pub fn submit(&self) -> UpdateOutcome {
        let Some(searcher) = &self.searcher else {
            return UpdateOutcome::NoSession;
        };

        if self.navigate_to_route(searcher.as_ref()) {
            return UpdateOutcome::Navigated;
        }

        let query = searcher.query();
        match (query.is_empty(), searcher.have_searched()) {
            (true, false) => UpdateOutcome::Ignored,
            (false, false) => {
                searcher.set_query_and_search(&query);
                UpdateOutcome::Searched
            }
            (_, true) => {
                searcher.do_search();
                UpdateOutcome::Researched
            }
        }
    }

    /// Navigate to the configured route, if any. Returns whether it did.
    fn navigate_to_route(&self, searcher: &dyn Searcher) -> bool {
        let Some(route) = &self.route else {
            return false;
        };
        let search = searcher.generate_location_query_string(&searcher.state());
        self.navigator.navigate(Location::new(route.clone(), search));
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
