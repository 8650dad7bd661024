//! Query language toggle.

use sift_core::QueryLanguage;
use std::sync::Arc;

use crate::searcher::Searcher;

/// Forwards language picks to the searcher. Keeps no state of its own.
pub struct LanguageToggle {
    searcher: Option<Arc<dyn Searcher>>,
}

impl LanguageToggle {
    pub fn new(searcher: Option<Arc<dyn Searcher>>) -> Self {
        Self { searcher }
    }

    /// Switch the session's query language. Query text is left alone and
    /// no search runs.
    pub fn set_language(&self, language: QueryLanguage) {
        let Some(searcher) = &self.searcher else {
            return;
        };
        tracing::debug!("Switching query language to {}", language);
        searcher.update_query_language(language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::mock::{RecordingSearcher, SessionCall};

    #[test]
    fn test_toggle_leaves_query_and_does_not_search() {
        for language in [QueryLanguage::Advanced, QueryLanguage::Simple] {
            let searcher = Arc::new(
                RecordingSearcher::new()
                    .with_query("jazz")
                    .with_have_searched(true),
            );
            let toggle = LanguageToggle::new(Some(searcher.clone()));

            toggle.set_language(language);

            assert_eq!(searcher.query(), "jazz");
            assert_eq!(searcher.query_language(), language);
            assert_eq!(
                searcher.calls(),
                vec![SessionCall::UpdateQueryLanguage(language)]
            );
        }
    }

    #[test]
    fn test_without_session_is_noop() {
        let toggle = LanguageToggle::new(None);
        toggle.set_language(QueryLanguage::Advanced);
    }
}
