//! Suggestion feed adapter.
//!
//! Wraps an autocomplete source behind a minimum-length threshold. Each
//! request is tagged with a generation number; a response is applied only
//! if no newer request has been dispatched since, so a slow stale response
//! can never overwrite fresher suggestions.

use futures::future::BoxFuture;
use sift_core::FeedError;
use std::sync::Arc;
use std::time::Duration;

/// Inputs shorter than this (in characters) never query the source.
pub const MIN_SUGGESTION_CHARS: usize = 2;

// =============================================================================
// Source Trait
// =============================================================================

/// Autocomplete data source.
pub trait SuggestionSource: Send + Sync {
    /// Fetch ordered suggestions for a fully-built request URL.
    fn suggest(&self, url: String) -> BoxFuture<'static, Result<Vec<String>, FeedError>>;
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Source that GETs a JSON array of strings.
pub struct HttpSuggestionSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSuggestionSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Create with a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpSuggestionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionSource for HttpSuggestionSource {
    fn suggest(&self, url: String) -> BoxFuture<'static, Result<Vec<String>, FeedError>> {
        let request = self.client.get(url).timeout(self.timeout);
        let timeout = self.timeout;

        Box::pin(async move {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    FeedError::Timeout { duration: timeout }
                } else {
                    FeedError::Request(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FeedError::Status {
                    status: status.as_u16(),
                });
            }

            let body = response
                .text()
                .await
                .map_err(|e| FeedError::Request(e.to_string()))?;
            Ok(serde_json::from_str(&body)?)
        })
    }
}

// =============================================================================
// Feed Adapter
// =============================================================================

/// A dispatched suggestion request.
pub struct SuggestionRequest {
    /// Generation this request was dispatched under.
    pub generation: u64,

    /// The pending response.
    pub response: BoxFuture<'static, Result<Vec<String>, FeedError>>,
}

/// Owns the widget's suggestion list.
pub struct SuggestionFeed {
    source: Arc<dyn SuggestionSource>,
    prefix: String,
    generation: u64,
    suggestions: Vec<String>,
}

impl SuggestionFeed {
    /// Create a feed querying `base_uri + auto_complete_uri + text`.
    pub fn new(source: Arc<dyn SuggestionSource>, base_uri: &str, auto_complete_uri: &str) -> Self {
        Self {
            source,
            prefix: format!("{}{}", base_uri, auto_complete_uri),
            generation: 0,
            suggestions: Vec::new(),
        }
    }

    /// Request URL for the given input text.
    pub fn request_url(&self, text: &str) -> String {
        format!("{}{}", self.prefix, urlencoding::encode(text))
    }

    /// React to new input text.
    ///
    /// Below the threshold the list is cleared and nothing is requested.
    /// Either way any in-flight response becomes stale.
    pub fn input_changed(&mut self, text: &str) -> Option<SuggestionRequest> {
        self.generation += 1;

        if text.chars().count() < MIN_SUGGESTION_CHARS {
            self.suggestions.clear();
            return None;
        }

        let url = self.request_url(text);
        tracing::debug!("Requesting suggestions (gen {}): {}", self.generation, url);
        Some(SuggestionRequest {
            generation: self.generation,
            response: self.source.suggest(url),
        })
    }

    /// Apply a completed response. Returns false if it was stale.
    ///
    /// A failed request leaves the current list in place.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<String>, FeedError>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale suggestions (gen {}, latest {})",
                generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(suggestions) => {
                tracing::debug!("Received {} suggestions", suggestions.len());
                self.suggestions = suggestions;
            }
            Err(e) => {
                tracing::debug!("Suggestion request failed: {}", e);
            }
        }
        true
    }

    /// Current suggestions, in feed order.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Generation of the most recently dispatched request.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// =============================================================================
// Mock Source for Testing
// =============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Source returning canned suggestions and recording request URLs.
    pub struct MockSource {
        pub suggestions: Arc<Mutex<Vec<String>>>,
        pub requests: Arc<Mutex<Vec<String>>>,
        pub delay: Duration,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self {
                suggestions: Arc::new(Mutex::new(Vec::new())),
                requests: Arc::new(Mutex::new(Vec::new())),
                delay: Duration::ZERO,
            }
        }

        pub fn with_suggestions(self, suggestions: &[&str]) -> Self {
            *self.suggestions.lock() = suggestions.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    impl Default for MockSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SuggestionSource for MockSource {
        fn suggest(&self, url: String) -> BoxFuture<'static, Result<Vec<String>, FeedError>> {
            self.requests.lock().push(url);
            let suggestions = self.suggestions.clone();
            let delay = self.delay;

            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(suggestions.lock().clone())
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
