//! Autocomplete acceptance signals.
//!
//! The emitter builds one `Signal` per accepted suggestion and hands it to
//! a `SignalSink` without awaiting the outcome. Delivery, retry and drop
//! policy belong to the sink.

use chrono::Utc;
use futures::future::BoxFuture;
use sift_core::{CurrentUser, Signal, SignalTemplate, SinkError};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Sink Trait
// =============================================================================

/// Accepts signal records for asynchronous persistence.
pub trait SignalSink: Send + Sync {
    fn send(&self, signal: Signal) -> BoxFuture<'static, Result<(), SinkError>>;
}

// =============================================================================
// HTTP Sink
// =============================================================================

/// Sink that POSTs signals as JSON to `{base_uri}/signals`.
pub struct HttpSignalSink {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSignalSink {
    pub fn new(base_uri: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/signals", base_uri.trim_end_matches('/')),
            timeout: Duration::from_secs(5),
        }
    }

    /// Create with a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SignalSink for HttpSignalSink {
    fn send(&self, signal: Signal) -> BoxFuture<'static, Result<(), SinkError>> {
        let request = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&signal);

        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| SinkError::Delivery(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(SinkError::Status {
                    status: status.as_u16(),
                });
            }
            Ok(())
        })
    }
}

// =============================================================================
// Emitter
// =============================================================================

/// Builds and dispatches autocomplete signals.
pub struct SignalEmitter {
    sink: Arc<dyn SignalSink>,
    enabled: bool,
    realm: String,
    user: Option<CurrentUser>,
}

impl SignalEmitter {
    pub fn new(
        sink: Arc<dyn SignalSink>,
        enabled: bool,
        realm: impl Into<String>,
        user: Option<CurrentUser>,
    ) -> Self {
        Self {
            sink,
            enabled,
            realm: realm.into(),
            user,
        }
    }

    /// Emit one signal for an accepted suggestion.
    ///
    /// No-op unless emission is enabled and a current user is known.
    /// Returns whether a signal was handed to the sink.
    pub fn emit(&self, query: &str, template: &SignalTemplate) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(user) = &self.user else {
            tracing::debug!("No current user, skipping autocomplete signal");
            return false;
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, dropping autocomplete signal");
            return false;
        };

        let signal = Signal::autocomplete(
            query,
            template,
            user.principal(&self.realm),
            Utc::now().timestamp_millis(),
        );
        tracing::debug!("Emitting autocomplete signal for {:?}", query);

        let delivery = self.sink.send(signal);
        handle.spawn(async move {
            if let Err(e) = delivery.await {
                tracing::debug!("Signal delivery failed: {}", e);
            }
        });
        true
    }
}

// =============================================================================
// Recording Sink for Testing
// =============================================================================


// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    fn template() -> SignalTemplate {
        SignalTemplate {
            relevancy_model_name: "bm25".to_string(),
            relevancy_model_names: "bm25".to_string(),
            relevancy_model_version: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_emits_one_signal_with_user() {
        let sink = Arc::new(RecordingSink::new());
        let emitter = SignalEmitter::new(
            sink.clone(),
            true,
            "corp",
            Some(CurrentUser::new("ada")),
        );

        assert!(emitter.emit("jazz", &template()));

        let signals = sink.signals();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].doc_id, "jazz");
        assert_eq!(signals[0].signal_type, "autocomplete");
        assert_eq!(signals[0].principal, "ada@corp");
        assert_eq!(signals[0].relevancy_model_name, "bm25");
        assert!(signals[0].signal_timestamp > 0);
    }

    #[tokio::test]
    async fn test_disabled_emits_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let emitter = SignalEmitter::new(sink.clone(), false, "", Some(CurrentUser::new("ada")));

        assert!(!emitter.emit("jazz", &template()));
        assert!(sink.signals().is_empty());
    }

    #[tokio::test]
    async fn test_no_user_emits_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let emitter = SignalEmitter::new(sink.clone(), true, "", None);

        assert!(!emitter.emit("jazz", &template()));
        assert!(sink.signals().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_ignored() {
        let sink = Arc::new(RecordingSink::failing());
        let emitter = SignalEmitter::new(sink.clone(), true, "", Some(CurrentUser::new("ada")));

        assert!(emitter.emit("jazz", &template()));
        tokio::task::yield_now().await;
        assert_eq!(sink.signals().len(), 1);
    }

    #[test]
    fn test_http_sink_url() {
        let sink = HttpSignalSink::new("https://search.example.com/");
        assert_eq!(sink.url(), "https://search.example.com/signals");
    }
}
