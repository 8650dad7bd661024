//! Voice input adapter.
//!
//! A recognition session is a spawned task that resolves with exactly one
//! terminal `RecognitionEvent`. The adapter is `Idle` or `Recognizing`;
//! results are fed back through `finish`, which is the only transition out
//! of `Recognizing` apart from `cancel`.

use futures::future::BoxFuture;
use sift_core::RecognitionError;
use std::sync::Arc;
use tokio::task::AbortHandle;

// =============================================================================
// Recognizer Trait
// =============================================================================

/// Terminal outcome of one recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A final transcript.
    Final(String),
    /// A transcript the engine did not mark final.
    Interim(String),
    /// The engine failed.
    Error(RecognitionError),
}

/// Speech-to-text capability. Only present in some runtimes.
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the engine can be used right now.
    fn is_available(&self) -> bool;

    /// Start listening. Resolves with the session's terminal event.
    fn recognize(&self) -> BoxFuture<'static, RecognitionEvent>;

    /// Stop the active session, if any.
    fn stop(&self);
}

// =============================================================================
// Voice State
// =============================================================================

/// Voice adapter state.
#[derive(Debug, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    Recognizing {
        /// Session number, used to ignore results from cancelled sessions.
        session: u64,
        task: AbortHandle,
    },
}

/// Wraps an optional `SpeechRecognizer`.
pub struct VoiceInput {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    state: VoiceState,
    next_session: u64,
}

impl VoiceInput {
    /// Create the adapter. The recognizer is kept only if voice input was
    /// requested and the engine reports itself available.
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>, requested: bool) -> Self {
        let recognizer = if requested {
            match recognizer {
                Some(r) if r.is_available() => Some(r),
                _ => {
                    tracing::info!("Speech recognition not supported, hiding microphone");
                    None
                }
            }
        } else {
            None
        };

        Self {
            recognizer,
            state: VoiceState::Idle,
            next_session: 0,
        }
    }

    /// Whether the microphone control should be shown.
    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Whether a recognition session is active.
    pub fn is_recognizing(&self) -> bool {
        matches!(self.state, VoiceState::Recognizing { .. })
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }

    /// Start a recognition session. `deliver` receives the session number
    /// and terminal event, and must route them back to `finish`.
    ///
    /// Returns false if the capability is absent, a session is already
    /// active, or there is no runtime to run it on.
    pub fn start<F>(&mut self, deliver: F) -> bool
    where
        F: FnOnce(u64, RecognitionEvent) + Send + 'static,
    {
        let Some(recognizer) = &self.recognizer else {
            return false;
        };
        if self.is_recognizing() {
            return false;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, cannot start recognition");
            return false;
        };

        self.next_session += 1;
        let session = self.next_session;
        let listening = recognizer.recognize();
        let task = handle
            .spawn(async move {
                let event = listening.await;
                deliver(session, event);
            })
            .abort_handle();

        tracing::debug!("Recognition session {} started", session);
        self.state = VoiceState::Recognizing { session, task };
        true
    }

    /// Cancel the active session. No-op when idle.
    pub fn cancel(&mut self) {
        if let VoiceState::Recognizing { session, task } = std::mem::take(&mut self.state) {
            task.abort();
            if let Some(recognizer) = &self.recognizer {
                recognizer.stop();
            }
            tracing::debug!("Recognition session {} cancelled", session);
        }
    }

    /// Consume a terminal event. Returns the transcript to commit, if the
    /// event was a final result for the active session.
    pub fn finish(&mut self, session: u64, event: RecognitionEvent) -> Option<String> {
        match &self.state {
            VoiceState::Recognizing { session: active, .. } if *active == session => {}
            _ => {
                tracing::debug!("Ignoring result from inactive session {}", session);
                return None;
            }
        }

        self.state = VoiceState::Idle;
        if let Some(recognizer) = &self.recognizer {
            recognizer.stop();
        }

        match event {
            RecognitionEvent::Final(text) => {
                tracing::debug!("Recognition session {} final: {:?}", session, text);
                Some(text)
            }
            RecognitionEvent::Interim(text) => {
                tracing::debug!("Recognition session {} ended non-final: {:?}", session, text);
                None
            }
            RecognitionEvent::Error(e) => {
                tracing::debug!("Recognition session {} failed: {}", session, e);
                None
            }
        }
    }
}

// =============================================================================
// Mock Recognizer for Testing
// =============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Recognizer with a canned outcome. With no outcome set, sessions
    /// never finish on their own.
    pub struct MockRecognizer {
        pub available: bool,
        pub outcome: Mutex<Option<RecognitionEvent>>,
        pub stops: AtomicUsize,
    }

    impl MockRecognizer {
        pub fn new() -> Self {
            Self {
                available: true,
                outcome: Mutex::new(None),
                stops: AtomicUsize::new(0),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                available: false,
                ..Self::new()
            }
        }

        pub fn with_outcome(self, event: RecognitionEvent) -> Self {
            *self.outcome.lock() = Some(event);
            self
        }

        pub fn stop_count(&self) -> usize {
            self.stops.load(Ordering::SeqCst)
        }
    }

    impl Default for MockRecognizer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SpeechRecognizer for MockRecognizer {
        fn is_available(&self) -> bool {
            self.available
        }

        fn recognize(&self) -> BoxFuture<'static, RecognitionEvent> {
            match self.outcome.lock().clone() {
                Some(event) => Box::pin(async move { event }),
                None => Box::pin(futures::future::pending()),
            }
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
