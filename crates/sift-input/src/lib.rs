//! Query entry widget core for the Sift search client.
//!
//! This crate provides the presentation-independent half of the search box:
//! - `QueryInput`, the event-driven widget and its rendered `InputView`
//! - `QueryCoordinator`, the stage/commit state machine over the session
//! - Suggestion feed, voice input, language toggle and signal emission
//! - The `Searcher` session contract and an in-memory implementation

pub mod coordinator;
pub mod feed;
pub mod language;
pub mod navigation;
pub mod searcher;
pub mod share;
pub mod signal;
pub mod voice;
pub mod widget;

// Re-export commonly used types
pub use coordinator::{QueryCoordinator, UpdateOutcome};
pub use feed::{HttpSuggestionSource, SuggestionFeed, SuggestionSource, MIN_SUGGESTION_CHARS};
pub use language::LanguageToggle;
pub use navigation::{LogNavigator, Navigator};
pub use searcher::{InMemorySearcher, Searcher};
pub use signal::{HttpSignalSink, SignalEmitter, SignalSink};
pub use voice::{RecognitionEvent, SpeechRecognizer, VoiceInput, VoiceState};
pub use widget::{InputEvent, InputHandle, InputView, Key, QueryInput, QueryInputBuilder};
