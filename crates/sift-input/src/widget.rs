//! The query input widget.
//!
//! `QueryInput` owns the widget-private state (suggestions, voice session)
//! and a `QueryCoordinator` for everything that touches the session. All
//! events, user-originated or async completions, go through
//! `QueryInput::handle` on a single task. Async work is spawned and posts
//! its result back onto the same event channel.
//!
//! After every event the widget re-reads the session and broadcasts a fresh
//! `InputView` over a `tokio::sync::watch` channel.

use serde::Serialize;
use sift_core::{CurrentUser, FeedError, InputConfig, Location, QueryLanguage};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::coordinator::QueryCoordinator;
use crate::feed::{HttpSuggestionSource, SuggestionFeed, SuggestionSource};
use crate::language::LanguageToggle;
use crate::navigation::{LogNavigator, Navigator};
use crate::searcher::Searcher;
use crate::share::share_link;
use crate::signal::{HttpSignalSink, SignalEmitter, SignalSink};
use crate::voice::{RecognitionEvent, SpeechRecognizer, VoiceInput};

// =============================================================================
// Events
// =============================================================================

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Everything that can happen to the widget.
#[derive(Debug)]
pub enum InputEvent {
    /// The text field changed.
    TextChanged(String),
    /// A key was pressed in the text field. `text` is the field's content.
    KeyDown { key: Key, text: String },
    /// An autocomplete suggestion was picked.
    SuggestionChosen(String),
    /// The microphone control was activated.
    MicrophoneToggled,
    /// A query language was picked from the selector.
    LanguageSelected(QueryLanguage),
    /// The submit button was activated.
    Submit,
    /// A suggestion request completed.
    SuggestionsArrived {
        generation: u64,
        result: Result<Vec<String>, FeedError>,
    },
    /// A recognition session ended.
    VoiceFinished { session: u64, event: RecognitionEvent },
}

// =============================================================================
// Rendered View
// =============================================================================

/// What the presentation layer draws. Rebuilt from fresh session reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub query: String,
    pub query_language: QueryLanguage,
    pub placeholder: String,
    /// Static: autocomplete-backed input rather than a plain field.
    pub autocomplete: bool,
    pub suggestions: Vec<String>,
    pub recognizing: bool,
    pub show_language_select: bool,
    pub show_microphone: bool,
    pub button_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
}

// =============================================================================
// Handle
// =============================================================================

/// Sends events to a running widget. Dropping every handle stops
/// `QueryInput::run` once in-flight async work has finished.
#[derive(Debug, Clone)]
pub struct InputHandle {
    tx: mpsc::UnboundedSender<InputEvent>,
}

impl InputHandle {
    /// Queue an event. Returns false if the widget is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn type_text(&self, text: impl Into<String>) -> bool {
        self.send(InputEvent::TextChanged(text.into()))
    }

    pub fn press_enter(&self, text: impl Into<String>) -> bool {
        self.send(InputEvent::KeyDown {
            key: Key::Enter,
            text: text.into(),
        })
    }

    pub fn choose_suggestion(&self, text: impl Into<String>) -> bool {
        self.send(InputEvent::SuggestionChosen(text.into()))
    }

    pub fn submit(&self) -> bool {
        self.send(InputEvent::Submit)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Wires a `QueryInput` to its collaborators.
pub struct QueryInputBuilder {
    config: InputConfig,
    searcher: Option<Arc<dyn Searcher>>,
    navigator: Option<Arc<dyn Navigator>>,
    suggestion_source: Option<Arc<dyn SuggestionSource>>,
    signal_sink: Option<Arc<dyn SignalSink>>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    user: Option<CurrentUser>,
}

impl QueryInputBuilder {
    /// The shared search session. Without one, every session operation is
    /// a no-op.
    pub fn searcher(mut self, searcher: Arc<dyn Searcher>) -> Self {
        self.searcher = Some(searcher);
        self
    }

    /// Defaults to a navigator that only logs.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Defaults to `HttpSuggestionSource`.
    pub fn suggestion_source(mut self, source: Arc<dyn SuggestionSource>) -> Self {
        self.suggestion_source = Some(source);
        self
    }

    /// Defaults to `HttpSignalSink` on the configured base URI.
    pub fn signal_sink(mut self, sink: Arc<dyn SignalSink>) -> Self {
        self.signal_sink = Some(sink);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn current_user(mut self, user: CurrentUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn build(self) -> (QueryInput, InputHandle) {
        let config = self.config;

        let feed = config.auto_complete_uri.as_deref().and_then(|uri| {
            if uri.is_empty() {
                return None;
            }
            let source = self
                .suggestion_source
                .unwrap_or_else(|| Arc::new(HttpSuggestionSource::new()));
            Some(SuggestionFeed::new(source, &config.base_uri, uri))
        });

        let sink = self
            .signal_sink
            .unwrap_or_else(|| Arc::new(HttpSignalSink::new(&config.base_uri)));
        let emitter = SignalEmitter::new(
            sink,
            config.emit_autocomplete_signals,
            config.realm.clone(),
            self.user,
        );

        let navigator = self.navigator.unwrap_or_else(|| Arc::new(LogNavigator));
        let coordinator = QueryCoordinator::new(
            self.searcher.clone(),
            navigator,
            config.route.clone(),
            emitter,
        );
        let language = LanguageToggle::new(self.searcher);
        let voice = VoiceInput::new(self.recognizer, config.allow_voice_input);

        let (tx, rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(InputView::default());

        let input = QueryInput {
            config,
            coordinator,
            feed,
            voice,
            language,
            events_tx: tx.downgrade(),
            events_rx: rx,
            view_tx,
        };
        input.publish();

        (input, InputHandle { tx })
    }
}

// =============================================================================
// QueryInput
// =============================================================================

/// The query input widget.
pub struct QueryInput {
    config: InputConfig,
    coordinator: QueryCoordinator,
    feed: Option<SuggestionFeed>,
    voice: VoiceInput,
    language: LanguageToggle,
    events_tx: mpsc::WeakUnboundedSender<InputEvent>,
    events_rx: mpsc::UnboundedReceiver<InputEvent>,
    view_tx: watch::Sender<InputView>,
}

impl QueryInput {
    pub fn builder(config: InputConfig) -> QueryInputBuilder {
        QueryInputBuilder {
            config,
            searcher: None,
            navigator: None,
            suggestion_source: None,
            signal_sink: None,
            recognizer: None,
            user: None,
        }
    }

    /// Subscribe to rendered views.
    pub fn subscribe(&self) -> watch::Receiver<InputView> {
        self.view_tx.subscribe()
    }

    /// Process events until every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!("Query input started");
        while let Some(event) = self.events_rx.recv().await {
            self.handle(event);
        }
        tracing::info!("Query input stopped");
    }

    /// Wait for and process one queued event. Returns false once the
    /// channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Apply one event, then re-render.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::TextChanged(text) => {
                self.coordinator.update_query(&text, false, None);
                self.request_suggestions(&text);
            }
            InputEvent::KeyDown {
                key: Key::Enter,
                text,
            } => {
                let outcome = self.coordinator.update_query(&text, true, None);
                tracing::debug!("Enter: {:?}", outcome);
            }
            InputEvent::KeyDown { .. } => {}
            InputEvent::SuggestionChosen(text) => self.accept_suggestion(&text),
            InputEvent::MicrophoneToggled => self.toggle_microphone(),
            InputEvent::LanguageSelected(language) => {
                if self.config.allow_language_select {
                    self.language.set_language(language);
                } else {
                    tracing::debug!("Language selector disabled, ignoring {}", language);
                }
            }
            InputEvent::Submit => {
                let outcome = self.coordinator.submit();
                tracing::debug!("Submit: {:?}", outcome);
            }
            InputEvent::SuggestionsArrived { generation, result } => {
                if let Some(feed) = &mut self.feed {
                    feed.apply(generation, result);
                }
            }
            InputEvent::VoiceFinished { session, event } => {
                if let Some(transcript) = self.voice.finish(session, event) {
                    self.coordinator.search_now(&transcript);
                }
            }
        }

        self.publish();
    }

    /// Build the view from the session's current state.
    pub fn render(&self) -> InputView {
        let state = self
            .coordinator
            .searcher()
            .map(|searcher| searcher.state())
            .unwrap_or_default();

        InputView {
            placeholder: self.config.placeholder(state.query_language).to_string(),
            share_link: self.share_link(),
            query: state.query,
            query_language: state.query_language,
            autocomplete: self.feed.is_some(),
            suggestions: self
                .feed
                .as_ref()
                .map(|feed| feed.suggestions().to_vec())
                .unwrap_or_default(),
            recognizing: self.voice.is_recognizing(),
            show_language_select: self.config.allow_language_select,
            show_microphone: self.voice.is_available(),
            button_label: self.config.button_label.clone(),
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.render());
    }

    fn accept_suggestion(&mut self, text: &str) {
        if self.feed.is_none() {
            tracing::debug!("Suggestion chosen without autocomplete, ignoring");
            return;
        }
        // Picking a suggestion replaces the field text before committing,
        // so a re-run searches for the suggestion rather than the prefix.
        self.coordinator.update_query(text, false, None);
        let outcome =
            self.coordinator
                .update_query(text, true, Some(&self.config.signal_template));
        tracing::debug!("Suggestion {:?} accepted: {:?}", text, outcome);
    }

    fn request_suggestions(&mut self, text: &str) {
        let Some(feed) = &mut self.feed else {
            return;
        };
        let Some(request) = feed.input_changed(text) else {
            return;
        };
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, cannot fetch suggestions");
            return;
        };

        let generation = request.generation;
        handle.spawn(async move {
            let result = request.response.await;
            let _ = tx.send(InputEvent::SuggestionsArrived { generation, result });
        });
    }

    fn toggle_microphone(&mut self) {
        if self.voice.is_recognizing() {
            self.voice.cancel();
            return;
        }
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };
        self.voice.start(move |session, event| {
            let _ = tx.send(InputEvent::VoiceFinished { session, event });
        });
    }

    fn share_link(&self) -> Option<String> {
        if !self.config.share.enabled {
            return None;
        }
        let searcher = self.coordinator.searcher()?;
        let location = Location::new(
            self.config.route.clone().unwrap_or_default(),
            searcher.generate_location_query_string(&searcher.state()),
        );
        let url = format!("{}{}", self.config.base_uri, location.href());
        share_link(&self.config.share, &url)
    }
}

impl Drop for QueryInput {
    fn drop(&mut self) {
        self.voice.cancel();
    }
}

// =============================================================================
// Tests
// =============================================================================
