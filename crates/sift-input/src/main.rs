//! Sift terminal driver.
//!
//! Drives a `QueryInput` from stdin against an in-memory session and prints
//! the rendered view after every event.
//!
//! Commands:
//! - any text        stage the text (as if typed)
//! - `:enter`        commit the current query (Enter in the field)
//! - `:go`           press the submit button
//! - `:pick TEXT`    accept an autocomplete suggestion
//! - `:lang LANG`    switch to `simple` or `advanced`
//! - `:mic`          toggle the microphone

use std::sync::Arc;

use sift_core::{CurrentUser, InputConfig, QueryLanguage};
use sift_input::{InMemorySearcher, InputEvent, InputHandle, InputView, LogNavigator, QueryInput};
use tokio::io::{AsyncBufReadExt, BufReader};

// =============================================================================
// Configuration
// =============================================================================

fn load_config() -> InputConfig {
    match InputConfig::load() {
        Ok(config) => {
            tracing::info!("Config loaded");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config: {} - using defaults", e);
            InputConfig::default()
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Parse one input line into a widget event.
fn parse_command(line: &str, current_query: &str) -> Option<InputEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Some(InputEvent::TextChanged(line.to_string()));
    };

    let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "enter" => Some(InputEvent::KeyDown {
            key: sift_input::Key::Enter,
            text: current_query.to_string(),
        }),
        "go" => Some(InputEvent::Submit),
        "pick" if !arg.is_empty() => Some(InputEvent::SuggestionChosen(arg.to_string())),
        "lang" => match arg.parse::<QueryLanguage>() {
            Ok(language) => Some(InputEvent::LanguageSelected(language)),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        },
        "mic" => Some(InputEvent::MicrophoneToggled),
        _ => {
            tracing::warn!("Unknown command: {}", line);
            None
        }
    }
}

async fn read_commands(handle: InputHandle, searcher: Arc<InMemorySearcher>) {
    use sift_input::Searcher;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(event) = parse_command(&line, &searcher.query()) else {
                    continue;
                };
                if !handle.send(event) {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}

fn print_view(view: &InputView) {
    match serde_json::to_string(view) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to render view: {}", e),
    }
}

// =============================================================================
// Main
// =============================================================================

async fn run() {
    let config = load_config();
    let searcher = Arc::new(InMemorySearcher::new());

    let mut builder = QueryInput::builder(config)
        .searcher(searcher.clone())
        .navigator(Arc::new(LogNavigator));
    if let Ok(username) = std::env::var("SIFT_USER") {
        builder = builder.current_user(CurrentUser::new(username));
    }
    let (input, handle) = builder.build();

    let mut views = input.subscribe();
    print_view(&views.borrow_and_update());
    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            print_view(&view);
        }
    });

    tokio::spawn(read_commands(handle, searcher));
    input.run().await;

    if let Err(e) = printer.await {
        tracing::error!("View printer failed: {}", e);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Sift starting...");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(run());
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_input::Key;

    #[test]
    fn test_plain_line_stages() {
        assert!(matches!(
            parse_command("jazz", ""),
            Some(InputEvent::TextChanged(t)) if t == "jazz"
        ));
    }

    #[test]
    fn test_enter_uses_current_query() {
        assert!(matches!(
            parse_command(":enter", "jazz"),
            Some(InputEvent::KeyDown { key: Key::Enter, text }) if text == "jazz"
        ));
    }

    #[test]
    fn test_commands() {
        assert!(matches!(parse_command(":go", ""), Some(InputEvent::Submit)));
        assert!(matches!(
            parse_command(":pick jazz fusion", ""),
            Some(InputEvent::SuggestionChosen(t)) if t == "jazz fusion"
        ));
        assert!(matches!(
            parse_command(":lang advanced", ""),
            Some(InputEvent::LanguageSelected(QueryLanguage::Advanced))
        ));
        assert!(matches!(parse_command(":mic", ""), Some(InputEvent::MicrophoneToggled)));
        assert!(parse_command(":lang fuzzy", "").is_none());
        assert!(parse_command(":pick", "").is_none());
        assert!(parse_command(":nope", "").is_none());
    }
}
