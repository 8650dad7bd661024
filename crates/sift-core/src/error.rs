//! Error types for the Sift query input.
//!
//! None of these reach the user. The widget logs them at its boundary with
//! the collaborator that produced them.

use std::time::Duration;
use thiserror::Error;

/// Suggestion feed errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure.
    #[error("Suggestion request failed: {0}")]
    Request(String),

    /// Non-success HTTP status.
    #[error("Suggestion endpoint returned status {status}")]
    Status { status: u16 },

    /// Response body was not a list of strings.
    #[error("Could not decode suggestions: {0}")]
    Decode(String),

    /// Request took too long.
    #[error("Suggestion request timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Decode(e.to_string())
    }
}

/// Telemetry delivery errors.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Signal delivery failed: {0}")]
    Delivery(String),

    #[error("Signal endpoint returned status {status}")]
    Status { status: u16 },
}

/// Speech recognition errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognitionError {
    /// No recognition engine in this runtime.
    #[error("Speech recognition is not available")]
    Unavailable,

    /// The engine heard nothing it could transcribe.
    #[error("No speech detected")]
    NoSpeech,

    /// Recognition was stopped before a result arrived.
    #[error("Recognition aborted")]
    Aborted,

    /// Engine-specific failure.
    #[error("Recognition engine error: {0}")]
    Engine(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
