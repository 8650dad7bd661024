//! Core types for the Sift query input.
//!
//! This crate contains shared data structures used by the input widget and
//! its collaborators:
//! - Session state and query language
//! - Navigation targets
//! - Telemetry signal records
//! - Configuration types
//! - Error types

mod config;
mod error;
mod session;
mod signal;

pub use config::{config_dir, config_path, InputConfig, ShareConfig};
pub use error::{ConfigError, FeedError, RecognitionError, SinkError};
pub use session::{Location, QueryLanguage, SessionState};
pub use signal::{CurrentUser, Signal, SignalTemplate, AUTOCOMPLETE_SIGNAL_TYPE};
