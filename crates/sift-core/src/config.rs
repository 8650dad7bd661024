//! Configuration types.
//!
//! The input widget is configured once by its host and the configuration is
//! immutable for the widget's lifetime. The terminal driver reads it from
//! `input.toml` in the Sift config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::session::QueryLanguage;
use crate::signal::SignalTemplate;

/// Widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Placeholder shown while the simple query language is active.
    pub placeholder_simple: String,

    /// Placeholder shown while the advanced query language is active.
    pub placeholder_advanced: String,

    /// Show the simple/advanced language selector.
    pub allow_language_select: bool,

    /// Request the microphone control. Only shown if speech recognition is
    /// actually available at runtime.
    pub allow_voice_input: bool,

    /// Relative autocomplete endpoint. `None` means a plain text field.
    pub auto_complete_uri: Option<String>,

    /// Base URI for the suggestion feed and the signal sink.
    pub base_uri: String,

    /// Submit button label.
    pub button_label: String,

    /// Route to navigate to after a first search, e.g. "/results".
    pub route: Option<String>,

    /// Share-this-search settings.
    pub share: ShareConfig,

    /// Emit a telemetry signal when an autocomplete suggestion is accepted.
    pub emit_autocomplete_signals: bool,

    /// Relevancy model fields copied into emitted signals.
    pub signal_template: SignalTemplate,

    /// Realm used to build signal principals when the user carries none.
    pub realm: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            placeholder_simple: "Search...".to_string(),
            placeholder_advanced: "Enter an advanced query...".to_string(),
            allow_language_select: false,
            allow_voice_input: false,
            auto_complete_uri: None,
            base_uri: String::new(),
            button_label: "Go".to_string(),
            route: None,
            share: ShareConfig::default(),
            emit_autocomplete_signals: false,
            signal_template: SignalTemplate::default(),
            realm: String::new(),
        }
    }
}

impl InputConfig {
    /// Placeholder for the given query language.
    pub fn placeholder(&self, language: QueryLanguage) -> &str {
        match language {
            QueryLanguage::Simple => &self.placeholder_simple,
            QueryLanguage::Advanced => &self.placeholder_advanced,
        }
    }

    /// Whether the input is autocomplete-backed.
    pub fn autocomplete_enabled(&self) -> bool {
        self.auto_complete_uri
            .as_deref()
            .is_some_and(|uri| !uri.is_empty())
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }
}

/// Share-this-search settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    pub enabled: bool,
    pub message: String,
    pub subject: String,
    pub recipient: String,
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sift"))
}

/// Get the path to input.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("input.toml"))
}
