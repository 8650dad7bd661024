//! Telemetry signal records.

use serde::{Deserialize, Serialize};

/// Signal type recorded when an autocomplete suggestion is accepted.
pub const AUTOCOMPLETE_SIGNAL_TYPE: &str = "autocomplete";

/// The authenticated user, as handed to the widget by its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Login name.
    pub username: String,

    /// Authentication realm, if the host knows it. Falls back to the
    /// configured realm when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
}

impl CurrentUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            realm: None,
        }
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Principal string for signal records: `username@realm`, or the bare
    /// username when no realm is known.
    pub fn principal(&self, default_realm: &str) -> String {
        let realm = self.realm.as_deref().unwrap_or(default_realm);
        if realm.is_empty() {
            self.username.clone()
        } else {
            format!("{}@{}", self.username, realm)
        }
    }
}

/// Relevancy model fields copied into every emitted signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalTemplate {
    pub relevancy_model_name: String,
    pub relevancy_model_names: String,
    pub relevancy_model_version: String,
}

/// One telemetry record. Built fresh per emission and handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// The committed query text.
    pub doc_id: String,
    pub feature_vector: String,
    pub locale: String,
    pub principal: String,
    pub relevancy_model_name: String,
    pub relevancy_model_names: String,
    pub relevancy_model_version: String,
    /// Epoch milliseconds.
    pub signal_timestamp: i64,
    #[serde(rename = "type")]
    pub signal_type: String,
    pub weight: u32,
}

impl Signal {
    /// Build an autocomplete acceptance signal.
    pub fn autocomplete(
        doc_id: impl Into<String>,
        template: &SignalTemplate,
        principal: impl Into<String>,
        signal_timestamp: i64,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            feature_vector: String::new(),
            locale: "en".to_string(),
            principal: principal.into(),
            relevancy_model_name: template.relevancy_model_name.clone(),
            relevancy_model_names: template.relevancy_model_names.clone(),
            relevancy_model_version: template.relevancy_model_version.clone(),
            signal_timestamp,
            signal_type: AUTOCOMPLETE_SIGNAL_TYPE.to_string(),
            weight: 1,
        }
    }
}
