//! Session state shared between the input widget and the searcher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query language understood by the searcher.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    /// Plain keyword search.
    #[default]
    Simple,
    /// Field-qualified query syntax.
    Advanced,
}

impl QueryLanguage {
    /// Wire name, as used in location query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryLanguage::Simple => "simple",
            QueryLanguage::Advanced => "advanced",
        }
    }
}

impl fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(QueryLanguage::Simple),
            "advanced" => Ok(QueryLanguage::Advanced),
            other => Err(format!("unknown query language: {}", other)),
        }
    }
}

/// Snapshot of the searcher's authoritative query state.
///
/// The widget never keeps one of these across an update cycle; every read
/// goes back to the searcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Current query text.
    pub query: String,

    /// Current query language.
    pub query_language: QueryLanguage,

    /// Whether a search has run in this session.
    pub have_searched: bool,
}

/// A client-side navigation target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// Route path, e.g. "/results".
    pub path: String,

    /// Encoded query string without the leading '?'.
    pub search: String,
}

impl Location {
    /// Create a location from a path and an encoded query string.
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            search: search.into(),
        }
    }

    /// Render as `path?search`, omitting the '?' when there are no params.
    pub fn href(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }
}
