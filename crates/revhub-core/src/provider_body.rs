//! Defensive parsing of provider response bodies.

use serde::Serialize;

/// A response body returned by an external provider.
///
/// Error bodies are parsed as JSON when possible and kept as raw text
/// otherwise, so a malformed body never hides the status it came with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderBody {
    Json(serde_json::Value),
    Text(String),
}

impl ProviderBody {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => ProviderBody::Json(value),
            Err(_) => ProviderBody::Text(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        match self {
            ProviderBody::Json(value) => value,
            ProviderBody::Text(text) => serde_json::Value::String(text),
        }
    }
}

impl std::fmt::Display for ProviderBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderBody::Json(value) => write!(f, "{value}"),
            ProviderBody::Text(text) => f.write_str(text),
        }
    }
}
