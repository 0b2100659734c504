use revhub_core::Platform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub review_id: String,
    pub platform: Platform,
    pub message: String,
    #[serde(default)]
    pub business_id: Option<String>,
}

/// Result of a reply attempt.
///
/// A delivered reply carries the provider's `receipt`. A fallback carries a
/// `fallback_url` for replying by hand plus an `error` saying why. An
/// unsupported platform carries only an `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyOutcome {
    #[must_use]
    pub fn delivered(receipt: serde_json::Value) -> Self {
        Self {
            success: true,
            receipt: Some(receipt),
            fallback_url: None,
            error: None,
        }
    }

    #[must_use]
    pub fn fallback(url: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            receipt: None,
            fallback_url: Some(url),
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn unsupported(platform: &Platform) -> Self {
        Self {
            success: false,
            receipt: None,
            fallback_url: None,
            error: Some(format!("Replying to {platform} reviews is not supported.")),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        !self.success && self.fallback_url.is_some()
    }
}
