//! Cross-platform review model shared by the aggregator and the reply
//! dispatcher.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review platform.
///
/// Unknown names are preserved in [`Platform::Other`] so that callers can
/// report which platform was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Google,
    Facebook,
    Other(String),
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Google => "google",
            Platform::Facebook => "facebook",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "google" => Platform::Google,
            "facebook" => Platform::Facebook,
            _ => Platform::Other(normalized),
        })
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(platform) => platform,
            Err(never) => match never {},
        }
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_owned()
    }
}

/// The business owner's published answer to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub content: String,
    pub date: DateTime<Utc>,
}

/// One customer review, normalized from whichever provider supplied it.
///
/// `rating` is always within `1..=5` and `content` is empty rather than
/// absent when the reviewer left no text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    pub rating: u8,
    pub date: DateTime<Utc>,
    pub platform: Platform,
    pub business_id: String,
    pub profile_photo: Option<String>,
    pub language: String,
    pub relative_time_description: Option<String>,
    pub response: Option<ReviewResponse>,
}

impl Review {
    #[must_use]
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

/// Provider-reported aggregate for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub name: String,
    pub rating: Option<f64>,
    pub total_reviews: u64,
}
