//! Response types for the place-details and find-place endpoints.
//!
//! ## Observed shape
//!
//! Both endpoints wrap their payload in an envelope with a `status` string.
//! `"OK"` means success; anything else (`"NOT_FOUND"`, `"REQUEST_DENIED"`,
//! `"INVALID_REQUEST"`, ...) is a failure even though the HTTP status is 200.
//! Find-place additionally answers `"ZERO_RESULTS"` when nothing matched.
//!
//! ### `reviews`
//! Only present when requested through `fields` and capped by the provider
//! (five entries in practice). `time` is epoch seconds. `text` may be absent
//! for rating-only reviews. `language` is absent for some older reviews.
//!
//! ### `author_reply`
//! Present only when the owner has answered; `time` is epoch seconds.

use serde::Deserialize;

/// Envelope returned by `GET details/json`.
#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

/// A single review as the provider returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub relative_time_description: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub author_reply: Option<RawAuthorReply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthorReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub time: i64,
}

/// Envelope returned by `GET findplacefromtext/json`.
#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub candidates: Vec<PlaceCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceCandidate {
    #[serde(default)]
    pub place_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_ignores_fields_it_does_not_use() {
        let raw: RawReview = serde_json::from_value(serde_json::json!({
            "author_name": "Léa",
            "author_url": "https://www.google.com/maps/contrib/1",
            "rating": 5,
            "time": 1_735_732_800
        }))
        .unwrap();
        assert_eq!(raw.author_name.as_deref(), Some("Léa"));
        assert_eq!(raw.time, 1_735_732_800);
    }
}
