//! Normalization of provider payloads into the shared [`Review`] model.

use chrono::{DateTime, Utc};
use rand::Rng;
use revhub_core::{BusinessSummary, Platform, Review, ReviewResponse};

use crate::client::PREFERRED_REVIEW_LANGUAGE;
use crate::types::{PlaceDetails, RawReview};

/// Rating assigned when the provider omits one.
pub const DEFAULT_RATING: u8 = 5;

pub const DEFAULT_AUTHOR: &str = "Anonymous";

const ID_SUFFIX_LEN: usize = 9;

/// Converts provider epoch seconds into an instant, falling back to the Unix
/// epoch when the value is out of range.
#[must_use]
pub fn epoch_to_instant(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Rounds a provider rating and clamps it into `1..=5`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_rating(rating: Option<f64>) -> u8 {
    match rating {
        Some(r) if r.is_finite() => r.round().clamp(1.0, 5.0) as u8,
        _ => DEFAULT_RATING,
    }
}

/// Builds a review id from the provider prefix, the review time and a random
/// suffix. The provider exposes no stable review id.
fn review_id(platform: &Platform, time: i64) -> String {
    let suffix: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{platform}_{time}_{suffix}")
}

/// Converts one provider review into a [`Review`] for `business_id`.
#[must_use]
pub fn normalize_review(raw: &RawReview, business_id: &str) -> Review {
    let platform = Platform::Google;
    let response = raw.author_reply.as_ref().map(|reply| ReviewResponse {
        content: reply.text.clone().unwrap_or_default(),
        date: epoch_to_instant(reply.time),
    });

    Review {
        id: review_id(&platform, raw.time),
        author: raw
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AUTHOR)
            .to_owned(),
        content: raw.text.clone().unwrap_or_default(),
        rating: normalize_rating(raw.rating),
        date: epoch_to_instant(raw.time),
        platform,
        business_id: business_id.to_owned(),
        profile_photo: raw.profile_photo_url.clone().filter(|url| !url.is_empty()),
        language: raw
            .language
            .clone()
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| PREFERRED_REVIEW_LANGUAGE.to_owned()),
        relative_time_description: raw
            .relative_time_description
            .clone()
            .filter(|desc| !desc.is_empty()),
        response,
    }
}

/// Extracts the location aggregate. A missing name becomes an empty string
/// and a missing count becomes zero.
#[must_use]
pub fn normalize_summary(details: &PlaceDetails) -> BusinessSummary {
    BusinessSummary {
        name: details.name.clone().unwrap_or_default(),
        rating: details.rating,
        total_reviews: details.user_ratings_total.unwrap_or(0),
    }
}
