//! HTTP client for the review provider's place endpoints.
//!
//! Requests go to a configurable base URL, normally the application's proxy
//! in front of the provider, which this client treats as an opaque
//! pass-through. Transport failures (non-2xx) and provider failures (HTTP 200
//! with a failure `status`) surface as distinct [`PlacesError`] variants.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Url};
use revhub_core::{BusinessSummary, ProviderBody, Review};
use serde::{Deserialize, Serialize};

use crate::error::PlacesError;
use crate::filter::{sort_reviews, InvalidQueryValue, ReviewFilters, SortOrder};
use crate::normalize::{normalize_review, normalize_summary};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{FindPlaceResponse, PlaceDetails, PlaceDetailsResponse};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Language requested for every details call. The product serves a
/// French-speaking market, so reviews in that language are preferred.
pub const PREFERRED_REVIEW_LANGUAGE: &str = "fr";

/// Maximum number of reviews the provider returns per location.
pub const PROVIDER_REVIEW_CAP: usize = 5;

/// Attached to every full-mode response.
pub const LIMITATIONS_NOTICE: &str = "The review provider returns at most 5 reviews per location. \
     Filters and sorting apply to those reviews only, not to the business's full review history.";

const SUMMARY_FIELDS: &str = "name,rating,user_ratings_total";
const FULL_FIELDS: &str = "name,rating,user_ratings_total,reviews";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Business summary only; individual reviews are withheld.
    Preview,
    #[default]
    Full,
}

impl FromStr for FetchMode {
    type Err = InvalidQueryValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "preview" => Ok(FetchMode::Preview),
            "full" => Ok(FetchMode::Full),
            other => Err(InvalidQueryValue {
                field: "mode",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchMode::Preview => "preview",
            FetchMode::Full => "full",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQuery {
    #[serde(default)]
    pub filters: ReviewFilters,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Result of one aggregation call.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewsPage {
    pub business: BusinessSummary,
    pub reviews: Vec<Review>,
    /// Partial-data warning; `None` in preview mode.
    pub limitations: Option<String>,
}

/// Client for the review provider.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a proxy or a mock server.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl PlacesClient {
    /// Creates a client pointed at the provider's public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so endpoint paths join under the base
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            retry: RetryPolicy::NONE,
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches the business summary and, in [`FetchMode::Full`], its
    /// normalized reviews filtered and sorted per `query`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Transport`] on a non-2xx response, carrying the status
    ///   and the parsed (or raw) body.
    /// - [`PlacesError::Provider`] when the payload status is not `"OK"`.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn fetch_reviews(
        &self,
        place_id: &str,
        mode: FetchMode,
        query: &ReviewQuery,
    ) -> Result<ReviewsPage, PlacesError> {
        let details = self.fetch_place_details(place_id, mode).await?;
        let business = normalize_summary(&details);

        if mode == FetchMode::Preview {
            return Ok(ReviewsPage {
                business,
                reviews: Vec::new(),
                limitations: None,
            });
        }

        let fetched = details.reviews.len();
        let normalized: Vec<Review> = details
            .reviews
            .iter()
            .map(|raw| normalize_review(raw, place_id))
            .collect();
        let mut reviews = query.filters.apply(normalized);
        sort_reviews(&mut reviews, query.sort);

        tracing::debug!(
            place_id,
            fetched,
            kept = reviews.len(),
            sort = %query.sort,
            "aggregated provider reviews"
        );

        Ok(ReviewsPage {
            business,
            reviews,
            limitations: Some(LIMITATIONS_NOTICE.to_owned()),
        })
    }

    /// Calls the details endpoint and returns the raw result.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::fetch_reviews`].
    pub async fn fetch_place_details(
        &self,
        place_id: &str,
        mode: FetchMode,
    ) -> Result<PlaceDetails, PlacesError> {
        let fields = match mode {
            FetchMode::Preview => SUMMARY_FIELDS,
            FetchMode::Full => FULL_FIELDS,
        };
        let url = self.build_url(
            "details/json",
            &[
                ("place_id", place_id),
                ("fields", fields),
                ("language", PREFERRED_REVIEW_LANGUAGE),
            ],
        )?;

        let body = self.get_json(&url).await?;
        let envelope: PlaceDetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        if envelope.status != "OK" {
            tracing::warn!(
                place_id,
                status = %envelope.status,
                "review provider returned a failure status"
            );
            return Err(PlacesError::Provider {
                status: envelope.status,
                message: envelope.error_message,
            });
        }

        Ok(envelope.result.unwrap_or_default())
    }

    /// Looks up a place by free text and returns the first candidate's id.
    ///
    /// Any failure is logged and reported as `None`, the same as no match.
    pub async fn find_place_from_text(&self, query: &str) -> Option<String> {
        match self.try_find_place_from_text(query).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "text search failed, treating as not found");
                None
            }
        }
    }

    /// Like [`PlacesClient::find_place_from_text`] but keeps the error.
    ///
    /// # Errors
    ///
    /// Same classes as [`PlacesClient::fetch_reviews`]; `"ZERO_RESULTS"` is
    /// `Ok(None)`, not an error.
    pub async fn try_find_place_from_text(
        &self,
        query: &str,
    ) -> Result<Option<String>, PlacesError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let url = self.build_url(
            "findplacefromtext/json",
            &[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "place_id"),
            ],
        )?;

        let body = self.get_json(&url).await?;
        let envelope: FindPlaceResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("findplacefromtext(input={query})"),
                source: e,
            })?;

        match envelope.status.as_str() {
            "OK" => Ok(envelope
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.place_id)
                .filter(|id| !id.is_empty())),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(PlacesError::Provider {
                status: envelope.status,
                message: envelope.error_message,
            }),
        }
    }

    /// Builds an endpoint URL under the base with percent-encoded query
    /// parameters.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        retry_with_backoff(self.retry, || {
            let url = url.clone();
            async move { self.request_json(&url).await }
        })
        .await
    }

    /// Sends one GET and parses the body as JSON.
    ///
    /// A non-2xx status wins over a malformed body: the body is kept as raw
    /// text in that case.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                endpoint = url.path(),
                status = status.as_u16(),
                "review provider request failed"
            );
            return Err(PlacesError::Transport {
                status: status.as_u16(),
                body: ProviderBody::parse(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
