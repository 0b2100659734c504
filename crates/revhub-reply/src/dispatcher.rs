//! Routes replies to the provider matching the review's platform.
//!
//! Each call makes at most one outbound request and never retries. Missing
//! credentials and failed provider calls both produce a fallback outcome
//! with a manual-reply link; only unsupported platforms are hard failures.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use revhub_core::{AppConfig, Platform, ProviderBody, ReplyCredentials};

use crate::error::ReplyError;
use crate::fallback::{facebook_manual_reply_url, google_manual_reply_url};
use crate::types::{ReplyOutcome, ReplyRequest};
use crate::{facebook, google};

pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://mybusiness.googleapis.com/v4/";
pub const DEFAULT_FACEBOOK_BASE_URL: &str = "https://graph.facebook.com/v19.0/";

pub struct ReplyDispatcher {
    client: Client,
    credentials: ReplyCredentials,
    google_base_url: Url,
    facebook_base_url: Url,
}

impl ReplyDispatcher {
    /// Creates a dispatcher pointed at the production provider endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        credentials: ReplyCredentials,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ReplyError> {
        Self::with_base_urls(
            credentials,
            timeout_secs,
            user_agent,
            DEFAULT_GOOGLE_BASE_URL,
            DEFAULT_FACEBOOK_BASE_URL,
        )
    }

    /// Builds a dispatcher from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReplyError> {
        Self::new(
            config.reply.clone(),
            config.http_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a dispatcher with custom provider base URLs (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Http`] if the HTTP client cannot be constructed
    /// or [`ReplyError::InvalidBaseUrl`] if a base URL does not parse.
    pub fn with_base_urls(
        credentials: ReplyCredentials,
        timeout_secs: u64,
        user_agent: &str,
        google_base_url: &str,
        facebook_base_url: &str,
    ) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            credentials,
            google_base_url: parse_base_url(google_base_url)?,
            facebook_base_url: parse_base_url(facebook_base_url)?,
        })
    }

    /// Submits `request` to the provider for its platform.
    pub async fn submit_reply(&self, request: &ReplyRequest) -> ReplyOutcome {
        match &request.platform {
            Platform::Google => self.reply_google(request).await,
            Platform::Facebook => self.reply_facebook(request).await,
            other @ Platform::Other(_) => {
                tracing::warn!(
                    platform = %other,
                    review_id = %request.review_id,
                    "reply requested for unsupported platform"
                );
                ReplyOutcome::unsupported(other)
            }
        }
    }

    async fn reply_google(&self, request: &ReplyRequest) -> ReplyOutcome {
        let business_id = request.business_id.as_deref();
        let fallback_url = google_manual_reply_url(business_id);

        let Some(target) = google::GoogleTarget::from_credentials(&self.credentials, business_id)
        else {
            tracing::info!(
                review_id = %request.review_id,
                "Google reply integration not configured, returning manual reply link"
            );
            return ReplyOutcome::fallback(
                fallback_url,
                "Automatic replies to Google reviews are not configured. Reply manually using the link.",
            );
        };

        match google::put_reply(
            &self.client,
            &self.google_base_url,
            &target,
            &request.review_id,
            &request.message,
        )
        .await
        {
            Ok(receipt) => {
                tracing::debug!(review_id = %request.review_id, "Google reply delivered");
                ReplyOutcome::delivered(receipt)
            }
            Err(e) => {
                tracing::warn!(
                    review_id = %request.review_id,
                    error = %e,
                    "Google reply failed, returning manual reply link"
                );
                ReplyOutcome::fallback(fallback_url, e.to_string())
            }
        }
    }

    async fn reply_facebook(&self, request: &ReplyRequest) -> ReplyOutcome {
        let fallback_url = facebook_manual_reply_url(request.business_id.as_deref());

        let Some(access_token) = self.credentials.facebook_access_token.as_deref() else {
            tracing::info!(
                review_id = %request.review_id,
                "Facebook reply integration not configured, returning manual reply link"
            );
            return ReplyOutcome::fallback(
                fallback_url,
                "Automatic replies to Facebook reviews are not configured. Reply manually using the link.",
            );
        };

        match facebook::post_comment(
            &self.client,
            &self.facebook_base_url,
            access_token,
            &request.review_id,
            &request.message,
        )
        .await
        {
            Ok(receipt) => {
                tracing::debug!(review_id = %request.review_id, "Facebook reply delivered");
                ReplyOutcome::delivered(receipt)
            }
            Err(e) => {
                tracing::warn!(
                    review_id = %request.review_id,
                    error = %e,
                    "Facebook reply failed, returning manual reply link"
                );
                ReplyOutcome::fallback(fallback_url, e.to_string())
            }
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ReplyError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ReplyError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn append_segments(base: &Url, segments: &[&str]) -> Result<Url, ReplyError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ReplyError::InvalidBaseUrl {
            base_url: base.to_string(),
            reason: "base URL cannot have path segments".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turns a provider response into a receipt, or a transport error carrying
/// the status and the best-effort body.
pub(crate) async fn read_receipt(
    response: Response,
    provider: &'static str,
) -> Result<serde_json::Value, ReplyError> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ReplyError::Transport {
            provider,
            status: status.as_u16(),
            body: ProviderBody::parse(&text),
        });
    }

    let text = response.text().await?;

    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(ProviderBody::parse(&text).into_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_segments_encodes_and_joins() {
        let base = parse_base_url("https://mybusiness.googleapis.com/v4").unwrap();
        let url = append_segments(&base, &["accounts", "a/b", "reply"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://mybusiness.googleapis.com/v4/accounts/a%2Fb/reply"
        );
    }

    #[test]
    fn base_url_must_parse() {
        assert!(matches!(
            parse_base_url("::nope"),
            Err(ReplyError::InvalidBaseUrl { .. })
        ));
    }
}
