//! Google Business Profile reply endpoint.

use reqwest::{Client, Url};
use revhub_core::ReplyCredentials;

use crate::dispatcher::{append_segments, read_receipt};
use crate::error::ReplyError;

pub(crate) const PROVIDER: &str = "Google Business Profile";

/// Everything needed to address a review reply.
pub(crate) struct GoogleTarget<'a> {
    access_token: &'a str,
    account_id: &'a str,
    location_id: &'a str,
}

impl<'a> GoogleTarget<'a> {
    /// `None` unless a token, an account and a location are all known. The
    /// location falls back to `business_id` when not configured.
    pub(crate) fn from_credentials(
        credentials: &'a ReplyCredentials,
        business_id: Option<&'a str>,
    ) -> Option<Self> {
        let location_id = credentials
            .google_location_id
            .as_deref()
            .or(business_id)
            .filter(|id| !id.trim().is_empty())?;
        Some(Self {
            access_token: credentials.google_access_token.as_deref()?,
            account_id: credentials.google_account_id.as_deref()?,
            location_id,
        })
    }
}

/// `PUT accounts/{account}/locations/{location}/reviews/{review}/reply`.
pub(crate) async fn put_reply(
    client: &Client,
    base_url: &Url,
    target: &GoogleTarget<'_>,
    review_id: &str,
    message: &str,
) -> Result<serde_json::Value, ReplyError> {
    let url = append_segments(
        base_url,
        &[
            "accounts",
            target.account_id,
            "locations",
            target.location_id,
            "reviews",
            review_id,
            "reply",
        ],
    )?;

    let response = client
        .put(url)
        .bearer_auth(target.access_token)
        .json(&serde_json::json!({ "comment": message }))
        .send()
        .await?;

    read_receipt(response, PROVIDER).await
}
