//! Facebook Graph API comment endpoint.

use reqwest::{Client, Url};

use crate::dispatcher::{append_segments, read_receipt};
use crate::error::ReplyError;

pub(crate) const PROVIDER: &str = "Facebook Graph API";

/// `POST {review_id}/comments?access_token=...`.
pub(crate) async fn post_comment(
    client: &Client,
    base_url: &Url,
    access_token: &str,
    review_id: &str,
    message: &str,
) -> Result<serde_json::Value, ReplyError> {
    let mut url = append_segments(base_url, &[review_id, "comments"])?;
    url.query_pairs_mut()
        .append_pair("access_token", access_token);

    let response = client
        .post(url)
        .json(&serde_json::json!({ "message": message }))
        .send()
        .await?;

    read_receipt(response, PROVIDER).await
}
