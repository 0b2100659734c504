use revhub_core::ProviderBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplyError {
    /// Network failure. The request URL is stripped since it may carry an
    /// access token.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("{provider} responded with HTTP {status}: {body}")]
    Transport {
        provider: &'static str,
        status: u16,
        body: ProviderBody,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<reqwest::Error> for ReplyError {
    fn from(e: reqwest::Error) -> Self {
        ReplyError::Http(e.without_url())
    }
}
