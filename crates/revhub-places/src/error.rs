use revhub_core::ProviderBody;
use thiserror::Error;

/// Errors returned by the review-provider client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client. The request
    /// URL is stripped: it carries the API key.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The provider (or the proxy in front of it) answered with a non-2xx status.
    #[error("provider responded with HTTP {status}: {body}")]
    Transport { status: u16, body: ProviderBody },

    /// HTTP 200 whose payload carries a failure `status` string.
    #[error("provider returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Provider {
        status: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        PlacesError::Http(e.without_url())
    }
}

impl PlacesError {
    /// Message suitable for end users; diagnostic detail stays in `Display`.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            PlacesError::Http(_) => "The review provider could not be reached.",
            PlacesError::Transport { .. } => "The review provider rejected the request.",
            PlacesError::Provider { .. } => {
                "The review provider could not return data for this business."
            }
            PlacesError::Deserialize { .. } => "The review provider returned an unexpected response.",
            PlacesError::InvalidBaseUrl { .. } => "The review provider is misconfigured.",
        }
    }

    /// `true` when the provider no longer recognises the identifier, so the
    /// caller should drop its cached value and resolve again.
    #[must_use]
    pub fn is_stale_identifier(&self) -> bool {
        matches!(
            self,
            PlacesError::Provider { status, .. }
                if status == "NOT_FOUND" || status == "INVALID_REQUEST"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_includes_message() {
        let err = PlacesError::Provider {
            status: "REQUEST_DENIED".to_string(),
            message: Some("The provided API key is invalid.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "provider returned status REQUEST_DENIED: The provided API key is invalid."
        );
    }

    #[test]
    fn provider_error_display_without_message() {
        let err = PlacesError::Provider {
            status: "UNKNOWN_ERROR".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "provider returned status UNKNOWN_ERROR: no message");
    }

    #[test]
    fn not_found_status_marks_identifier_stale() {
        let err = PlacesError::Provider {
            status: "NOT_FOUND".to_string(),
            message: None,
        };
        assert!(err.is_stale_identifier());

        let denied = PlacesError::Provider {
            status: "REQUEST_DENIED".to_string(),
            message: None,
        };
        assert!(!denied.is_stale_identifier());
    }

    #[test]
    fn transport_error_is_never_stale() {
        let err = PlacesError::Transport {
            status: 404,
            body: ProviderBody::Text("not found".to_string()),
        };
        assert!(!err.is_stale_identifier());
        assert_eq!(err.to_string(), "provider responded with HTTP 404: not found");
    }
}
