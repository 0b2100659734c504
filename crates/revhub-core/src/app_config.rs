use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Credentials for the reply providers.
///
/// Every field is optional: an absent credential is a supported state that
/// makes the dispatcher hand back a manual-reply link instead of calling out.
#[derive(Clone, Default)]
pub struct ReplyCredentials {
    pub google_access_token: Option<String>,
    pub google_account_id: Option<String>,
    pub google_location_id: Option<String>,
    pub facebook_access_token: Option<String>,
}

impl std::fmt::Debug for ReplyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyCredentials")
            .field(
                "google_access_token",
                &self.google_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("google_account_id", &self.google_account_id)
            .field("google_location_id", &self.google_location_id)
            .field(
                "facebook_access_token",
                &self.facebook_access_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub places_max_retries: u32,
    pub places_retry_backoff_base_ms: u64,
    pub reply: ReplyCredentials,
}

impl AppConfig {
    /// Returns the review-provider API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `GOOGLE_PLACES_API_KEY` was
    /// not set at startup.
    pub fn require_places_api_key(&self) -> Result<&str, ConfigError> {
        self.places_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_PLACES_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("places_max_retries", &self.places_max_retries)
            .field(
                "places_retry_backoff_base_ms",
                &self.places_retry_backoff_base_ms,
            )
            .field("reply", &self.reply)
            .finish()
    }
}
