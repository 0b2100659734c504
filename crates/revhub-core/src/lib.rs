pub mod app_config;
pub mod config;
pub mod provider_body;
pub mod reviews;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ReplyCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use provider_body::ProviderBody;
pub use reviews::{BusinessSummary, Platform, Review, ReviewResponse};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
