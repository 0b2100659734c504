use crate::app_config::{AppConfig, Environment, ReplyCredentials};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. The binaries
/// call `dotenvy` themselves before parsing arguments.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `FOO=` in a .env file does not produce
    // an empty credential.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("REVHUB_ENV", "development"))?;

    let bind_addr = or_default("REVHUB_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("REVHUB_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("REVHUB_LOG_LEVEL", "info");

    let places_api_key = optional("GOOGLE_PLACES_API_KEY");
    let places_base_url = or_default("REVHUB_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    if !places_base_url.starts_with("http://") && !places_base_url.starts_with("https://") {
        return Err(invalid(
            "REVHUB_PLACES_BASE_URL",
            "must be an http(s) URL".to_string(),
        ));
    }

    let http_timeout_secs = parse_u64("REVHUB_HTTP_TIMEOUT_SECS", "30")?;
    if http_timeout_secs == 0 {
        return Err(invalid(
            "REVHUB_HTTP_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("REVHUB_USER_AGENT", "revhub/0.1 (review-aggregation)");
    let places_max_retries = parse_u32("REVHUB_PLACES_MAX_RETRIES", "0")?;
    let places_retry_backoff_base_ms = parse_u64("REVHUB_PLACES_RETRY_BACKOFF_BASE_MS", "500")?;

    let reply = ReplyCredentials {
        google_access_token: optional("GOOGLE_BUSINESS_ACCESS_TOKEN"),
        google_account_id: optional("GOOGLE_BUSINESS_ACCOUNT_ID"),
        google_location_id: optional("GOOGLE_BUSINESS_LOCATION_ID"),
        facebook_access_token: optional("FACEBOOK_PAGE_ACCESS_TOKEN"),
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        http_timeout_secs,
        user_agent,
        places_max_retries,
        places_retry_backoff_base_ms,
        reply,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVHUB_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
