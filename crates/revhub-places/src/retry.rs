//! Optional retry policy for provider GET requests.
//!
//! The default policy never retries: a transient failure is terminal for the
//! call, and callers opt in explicitly. Reply submission does not go through
//! this module.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

const MAX_DELAY_MS: u64 = 30_000;

/// How many times a failed provider GET is re-attempted and how long to wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    /// Base delay; the n-th retry waits `backoff_base_ms * 2^(n-1)` ±25 %.
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub const NONE: Self = Self {
        max_retries: 0,
        backoff_base_ms: 0,
    };

    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Back-off before the `retry`-th re-attempt (1-based): doubling from
    /// the base, capped, scaled by a random 75-125 %.
    fn delay_for(self, retry: u32) -> Duration {
        let doubled = self
            .backoff_base_ms
            .saturating_mul(1u64 << retry.saturating_sub(1).min(10))
            .min(MAX_DELAY_MS);
        let jitter_pct: u64 = rand::random_range(75..=125);
        Duration::from_millis(doubled * jitter_pct / 100)
    }
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Network failures, HTTP 429 and HTTP 5xx are transient. Provider status
/// errors and malformed bodies are not.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => e.is_timeout() || e.is_connect(),
        PlacesError::Transport { status, .. } => *status == 429 || *status >= 500,
        PlacesError::Provider { .. }
        | PlacesError::Deserialize { .. }
        | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation`, retrying transient errors according to `policy`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries >= policy.max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries += 1;
        let delay = policy.delay_for(retries);
        tracing::warn!(
            retry = retries,
            of = policy.max_retries,
            delay_ms = %delay.as_millis(),
            error = %err,
            "retrying review provider request"
        );
        tokio::time::sleep(delay).await;
    }
}
