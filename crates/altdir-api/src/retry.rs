// Retry with exponential backoff for backend reads
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 250,
            max_delay_ms: 4000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all - first failure is final
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Run a request, retrying transient failures
///
/// Only errors where `ApiError::is_retryable` says so get another attempt.
/// A 404 or a malformed body will not get better by asking again.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, mut operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Request succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                attempt += 1;

                if attempt > config.max_retries {
                    warn!("Request failed after {} attempts: {}", attempt, err);
                    return Err(err);
                }

                warn!(
                    "Request failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt, config.max_retries, err, delay_ms
                );

                sleep(Duration::from_millis(delay_ms)).await;

                delay_ms = ((delay_ms as f64) * config.backoff_multiplier) as u64;
                delay_ms = delay_ms.min(config.max_delay_ms);
            }
        }
    }
}

/// Map a non-success HTTP status onto the error taxonomy
pub fn classify_status(status: reqwest::StatusCode, body: String) -> ApiError {
    match status.as_u16() {
        401 | 403 => ApiError::AuthRequired,
        404 => ApiError::NotFound(body),
        429 => ApiError::RateLimitExceeded,
        408 => ApiError::Server {
            status: status.as_u16(),
            body,
        },
        s if status.is_server_error() => ApiError::Server { status: s, body },
        s => ApiError::RequestFailed(format!("Status {}: {}", s, body)),
    }
}
