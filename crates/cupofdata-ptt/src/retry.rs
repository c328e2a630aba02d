//! Retry with exponential back-off and jitter for board and article fetches.
//!
//! Rate limiting, 5xx responses and network failures are transient. A 404 or
//! a page that does not parse is returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::PttError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

pub(crate) fn is_retriable(err: &PttError) -> bool {
    match err {
        PttError::RateLimited { .. } => true,
        PttError::UnexpectedStatus { status, .. } => *status >= 500,
        PttError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.is_request()
                || e.status().is_some_and(|s| s.is_server_error())
        }
        PttError::NotFound { .. } | PttError::Parse { .. } => false,
    }
}

/// Sleep before retry number `attempt` (1-based) after `err`.
///
/// `backoff_base_ms * 2^(attempt-1)` milliseconds, capped at 30 s, then scaled
/// by a random factor in `[0.75, 1.25)`. A rate-limited response waits at
/// least its `Retry-After`, under the same cap.
fn retry_delay(err: &PttError, attempt: u32, backoff_base_ms: u64) -> Duration {
    let capped = backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let floor = match err {
        PttError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000).min(MAX_DELAY_MS),
        _ => 0,
    };
    Duration::from_millis(jittered.max(floor))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// See [`retry_delay`] for the sleep between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PttError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PttError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = retry_delay(&err, attempt, backoff_base_ms);
                #[allow(clippy::cast_possible_truncation)]
                let delay_ms = delay.as_millis() as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient PTT error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
