//! Retry utilities for page fetching.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses and anti-bot 403s. Non-retriable errors (parse
//! failures, 404s) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScraperError::RateLimited`] — HTTP 429; the server has asked us to back off.
/// - [`ScraperError::Http`] — network-level failure (connection reset, timeout, etc.).
/// - [`ScraperError::UnexpectedStatus`] with 403 (anti-bot gate) or any 5xx.
///
/// Non-retriable errors (propagated immediately):
/// - [`ScraperError::NotFound`] — 404; retrying would return the same result.
/// - [`ScraperError::UnexpectedStatus`] — any other status (e.g., 400, 410).
/// - [`ScraperError::Deserialize`] — body does not parse; retrying won't fix it.
/// - [`ScraperError::PaginationLimit`] / [`ScraperError::InvalidUrl`] — caller bugs.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => {
            *status == 403 || (500..=599).contains(status)
        }
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds plus up to 500ms of random jitter, then tries again, up to
/// `max_retries` additional attempts after the first try. If all retries are
/// exhausted the last error is returned. Non-retriable errors are returned
/// immediately without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds, jittered so parallel
        // crawls don't re-hit the origin in lockstep.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        let jitter_ms = rand::rng().random_range(0..500u64);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient fetch error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs) + Duration::from_millis(jitter_ms))
            .await;
        attempt += 1;
    }
}
