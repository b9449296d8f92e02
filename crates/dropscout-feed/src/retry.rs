//! Retry policy for transient upstream failures.
//!
//! Exponential backoff for conditions the server or network may recover
//! from (429, 5xx, connection failures). Permanent errors (404, parse
//! failures, 4xx other than 429) are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::FeedError;

/// Returns `true` if `err` represents a transient condition worth retrying
/// after a backoff delay.
///
/// Retriable:
/// - [`FeedError::RateLimited`] — the upstream asked us to back off.
/// - [`FeedError::Http`] — network-level failure (reset, timeout).
/// - [`FeedError::UnexpectedStatus`] with a 5xx status — upstream hiccup.
///
/// Everything else is propagated immediately: a 404 or a body that does
/// not parse will not change on a second attempt.
fn is_retriable(err: &FeedError) -> bool {
    match err {
        FeedError::RateLimited { .. } | FeedError::Http(_) => true,
        FeedError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors with exponential backoff.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds;
/// `max_retries` is the number of additional attempts after the first, so
/// `max_retries = 3` means at most 4 attempts total. Exhausting the budget
/// returns the last error.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FeedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FeedError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        // Shift capped at 62 so extreme configs cannot overflow the delay.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient feed error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
