//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Upper bound (exclusive) of the random jitter added to every delay, in milliseconds.
pub const JITTER_MS: u64 = 100;

/// Exponential part of the delay: `base * 2^attempt`, saturating.
pub fn exponential_delay(attempt: u32, base: Duration) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);

    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` is the retry number (1 for the first retry).
pub fn calculate_backoff(attempt: u32, base: Duration) -> Duration {
    let jitter = rand::thread_rng().gen_range(0..JITTER_MS);

    exponential_delay(attempt, base).saturating_add(Duration::from_millis(jitter))
}
