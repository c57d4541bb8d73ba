//! Retry logic.
//!
//! # Responsibilities
//! - Classify failures as transient or permanent from their status code
//! - Execute retries with exponential backoff + jitter
//! - Enforce a hard ceiling on the number of retries
//!
//! # State Transitions
//! ```text
//! Attempting → Success                      (operation returned Ok)
//! Attempting → RetryScheduled → Attempting  (transient failure, budget left)
//! Attempting → Failed                       (permanent failure or budget spent)
//! ```
//!
//! # Design Decisions
//! - No status (connection/transport failure) or 5xx is retryable
//! - Every 4xx, including 429, fails immediately
//! - The error of the final attempt is returned unchanged, never wrapped

use std::future::Future;
use std::time::Duration;

use crate::config::schema::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Errors that may carry an HTTP-like status code.
pub trait HasStatus {
    /// Status code of the failure, `None` for transport-level errors.
    fn status(&self) -> Option<u16>;
}

/// Whether a failure with the given status should be retried.
pub fn is_retryable(status: Option<u16>) -> bool {
    match status {
        None => true,
        Some(code) => (500..600).contains(&code),
    }
}

/// Outcome of classifying one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for `delay`, then run retry number `attempt`.
    Retry { attempt: u32, delay: Duration },
    /// Return the failure to the caller.
    GiveUp,
}

/// Bounds and pacing for [`retry_with_backoff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay, doubled for every retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Classify a failure given how many retries have already run.
    pub fn decide(&self, status: Option<u16>, retries_so_far: u32) -> RetryDecision {
        if !is_retryable(status) || retries_so_far >= self.max_retries {
            return RetryDecision::GiveUp;
        }

        let attempt = retries_so_far + 1;
        RetryDecision::Retry {
            attempt,
            delay: calculate_backoff(attempt, self.base_delay),
        }
    }
}

/// Run `operation`, retrying transient failures per `policy`.
///
/// The operation runs at most `max_retries + 1` times. A warning is logged
/// before every retry with the computed delay and attempt number.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: HasStatus + std::fmt::Display,
{
    for retries_so_far in 0..policy.max_retries {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match policy.decide(err.status(), retries_so_far) {
            RetryDecision::GiveUp => return Err(err),
            RetryDecision::Retry { attempt, delay } => {
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    status = ?err.status(),
                    error = %err,
                    "Operation failed, retrying"
                );
                metrics::record_retry(err.status());
                tokio::time::sleep(delay).await;
            }
        }
    }

    // Budget spent: whatever the last attempt yields goes back unchanged.
    operation().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Debug, thiserror::Error)]
    #[error("scripted failure (status {status:?})")]
    struct ScriptedError {
        status: Option<u16>,
    }

    impl HasStatus for ScriptedError {
        fn status(&self) -> Option<u16> {
            self.status
        }
    }

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    async fn always_failing(policy: RetryPolicy, status: Option<u16>) -> (u32, ScriptedError) {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(ScriptedError { status }) }
        })
        .await;

        (calls.load(Ordering::SeqCst), result.unwrap_err())
    }

    #[test]
    fn test_status_classification() {
        assert!(is_retryable(None));
        assert!(is_retryable(Some(500)));
        assert!(is_retryable(Some(503)));
        assert!(is_retryable(Some(599)));

        assert!(!is_retryable(Some(400)));
        assert!(!is_retryable(Some(401)));
        assert!(!is_retryable(Some(403)));
        assert!(!is_retryable(Some(429)));
        assert!(!is_retryable(Some(499)));
        assert!(!is_retryable(Some(600)));
    }

    #[test]
    fn test_decide_respects_budget() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));

        match policy.decide(Some(502), 0) {
            RetryDecision::Retry { attempt, delay } => {
                assert_eq!(attempt, 1);
                assert!(delay >= Duration::from_millis(2000));
                assert!(delay < Duration::from_millis(2100));
            }
            RetryDecision::GiveUp => panic!("first 502 should be retried"),
        }

        assert!(matches!(policy.decide(None, 2), RetryDecision::Retry { attempt: 3, .. }));
        assert_eq!(policy.decide(None, 3), RetryDecision::GiveUp);
        assert_eq!(policy.decide(Some(429), 0), RetryDecision::GiveUp);
    }

    #[test]
    fn test_policy_from_config() {
        let config = RetryConfig { max_retries: 5, base_delay_ms: 250 };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_statusless_errors_exhaust_retries() {
        let (calls, err) = always_failing(RetryPolicy::default(), None).await;
        assert_eq!(calls, 4);
        assert_eq!(err.status, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_is_not_retried() {
        let (calls, err) = always_failing(RetryPolicy::default(), Some(429)).await;
        assert_eq!(calls, 1);
        assert_eq!(err.status, Some(429));
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_not_retried() {
        for status in [400, 401, 403, 404, 499] {
            let (calls, _) = always_failing(RetryPolicy::default(), Some(status)).await;
            assert_eq!(calls, 1, "status {status} must not be retried");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_schedule_three_delays() {
        let start = tokio::time::Instant::now();
        let (calls, err) = always_failing(RetryPolicy::new(3, Duration::from_millis(1000)), Some(500)).await;
        let elapsed = start.elapsed();

        assert_eq!(calls, 4);
        assert_eq!(err.status, Some(500));
        // 2s + 4s + 8s, plus up to 99ms of jitter each
        assert!(elapsed >= Duration::from_millis(14_000), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(14_300), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_runs_once() {
        let (calls, _) = always_failing(RetryPolicy::new(0, Duration::from_millis(10)), Some(503)).await;
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_two_unavailable() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&RetryPolicy::default(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ScriptedError { status: Some(503) })
                } else {
                    Ok("booked")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "booked");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(warnings.load(Ordering::SeqCst), 2);
    }
}
