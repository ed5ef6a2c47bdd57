//! Retry Wrapper
//!
//! Re-invokes a fallible async operation with exponential backoff. Every
//! failure is retried; the last error is returned unchanged once the
//! attempts are spent.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use tracing::warn;

/// How many times to call an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Wait after the first failure; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts,
            base_delay,
        }
    }

    /// A single attempt with no waiting.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Wait after the failure of attempt `attempt_index` (0-based).
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Fixed doubling schedule that stops after the policy's attempts.
struct Schedule {
    policy: RetryPolicy,
    issued: u32,
}

impl Backoff for Schedule {
    fn reset(&mut self) {
        self.issued = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.issued + 1 >= self.policy.max_attempts() {
            return None;
        }
        let delay = self.policy.delay_for(self.issued);
        self.issued += 1;
        Some(delay)
    }
}

/// Run `op` until it succeeds or the policy's attempts are exhausted.
///
/// Each failure before the last is logged with its 1-based attempt number.
/// Dropping the returned future cancels any pending wait and the in-flight
/// call.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_attempts();
    let mut failures = 0u32;

    let result = backoff::future::retry_notify(
        Schedule {
            policy: *policy,
            issued: 0,
        },
        || {
            let fut = op();
            async move { fut.await.map_err(backoff::Error::transient) }
        },
        |err: E, delay: Duration| {
            failures += 1;
            warn!(
                attempt = failures,
                attempts,
                delay_ms = delay.as_millis() as u64,
                "LLM call failed (attempt {}/{}): {}",
                failures,
                attempts,
                err
            );
        },
    )
    .await;

    if let Err(err) = &result {
        warn!(
            attempts,
            "LLM call failed (attempt {}/{}): {}", attempts, attempts, err
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn recorder() -> Arc<Mutex<Vec<Instant>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(40), Duration::from_secs(1).saturating_mul(u32::MAX));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_with_backoff() {
        let calls = recorder();
        let policy = RetryPolicy::default();

        let result: Result<&str, String> = with_retry(&policy, || {
            let calls = calls.clone();
            async move {
                let mut seen = calls.lock().unwrap();
                seen.push(Instant::now());
                if seen.len() < 3 {
                    Err(format!("transient failure {}", seen.len()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        let seen = calls.lock().unwrap();
        assert_eq!(seen.len(), 3);
        let first_gap = seen[1] - seen[0];
        let second_gap = seen[2] - seen[1];
        assert!(first_gap >= Duration::from_secs(1));
        assert!(first_gap < Duration::from_millis(1100));
        assert!(second_gap >= Duration::from_secs(2));
        assert!(second_gap < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_error_after_exhausting_attempts() {
        let calls = recorder();
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result: Result<(), String> = with_retry(&policy, || {
            let calls = calls.clone();
            async move {
                let mut seen = calls.lock().unwrap();
                seen.push(Instant::now());
                Err(format!("failure {}", seen.len()))
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        let seen = calls.lock().unwrap();
        assert_eq!(seen.len(), 3);
        // Two sleeps (1s then 2s) and none after the final failure
        let span = seen[2] - seen[0];
        assert!(span >= Duration::from_secs(3));
        assert!(span < Duration::from_millis(3100));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_policy_calls_once() {
        let calls = recorder();

        let result: Result<(), String> = with_retry(&RetryPolicy::none(), || {
            let calls = calls.clone();
            async move {
                calls.lock().unwrap().push(Instant::now());
                Err("nope".to_string())
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_wait() {
        let start = Instant::now();
        let result: Result<u32, String> =
            with_retry(&RetryPolicy::default(), || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}
