//! Retry decorator with exponential backoff.
//!
//! The core never retries; this wraps a fetch operation from the outside.
//! Only transient transport failures (timeout, connect) are retried, since a
//! denial or validation failure will not change on a second attempt.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ErrorKind;
use crate::outcome::FetchOutcome;

/// Retry budget and backoff shape.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Base of the exponential delay, in seconds: attempt `n` waits
    /// `backoff_factor^n`.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following attempt `attempt` (zero-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_factor.powi(attempt as i32))
    }

    fn is_transient(outcome: &FetchOutcome) -> bool {
        matches!(
            outcome.as_failure().map(|f| f.kind),
            Some(ErrorKind::Timeout | ErrorKind::ConnectError)
        )
    }
}

/// Run `operation` until it succeeds, fails non-transiently, or exhausts the
/// policy. Returns the last outcome either way.
pub async fn execute_with_retry<F, Fut>(policy: &RetryPolicy, mut operation: F) -> FetchOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchOutcome>,
{
    let mut attempt = 0;
    loop {
        let outcome = operation().await;
        if !RetryPolicy::is_transient(&outcome) || attempt >= policy.max_retries {
            return outcome;
        }

        let delay = policy.delay_for_attempt(attempt);
        warn!(
            "Request failed (attempt {}/{})",
            attempt + 1,
            policy.max_retries + 1
        );
        info!("Retrying in {:.1}s", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::outcome::RawResponse;
    use std::cell::Cell;
    use std::collections::HashMap;

    fn timeout_failure() -> FetchOutcome {
        FetchOutcome::from_error(&FetchError::Timeout { seconds: 1.0 })
    }

    fn denial() -> FetchOutcome {
        FetchOutcome::from_error(&FetchError::DomainDenied {
            hostname: "evil.com".to_string(),
        })
    }

    fn success() -> FetchOutcome {
        FetchOutcome::from_response(RawResponse {
            status: 200,
            headers: HashMap::new(),
            body: b"ok".to_vec(),
            final_url: "http://localhost/".to_string(),
            elapsed_ms: 1,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retried_until_success() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::default();

        let outcome = execute_with_retry(&policy, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    timeout_failure()
                } else {
                    success()
                }
            }
        })
        .await;

        assert!(outcome.is_success());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_not_retried() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::default();

        let outcome = execute_with_retry(&policy, || {
            calls.set(calls.get() + 1);
            async { denial() }
        })
        .await;

        assert!(!outcome.is_success());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_capped_by_policy() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy {
            max_retries: 2,
            backoff_factor: 2.0,
        };

        let outcome = execute_with_retry(&policy, || {
            calls.set(calls.get() + 1);
            async { timeout_failure() }
        })
        .await;

        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Timeout);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_backoff_delays_grow_exponentially() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_factor: 2.0,
        };

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
    }
}
