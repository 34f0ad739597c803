//! Sliding-window rate limiting by domain.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Limit for one domain: at most `max_requests` within `window`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub max_requests: usize,
    pub window: Duration,
}

/// Per-domain sliding-window request counter. Domains without a registered
/// limit are unlimited. Timestamps outside the window are pruned on every
/// check, so memory stays proportional to the limits themselves.
#[derive(Debug, Default)]
pub struct DomainRateLimiter {
    limits: HashMap<String, RateLimit>,
    history: Mutex<HashMap<String, Vec<Instant>>>,
}

impl DomainRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a limit for a hostname.
    pub fn with_limit(
        mut self,
        hostname: impl Into<String>,
        max_requests: usize,
        window: Duration,
    ) -> Self {
        self.limits.insert(
            hostname.into(),
            RateLimit {
                max_requests,
                window,
            },
        );
        self
    }

    /// Admit or reject one request for `hostname`, recording it when
    /// admitted. Rejection carries a descriptive message.
    pub fn check(&self, hostname: &str) -> Result<(), String> {
        let Some(limit) = self.limits.get(hostname) else {
            return Ok(());
        };

        let now = Instant::now();
        let mut history = self.history.lock();
        let timestamps = history.entry(hostname.to_string()).or_default();

        if let Some(cutoff) = now.checked_sub(limit.window) {
            timestamps.retain(|t| *t > cutoff);
        }

        if timestamps.len() >= limit.max_requests {
            return Err(format!(
                "Rate limit exceeded for {hostname}: {} requests per {}s",
                limit.max_requests,
                limit.window.as_secs()
            ));
        }

        timestamps.push(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_limit_admitted() {
        let limiter =
            DomainRateLimiter::new().with_limit("api.hvs", 3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(limiter.check("api.hvs").is_ok());
        }
    }

    #[test]
    fn test_over_limit_rejected_with_message() {
        let limiter =
            DomainRateLimiter::new().with_limit("api.hvs", 2, Duration::from_secs(60));

        assert!(limiter.check("api.hvs").is_ok());
        assert!(limiter.check("api.hvs").is_ok());
        let err = limiter.check("api.hvs").unwrap_err();
        assert!(err.contains("api.hvs"), "{err}");
        assert!(err.contains("2 requests"), "{err}");
    }

    #[test]
    fn test_unknown_domain_unlimited() {
        let limiter =
            DomainRateLimiter::new().with_limit("api.hvs", 1, Duration::from_secs(60));

        for _ in 0..100 {
            assert!(limiter.check("other.hvs").is_ok());
        }
    }

    #[test]
    fn test_window_expiry_readmits() {
        let limiter =
            DomainRateLimiter::new().with_limit("api.hvs", 1, Duration::from_millis(50));

        assert!(limiter.check("api.hvs").is_ok());
        assert!(limiter.check("api.hvs").is_err());

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.check("api.hvs").is_ok());
    }

    #[test]
    fn test_domains_counted_independently() {
        let limiter = DomainRateLimiter::new()
            .with_limit("a.hvs", 1, Duration::from_secs(60))
            .with_limit("b.hvs", 1, Duration::from_secs(60));

        assert!(limiter.check("a.hvs").is_ok());
        assert!(limiter.check("b.hvs").is_ok());
        assert!(limiter.check("a.hvs").is_err());
    }
}
