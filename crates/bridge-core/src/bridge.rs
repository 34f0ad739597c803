//! The fetch pipeline, end to end.

use tracing::warn;

use crate::allowlist::Allowlist;
use crate::config::BridgeConfig;
use crate::error::FetchResult;
use crate::executor::HttpExecutor;
use crate::outcome::FetchOutcome;
use crate::request::FetchParams;

/// Facade over the whole pipeline: validate, admit, execute, shape.
///
/// One bridge serves many concurrent fetches; it holds only the immutable
/// allowlist and the pooled clients.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    executor: HttpExecutor,
}

impl HttpBridge {
    /// Build a bridge from static configuration.
    pub fn new(config: &BridgeConfig) -> FetchResult<Self> {
        Self::with_allowlist(config.allowlist())
    }

    /// Build a bridge over an explicit allowlist.
    pub fn with_allowlist(allowlist: Allowlist) -> FetchResult<Self> {
        Ok(Self {
            executor: HttpExecutor::new(allowlist)?,
        })
    }

    /// The active allowlist.
    pub fn allowlist(&self) -> &Allowlist {
        self.executor.allowlist()
    }

    /// Run one fetch. Always produces exactly one outcome; failures at any
    /// stage surface as the structured failure shape, never as a panic.
    pub async fn fetch(&self, params: FetchParams) -> FetchOutcome {
        let request = match params.validate() {
            Ok(request) => request,
            Err(err) => {
                warn!("Rejected request: {err}");
                return err.into();
            }
        };

        self.executor.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn bridge(patterns: &[&str]) -> HttpBridge {
        HttpBridge::with_allowlist(Allowlist::from_patterns(patterns)).unwrap()
    }

    #[tokio::test]
    async fn test_validation_failure_becomes_outcome() {
        let outcome = bridge(&["localhost"])
            .fetch(FetchParams::new("ftp://localhost/"))
            .await;

        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::ValidationError);
        assert!(failure.error.contains("Invalid request parameters"));
        assert!(!failure.troubleshooting.is_empty());
    }

    #[tokio::test]
    async fn test_denied_domain_becomes_outcome() {
        let outcome = bridge(&["*.hvs"])
            .fetch(FetchParams::new("https://evil.com/"))
            .await;

        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::DomainDenied);
        assert!(failure.error.contains("evil.com"));
    }

    #[test]
    fn test_bridge_from_default_config() {
        let bridge = HttpBridge::new(&BridgeConfig::default()).unwrap();
        assert!(bridge.allowlist().permits("localhost"));
        assert!(!bridge.allowlist().permits("example.com"));
    }
}
