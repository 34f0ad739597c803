//! Per-domain timeout and TLS-verification overrides.

use std::collections::HashMap;

/// Per-domain deviations from the caller-supplied defaults, e.g. a longer
/// budget for a batch API or disabled verification for a self-signed host.
#[derive(Debug, Clone, Default)]
pub struct DomainOverrides {
    timeouts: HashMap<String, f64>,
    verify_tls: HashMap<String, bool>,
}

impl DomainOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the timeout budget for a hostname.
    pub fn with_timeout(mut self, hostname: impl Into<String>, secs: f64) -> Self {
        self.timeouts.insert(hostname.into(), secs);
        self
    }

    /// Override TLS verification for a hostname.
    pub fn with_verify_tls(mut self, hostname: impl Into<String>, verify: bool) -> Self {
        self.verify_tls.insert(hostname.into(), verify);
        self
    }

    /// The timeout for `hostname`, or `default` when none is registered.
    pub fn timeout_for(&self, hostname: &str, default: f64) -> f64 {
        self.timeouts.get(hostname).copied().unwrap_or(default)
    }

    /// The TLS-verification setting for `hostname`, or `default`.
    pub fn verify_tls_for(&self, hostname: &str, default: bool) -> bool {
        self.verify_tls.get(hostname).copied().unwrap_or(default)
    }
}
