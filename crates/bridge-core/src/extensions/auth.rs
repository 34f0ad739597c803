//! Per-domain credential and header injection.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::info;

/// Credential attached to a domain.
#[derive(Debug, Clone)]
pub enum DomainAuth {
    /// `Authorization: Bearer <token>`.
    Bearer { token: String },
    /// `Authorization: Basic <base64(user:pass)>`.
    Basic { username: String, password: String },
    /// An arbitrary header pair, e.g. `X-API-Key`.
    Header { name: String, value: String },
}

impl DomainAuth {
    /// Apply this credential to a header map. Empty credentials inject
    /// nothing, so unset values never produce a bogus header.
    fn apply(&self, hostname: &str, headers: &mut HashMap<String, String>) {
        match self {
            Self::Bearer { token } if !token.is_empty() => {
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
                info!("Injected Bearer token for {hostname}");
            }
            Self::Basic { username, password }
                if !username.is_empty() && !password.is_empty() =>
            {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
                info!("Injected Basic auth for {hostname}");
            }
            Self::Header { name, value } if !value.is_empty() => {
                headers.insert(name.clone(), value.clone());
                info!("Injected custom header {name} for {hostname}");
            }
            _ => {}
        }
    }
}

/// Injects per-domain credentials into outgoing header maps.
#[derive(Debug, Clone, Default)]
pub struct AuthInjector {
    domains: HashMap<String, DomainAuth>,
}

impl AuthInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential for a hostname.
    pub fn with_domain(mut self, hostname: impl Into<String>, auth: DomainAuth) -> Self {
        self.domains.insert(hostname.into(), auth);
        self
    }

    /// Inject the credential registered for `hostname`, if any.
    pub fn inject(&self, hostname: &str, headers: &mut HashMap<String, String>) {
        if let Some(auth) = self.domains.get(hostname) {
            auth.apply(hostname, headers);
        }
    }
}

/// Injects static per-domain extra headers, e.g. an API version pin.
#[derive(Debug, Clone, Default)]
pub struct HeaderInjector {
    domains: HashMap<String, HashMap<String, String>>,
}

impl HeaderInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a header for a hostname.
    pub fn with_header(
        mut self,
        hostname: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.domains
            .entry(hostname.into())
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    /// Merge the headers registered for `hostname` into the map.
    pub fn inject(&self, hostname: &str, headers: &mut HashMap<String, String>) {
        if let Some(extra) = self.domains.get(hostname) {
            for (name, value) in extra {
                headers.insert(name.clone(), value.clone());
            }
            info!("Injected custom headers for {hostname}");
        }
    }
}
