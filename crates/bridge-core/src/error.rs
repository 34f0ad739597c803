//! Failure taxonomy for the fetch pipeline.
//!
//! Every way a fetch can fail is one variant of [`FetchError`]. The enum is
//! closed on purpose: call sites consume it by exhaustive matching, so a new
//! failure mode cannot be added without every consumer handling it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::MAX_REDIRECTS;

/// Result type alias for pipeline operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Everything that can terminate a fetch before a successful response.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Malformed request parameters (method, URL scheme, timeout range).
    #[error("Invalid request parameters: {0}")]
    InvalidParams(String),

    /// The target hostname is not admitted by the allowlist.
    #[error("Domain '{hostname}' is not in the allowlist")]
    DomainDenied { hostname: String },

    /// The single connect+send+receive budget elapsed.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: f64 },

    /// A connection could not be established.
    #[error("Could not connect to server: {message}")]
    Connect { message: String },

    /// The redirect cap was exceeded while following redirects.
    #[error("Too many redirects (max: {limit})")]
    TooManyRedirects { limit: usize },

    /// The response body would exceed the size cap.
    #[error("Response too large: {observed} bytes (max: {limit})")]
    ResponseTooLarge { limit: usize, observed: usize },

    /// A non-2xx status surfaced as a hard error by the transport.
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16, body: String },

    /// Anything uncategorized. Never silently swallowed.
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

/// Serialized tag for each [`FetchError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    DomainDenied,
    Timeout,
    ConnectError,
    TooManyRedirects,
    ResponseTooLarge,
    HttpStatusError,
    Unexpected,
}

impl ErrorKind {
    /// Stable string form, matching the serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::DomainDenied => "domain_denied",
            Self::Timeout => "timeout",
            Self::ConnectError => "connect_error",
            Self::TooManyRedirects => "too_many_redirects",
            Self::ResponseTooLarge => "response_too_large",
            Self::HttpStatusError => "http_status_error",
            Self::Unexpected => "unexpected",
        }
    }
}

impl FetchError {
    /// The taxonomy tag for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParams(_) => ErrorKind::ValidationError,
            Self::DomainDenied { .. } => ErrorKind::DomainDenied,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Connect { .. } => ErrorKind::ConnectError,
            Self::TooManyRedirects { .. } => ErrorKind::TooManyRedirects,
            Self::ResponseTooLarge { .. } => ErrorKind::ResponseTooLarge,
            Self::HttpStatus { .. } => ErrorKind::HttpStatusError,
            Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Actionable suggestions for the caller. Never empty: a failure without
    /// a way forward is not a useful failure.
    pub fn troubleshooting(&self) -> Vec<String> {
        match self {
            Self::InvalidParams(_) => vec![
                "Check that all parameters are correctly formatted".into(),
                "Ensure the URL starts with http:// or https://".into(),
                "Verify the HTTP method is valid".into(),
            ],
            Self::DomainDenied { hostname } => vec![
                format!("Add '{hostname}' to allowed_domains in the bridge configuration"),
                "Restart the bridge after changing the configuration".into(),
                "Check that the domain is spelled correctly".into(),
            ],
            Self::Timeout { .. } => vec![
                "Increase the timeout parameter in the request".into(),
                "Check if the server is responding".into(),
                "Verify network connectivity to the host".into(),
            ],
            Self::Connect { .. } => vec![
                "Verify the URL is correct".into(),
                "Check that the server is running".into(),
                "Ensure the domain resolves correctly (check /etc/hosts)".into(),
                "Verify firewall settings allow the connection".into(),
            ],
            Self::TooManyRedirects { .. } => vec![
                "Check for redirect loops on the server".into(),
                "Set follow_redirects=false to inspect the redirect response".into(),
            ],
            Self::ResponseTooLarge { .. } => vec![
                "Use pagination or filtering to reduce the response size".into(),
                "Fetch the resource in smaller chunks".into(),
            ],
            Self::HttpStatus { .. } => vec![
                "Inspect the response body for server-provided error details".into(),
                "Verify the request path, parameters, and headers".into(),
            ],
            Self::Unexpected { .. } => vec![
                "Check the bridge logs for more details".into(),
                "Verify all request parameters are correct".into(),
                "Try a simpler request to isolate the issue".into(),
            ],
        }
    }

    /// Classify a transport error from the HTTP client into the taxonomy.
    ///
    /// `timeout_secs` is the budget the request ran under; it contextualizes
    /// the timeout message the way the original caller supplied it.
    pub fn from_transport(err: reqwest::Error, timeout_secs: f64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout_secs,
            }
        } else if err.is_connect() {
            Self::Connect {
                message: err.to_string(),
            }
        } else if err.is_redirect() {
            Self::TooManyRedirects {
                limit: MAX_REDIRECTS,
            }
        } else if err.is_status() {
            Self::HttpStatus {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                body: String::new(),
            }
        } else {
            Self::Unexpected {
                message: err.to_string(),
            }
        }
    }
}
