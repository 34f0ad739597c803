//! Request parameter validation.
//!
//! Raw caller-supplied parameters ([`FetchParams`]) are normalized and
//! checked into an immutable [`FetchRequest`]. Validation is pure and
//! synchronous: it either yields a fully well-formed request or a
//! [`FetchError::InvalidParams`] with a distinct, human-readable reason.
//! There is no partially-valid request.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::limits::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};

/// HTTP methods the bridge will relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// The accepted method names, in canonical (uppercase) form.
    pub const NAMES: [&'static str; 7] = [
        "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS",
    ];

    /// Parse a method name, uppercasing first so `get`, `Get` and `GET` are
    /// the same method.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Canonical uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// Raw fetch parameters as supplied by a caller.
///
/// Deserializes directly from tool-call arguments; every field except `url`
/// carries a fixed, documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchParams {
    /// Target URL. Must be absolute, scheme http or https.
    pub url: String,
    /// HTTP method name, any casing. Default `GET`.
    #[serde(default = "default_method")]
    pub method: String,
    /// Extra request headers.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Request body, sent as the string's UTF-8 bytes.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether to verify TLS certificates. Default true.
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    /// Overall request budget in seconds, `0 < t <= 300`. Default 30.
    #[serde(default = "default_timeout")]
    pub timeout_secs: f64,
    /// Whether to follow redirects (bounded by the fixed redirect cap).
    /// Default true.
    #[serde(default = "default_true")]
    pub follow_redirects: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

impl FetchParams {
    /// Parameters for `url` with all defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            headers: None,
            body: None,
            verify_tls: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            follow_redirects: true,
        }
    }

    /// Set the method name.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the request headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add a single request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set TLS certificate verification.
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the timeout budget in seconds.
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set redirect following.
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Validate into an immutable [`FetchRequest`].
    pub fn validate(self) -> FetchResult<FetchRequest> {
        let method = HttpMethod::parse(&self.method).ok_or_else(|| {
            FetchError::InvalidParams(format!(
                "Method must be one of {} (got '{}')",
                HttpMethod::NAMES.join(", "),
                self.method
            ))
        })?;

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(FetchError::InvalidParams(
                "URL must start with http:// or https://".to_string(),
            ));
        }
        let url = Url::parse(&self.url)
            .map_err(|e| FetchError::InvalidParams(format!("URL is not valid: {e}")))?;

        if !(self.timeout_secs > 0.0 && self.timeout_secs <= MAX_TIMEOUT_SECS) {
            return Err(FetchError::InvalidParams(format!(
                "Timeout must be between 0 and {MAX_TIMEOUT_SECS} seconds (got {})",
                self.timeout_secs
            )));
        }

        Ok(FetchRequest {
            url,
            method,
            headers: self.headers,
            body: self.body,
            verify_tls: self.verify_tls,
            timeout_secs: self.timeout_secs,
            follow_redirects: self.follow_redirects,
        })
    }
}

/// A fully validated, immutable fetch request.
///
/// Constructed only through [`FetchParams::validate`]; fields are private so
/// a request cannot drift from its validated form.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    url: Url,
    method: HttpMethod,
    headers: Option<HashMap<String, String>>,
    body: Option<String>,
    verify_tls: bool,
    timeout_secs: f64,
    follow_redirects: bool,
}

impl FetchRequest {
    /// The parsed target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The target hostname, or an empty string when the URL has none.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// The validated method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Extra request headers, if any.
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        self.headers.as_ref()
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Whether TLS certificates are verified.
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// The timeout budget in seconds.
    pub fn timeout_secs(&self) -> f64 {
        self.timeout_secs
    }

    /// The timeout budget as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    /// Whether redirects are followed.
    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_defaults() {
        let request = FetchParams::new("https://example.com/api").validate().unwrap();
        assert_eq!(request.method(), HttpMethod::Get);
        assert_eq!(request.url().as_str(), "https://example.com/api");
        assert!(request.verify_tls());
        assert!(request.follow_redirects());
        assert_eq!(request.timeout_secs(), 30.0);
        assert!(request.headers().is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn test_method_normalization_is_idempotent() {
        for name in ["get", "GET", "Get"] {
            let request = FetchParams::new("https://example.com/")
                .with_method(name)
                .validate()
                .unwrap();
            assert_eq!(request.method(), HttpMethod::Get);
        }
    }

    #[test]
    fn test_invalid_method_rejected() {
        for name in ["TRACE", "trace", "INVALID", ""] {
            let err = FetchParams::new("https://example.com/")
                .with_method(name)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("Method must be one of"), "{err}");
        }
    }

    #[test]
    fn test_invalid_url_scheme_rejected() {
        for url in ["ftp://example.com/", "file:///etc/passwd", "example.com"] {
            let err = FetchParams::new(url).validate().unwrap_err();
            assert!(err.to_string().contains("URL must start with http"), "{err}");
        }
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let err = FetchParams::new("http://").validate().unwrap_err();
        assert!(matches!(err, FetchError::InvalidParams(_)));
    }

    #[test]
    fn test_timeout_boundaries() {
        let accepted = [0.0001, 1.0, 60.0, 300.0];
        for t in accepted {
            assert!(
                FetchParams::new("https://example.com/")
                    .with_timeout_secs(t)
                    .validate()
                    .is_ok(),
                "timeout {t} should be accepted"
            );
        }

        let rejected = [0.0, -1.0, 300.0001, 500.0, f64::NAN];
        for t in rejected {
            let err = FetchParams::new("https://example.com/")
                .with_timeout_secs(t)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("Timeout must be between"), "{err}");
        }
    }

    #[test]
    fn test_headers_and_body_preserved() {
        let request = FetchParams::new("https://example.com/api")
            .with_method("post")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"a":1}"#)
            .validate()
            .unwrap();

        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(
            request.headers().unwrap().get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: FetchParams =
            serde_json::from_value(serde_json::json!({"url": "https://api.hvs/x"})).unwrap();
        assert_eq!(params.method, "GET");
        assert!(params.verify_tls);
        assert!(params.follow_redirects);
        assert_eq!(params.timeout_secs, 30.0);

        let params: FetchParams = serde_json::from_value(serde_json::json!({
            "url": "https://api.hvs/x",
            "method": "post",
            "verify_tls": false,
            "timeout_secs": 2.5
        }))
        .unwrap();
        assert_eq!(params.method, "post");
        assert!(!params.verify_tls);
        assert_eq!(params.timeout_secs, 2.5);
    }

    #[test]
    fn test_method_names_cover_enum() {
        for name in HttpMethod::NAMES {
            assert!(HttpMethod::parse(name).is_some());
        }
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }
}
