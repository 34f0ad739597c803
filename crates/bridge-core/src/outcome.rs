//! Final structured fetch outcomes.
//!
//! Whichever stage terminates the pipeline, the caller always receives a
//! [`FetchOutcome`]: a tagged success/failure value carrying either the
//! shaped response or a taxonomized error with troubleshooting hints. The
//! serialized form is the bridge's single wire contract.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::content::ContentKind;
use crate::error::{ErrorKind, FetchError};
use crate::sanitize::sanitize_headers;

/// Raw transport response as captured by the executor, before shaping.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Final URL after any redirects.
    pub final_url: String,
    pub elapsed_ms: u64,
}

/// Shaped successful response.
#[derive(Debug, Clone)]
pub struct FetchSuccess {
    pub status_code: u16,
    /// Sanitized response headers.
    pub headers: HashMap<String, String>,
    /// Parsed JSON value, text, or a binary placeholder string.
    pub body: Value,
    pub content_kind: ContentKind,
    pub url: String,
    pub elapsed_ms: u64,
}

/// Taxonomized failure.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub error: String,
    /// At least one actionable suggestion, never empty.
    pub troubleshooting: Vec<String>,
    /// Status code, when the failure carries one (`HttpStatus`).
    pub status_code: Option<u16>,
    /// Response body, when the failure carries one (`HttpStatus`).
    pub body: Option<String>,
}

/// Result of one fetch. Exactly one variant per call.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success(FetchSuccess),
    Failure(FetchFailure),
}

impl FetchOutcome {
    /// Shape a raw transport response: classify the body, sanitize headers,
    /// and represent the body per its kind. JSON bodies that fail to parse
    /// fall back to raw text; a malformed body never fails the call.
    pub fn from_response(raw: RawResponse) -> Self {
        let content_type = raw
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str());

        let content_kind = ContentKind::classify(content_type, &raw.body);
        let body = match content_kind {
            ContentKind::Json => match serde_json::from_slice::<Value>(&raw.body) {
                Ok(value) => value,
                Err(_) => Value::String(String::from_utf8_lossy(&raw.body).into_owned()),
            },
            ContentKind::Text => Value::String(String::from_utf8_lossy(&raw.body).into_owned()),
            ContentKind::Binary => Value::String(format!(
                "[Binary content, {} bytes, content-type: {}]",
                raw.body.len(),
                content_type.unwrap_or("unknown")
            )),
        };

        Self::Success(FetchSuccess {
            status_code: raw.status,
            headers: sanitize_headers(&raw.headers),
            body,
            content_kind,
            url: raw.final_url,
            elapsed_ms: raw.elapsed_ms,
        })
    }

    /// Build the failure outcome for a pipeline error.
    pub fn from_error(err: &FetchError) -> Self {
        let (status_code, body) = match err {
            FetchError::HttpStatus { status, body } => {
                (Some(*status), Some(body.clone()))
            }
            _ => (None, None),
        };

        Self::Failure(FetchFailure {
            kind: err.kind(),
            error: err.to_string(),
            troubleshooting: err.troubleshooting(),
            status_code,
            body,
        })
    }

    /// Whether this outcome is the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure, if this outcome is one.
    pub fn as_failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            Self::Success(_) => None,
        }
    }

    /// The success, if this outcome is one.
    pub fn as_success(&self) -> Option<&FetchSuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure(_) => None,
        }
    }

    /// The wire representation of this outcome.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(s) => json!({
                "success": true,
                "status_code": s.status_code,
                "headers": s.headers,
                "body": s.body,
                "content_kind": s.content_kind,
                "url": s.url,
                "elapsed_ms": s.elapsed_ms,
            }),
            Self::Failure(f) => {
                let mut value = json!({
                    "success": false,
                    "kind": f.kind,
                    "error": f.error,
                    "troubleshooting": f.troubleshooting,
                });
                if let Some(code) = f.status_code {
                    value["status_code"] = json!(code);
                }
                if let Some(body) = &f.body {
                    value["body"] = json!(body);
                }
                value
            }
        }
    }
}

impl Serialize for FetchOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<FetchError> for FetchOutcome {
    fn from(err: FetchError) -> Self {
        Self::from_error(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(content_type: Option<&str>, body: &[u8]) -> RawResponse {
        let mut headers = HashMap::new();
        if let Some(ct) = content_type {
            headers.insert("Content-Type".to_string(), ct.to_string());
        }
        headers.insert("Set-Cookie".to_string(), "session=abc".to_string());
        RawResponse {
            status: 200,
            headers,
            body: body.to_vec(),
            final_url: "https://api.hvs/x".to_string(),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_json_body_parsed() {
        let outcome = FetchOutcome::from_response(raw(Some("application/json"), br#"{"a":1}"#));
        let success = outcome.as_success().unwrap();
        assert_eq!(success.content_kind, ContentKind::Json);
        assert_eq!(success.body["a"], 1);
        assert_eq!(success.status_code, 200);
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let outcome = FetchOutcome::from_response(raw(Some("application/json"), b"{not json"));
        let success = outcome.as_success().unwrap();
        assert_eq!(success.content_kind, ContentKind::Json);
        assert_eq!(success.body, Value::String("{not json".to_string()));
    }

    #[test]
    fn test_binary_body_placeholder() {
        let outcome = FetchOutcome::from_response(raw(Some("image/png"), &[0x89, 0x50, 0xff]));
        let success = outcome.as_success().unwrap();
        assert_eq!(success.content_kind, ContentKind::Binary);
        let body = success.body.as_str().unwrap();
        assert!(body.contains("3 bytes"), "{body}");
        assert!(body.contains("image/png"), "{body}");
    }

    #[test]
    fn test_headers_sanitized_in_success() {
        let outcome = FetchOutcome::from_response(raw(Some("text/plain"), b"ok"));
        let success = outcome.as_success().unwrap();
        assert_eq!(success.headers.get("Set-Cookie").unwrap(), "[REDACTED]");
        assert_eq!(success.headers.get("Content-Type").unwrap(), "text/plain");
    }

    #[test]
    fn test_content_type_lookup_ignores_casing() {
        let mut headers = HashMap::new();
        headers.insert("CONTENT-TYPE".to_string(), "application/json".to_string());
        let outcome = FetchOutcome::from_response(RawResponse {
            status: 200,
            headers,
            body: b"[1,2]".to_vec(),
            final_url: "https://api.hvs/x".to_string(),
            elapsed_ms: 1,
        });
        assert_eq!(outcome.as_success().unwrap().content_kind, ContentKind::Json);
    }

    #[test]
    fn test_success_wire_shape() {
        let value = FetchOutcome::from_response(raw(Some("text/plain"), b"hello")).to_json();
        assert_eq!(value["success"], true);
        assert_eq!(value["status_code"], 200);
        assert_eq!(value["body"], "hello");
        assert_eq!(value["content_kind"], "text");
        assert_eq!(value["url"], "https://api.hvs/x");
        assert_eq!(value["elapsed_ms"], 12);
    }

    #[test]
    fn test_failure_wire_shape() {
        let err = FetchError::DomainDenied {
            hostname: "evil.com".to_string(),
        };
        let value = FetchOutcome::from_error(&err).to_json();
        assert_eq!(value["success"], false);
        assert_eq!(value["kind"], "domain_denied");
        assert!(value["error"].as_str().unwrap().contains("evil.com"));
        assert!(!value["troubleshooting"].as_array().unwrap().is_empty());
        assert!(value.get("status_code").is_none());
        assert!(value.get("body").is_none());
    }

    #[test]
    fn test_http_status_failure_carries_status_and_body() {
        let err = FetchError::HttpStatus {
            status: 503,
            body: "unavailable".to_string(),
        };
        let outcome: FetchOutcome = err.into();
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.status_code, Some(503));
        assert_eq!(failure.body.as_deref(), Some("unavailable"));
        assert!(!failure.troubleshooting.is_empty());

        let value = outcome.to_json();
        assert_eq!(value["status_code"], 503);
        assert_eq!(value["body"], "unavailable");
    }
}
