//! Response body transformation and JSON redaction.

use serde_json::Value;

use crate::sanitize::REDACTED;

/// JSON keys whose values are redacted, compared case-insensitively.
pub const SENSITIVE_KEYS: [&str; 6] =
    ["password", "secret", "token", "api_key", "private_key", "ssn"];

/// Domain-specific reshaping of a JSON response body.
pub trait ResponseTransformer: Send + Sync {
    fn transform(&self, body: Value) -> Value;
}

/// Unwraps `{"data": ..., "meta": ...}` envelopes to their payload; any
/// other shape passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeUnwrapper;

impl ResponseTransformer for EnvelopeUnwrapper {
    fn transform(&self, body: Value) -> Value {
        match body {
            Value::Object(mut map) if map.contains_key("data") && map.contains_key("meta") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        }
    }
}

/// Recursively replace values of sensitive keys in a JSON value, descending
/// into objects and arrays. Non-object scalars pass through unchanged.
pub fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    if SENSITIVE_KEYS.contains(&key.to_lowercase().as_str()) {
                        (key.clone(), Value::String(REDACTED.to_string()))
                    } else {
                        (key.clone(), redact_sensitive_values(val))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(redact_sensitive_values).collect())
        }
        other => other.clone(),
    }
}
