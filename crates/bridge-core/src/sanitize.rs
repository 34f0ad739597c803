//! Header redaction.
//!
//! Any header set that is returned to a caller or logged passes through
//! [`sanitize_headers`] first; sanitization is unconditional, not
//! content-dependent.

use std::collections::HashMap;

/// Replacement value for sensitive headers.
pub const REDACTED: &str = "[REDACTED]";

/// Header names whose values are never exposed. Compared case-insensitively.
pub const SENSITIVE_HEADERS: [&str; 6] = [
    "set-cookie",
    "cookie",
    "authorization",
    "x-api-key",
    "x-auth-token",
    "x-csrf-token",
];

/// Whether a header name is in the sensitive set.
pub fn is_sensitive(name: &str) -> bool {
    let name = name.to_lowercase();
    SENSITIVE_HEADERS.iter().any(|s| *s == name)
}

/// Redact sensitive header values, preserving the original name casing and
/// passing every other entry through unchanged.
pub fn sanitize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            if is_sensitive(name) {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}
