//! Response content classification.
//!
//! Coarse classification of a response body into JSON, text, or binary,
//! driving how the body is represented in the final outcome. The header is
//! trusted first; only when it gives no hint is the body sniffed.

use serde::{Deserialize, Serialize};

/// Coarse kind of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Json,
    Text,
    Binary,
}

impl ContentKind {
    /// Classify a body from its `Content-Type` header and raw bytes.
    ///
    /// Decision order: a content type containing `json` wins regardless of
    /// the body; `text`, `xml`, or `html` classify as text; otherwise a body
    /// that decodes as UTF-8 is text and anything else is binary. Total
    /// function: classification never fails and never parses JSON.
    pub fn classify(content_type: Option<&str>, body: &[u8]) -> Self {
        let content_type = content_type.unwrap_or("").to_lowercase();

        if content_type.contains("json") {
            return Self::Json;
        }
        if content_type.contains("text")
            || content_type.contains("xml")
            || content_type.contains("html")
        {
            return Self::Text;
        }

        if std::str::from_utf8(body).is_ok() {
            Self::Text
        } else {
            Self::Binary
        }
    }

    /// Serialized name (`json`, `text`, `binary`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
