//! Controlled outbound-HTTP bridge.
//!
//! This crate decides whether a target host may be contacted at all (static
//! allowlist, exact and wildcard patterns), validates raw request parameters,
//! executes the request under strict bounds (one timeout budget, fixed
//! redirect cap, streaming response-size cap), and returns a normalized,
//! redacted result with a structured error taxonomy.
//!
//! The pipeline is linear with early exits:
//! parameters → validation → allowlist → execution → classification and
//! sanitization → outcome. Invocations are independent and stateless; the
//! only shared resources are the immutable allowlist and the pooled HTTP
//! clients.

pub mod allowlist;
pub mod bridge;
pub mod config;
pub mod content;
pub mod error;
pub mod executor;
pub mod extensions;
pub mod limits;
pub mod outcome;
pub mod request;
pub mod sanitize;

// Re-export commonly used types
pub use allowlist::{Allowlist, HostPattern};
pub use bridge::HttpBridge;
pub use config::{BridgeConfig, ConfigError};
pub use content::ContentKind;
pub use error::{ErrorKind, FetchError, FetchResult};
pub use executor::HttpExecutor;
pub use outcome::{FetchFailure, FetchOutcome, FetchSuccess, RawResponse};
pub use request::{FetchParams, FetchRequest, HttpMethod};
