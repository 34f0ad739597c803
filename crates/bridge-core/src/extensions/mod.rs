//! Optional extension patterns.
//!
//! Reference components that sit around the core pipeline: per-domain
//! credential and header injection, per-domain overrides, rate limiting,
//! response caching, retry, and body transformation. None of them are wired
//! into the execution path (the pipeline never consults them), and each
//! owns its state explicitly, so wiring one in is a local change at the
//! call site.

pub mod auth;
pub mod cache;
pub mod overrides;
pub mod rate_limit;
pub mod retry;
pub mod transform;

pub use auth::{AuthInjector, DomainAuth, HeaderInjector};
pub use cache::ResponseCache;
pub use overrides::DomainOverrides;
pub use rate_limit::{DomainRateLimiter, RateLimit};
pub use retry::{execute_with_retry, RetryPolicy};
pub use transform::{redact_sensitive_values, EnvelopeUnwrapper, ResponseTransformer};
