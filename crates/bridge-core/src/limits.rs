//! Fixed resource bounds for request execution.
//!
//! These are process-wide constants, deliberately not caller-settable: the
//! bridge exists to keep outbound traffic bounded no matter what the caller
//! asks for.

/// Timeout applied when the caller does not supply one, in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Upper bound on the caller-supplied timeout, in seconds (5 minutes).
pub const MAX_TIMEOUT_SECS: f64 = 300.0;

/// Hard cap on response body size, in bytes (10 MiB). Reading stops the
/// moment the cumulative byte count would cross this line.
pub const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// Redirect-following cap when redirects are enabled.
pub const MAX_REDIRECTS: usize = 5;
