//! Domain allowlist matching.
//!
//! Decides whether a hostname may be contacted at all. Patterns are plain
//! hostnames or globs (`*` matches any run of characters, `?` exactly one),
//! matched case-insensitively and anchored over the whole hostname. An exact
//! pattern is just a glob without metacharacters, so a single matcher covers
//! both. Matching is purely syntactic: no DNS lookup, no CNAME chasing, only
//! the literal hostname string from the URL.
//!
//! The default is deny. An empty list admits nothing.

use tracing::{info, warn};
use url::Url;

/// A single compiled hostname pattern.
///
/// Compiled once (lowercased, char-indexed) so matching is allocation-free
/// per candidate pattern.
#[derive(Debug, Clone)]
pub struct HostPattern {
    raw: String,
    chars: Vec<char>,
}

impl HostPattern {
    /// Compile a pattern. Never fails: any string is a valid pattern, it may
    /// just never match anything.
    pub fn new(pattern: impl Into<String>) -> Self {
        let raw = pattern.into();
        let chars = raw.to_lowercase().chars().collect();
        Self { raw, chars }
    }

    /// The pattern as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Anchored, case-insensitive match over the whole hostname.
    pub fn matches(&self, hostname: &str) -> bool {
        let host: Vec<char> = hostname.to_lowercase().chars().collect();
        glob_match(&self.chars, &host)
    }
}

/// The ordered, immutable set of admissible host patterns.
///
/// Loaded once at process start; any match admits, no match denies.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    patterns: Vec<HostPattern>,
}

impl Allowlist {
    /// Build from already-compiled patterns.
    pub fn new(patterns: Vec<HostPattern>) -> Self {
        Self { patterns }
    }

    /// Compile a list of pattern strings.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| HostPattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no pattern is configured (which denies everything).
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The configured pattern strings, for startup logging.
    pub fn pattern_strings(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.as_str()).collect()
    }

    /// Whether `hostname` is admitted. A stray `:port` suffix is stripped
    /// before matching; an empty hostname is always denied.
    pub fn permits(&self, hostname: &str) -> bool {
        let host = hostname.split(':').next().unwrap_or("").to_lowercase();
        if host.is_empty() {
            return false;
        }
        let candidate: Vec<char> = host.chars().collect();

        for pattern in &self.patterns {
            if glob_match(&pattern.chars, &candidate) {
                info!("domain {} matched pattern {}", host, pattern.as_str());
                return true;
            }
        }

        warn!("domain {} not in allowlist", host);
        false
    }

    /// Whether the host of `url` is admitted. URLs without a host (which
    /// cannot occur for well-formed http/https URLs, but the matcher does not
    /// assume that) are denied.
    pub fn permits_url(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.permits(host),
            None => false,
        }
    }
}

/// Anchored glob match of `pattern` against `text`.
///
/// `*` matches any run of characters (including dots), `?` exactly one
/// character, everything else itself. Iterative with single-star
/// backtracking, so pathological patterns stay linear-ish rather than
/// exponential.
fn glob_match(pattern: &[char], text: &[char]) -> bool {
    let mut p = 0;
    let mut t = 0;
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Backtrack: let the last '*' swallow one more character.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
