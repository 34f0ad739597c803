//! TTL caching of successful GET outcomes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;
use url::Url;

use crate::outcome::FetchOutcome;
use crate::request::HttpMethod;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct CacheEntry {
    outcome: FetchOutcome,
    stored_at: Instant,
}

/// In-memory response cache keyed by method and URL.
///
/// Only successful GET outcomes for domains with a registered TTL are
/// cached. Capacity-bounded: inserting past capacity evicts the oldest
/// entry.
#[derive(Debug)]
pub struct ResponseCache {
    ttls: HashMap<String, Duration>,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ttls: HashMap::new(),
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a TTL for a hostname. Domains without one are never cached.
    pub fn with_ttl(mut self, hostname: impl Into<String>, ttl: Duration) -> Self {
        self.ttls.insert(hostname.into(), ttl);
        self
    }

    fn key(method: HttpMethod, url: &Url) -> String {
        format!("{method}:{url}")
    }

    /// A fresh cached outcome for this request, if one exists. Expired
    /// entries are dropped on lookup.
    pub fn get(&self, method: HttpMethod, url: &Url) -> Option<FetchOutcome> {
        if method != HttpMethod::Get {
            return None;
        }
        let ttl = *self.ttls.get(url.host_str()?)?;

        let key = Self::key(method, url);
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < ttl => {
                debug!("Cache hit for {url}");
                Some(entry.outcome.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store an outcome if it is a successful GET to a cacheable domain.
    pub fn store(&self, method: HttpMethod, url: &Url, outcome: &FetchOutcome) {
        if method != HttpMethod::Get || !outcome.is_success() {
            return;
        }
        let Some(host) = url.host_str() else { return };
        let Some(ttl) = self.ttls.get(host) else { return };

        let key = Self::key(method, url);
        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                outcome: outcome.clone(),
                stored_at: Instant::now(),
            },
        );
        debug!("Cached response for {url} (ttl: {}s)", ttl.as_secs());
    }

    /// Number of live entries (expired ones included until next lookup).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::RawResponse;

    fn success(url: &str) -> FetchOutcome {
        FetchOutcome::from_response(RawResponse {
            status: 200,
            headers: HashMap::new(),
            body: b"ok".to_vec(),
            final_url: url.to_string(),
            elapsed_ms: 1,
        })
    }

    fn failure() -> FetchOutcome {
        FetchOutcome::from_error(&crate::error::FetchError::Timeout { seconds: 1.0 })
    }

    fn cache() -> ResponseCache {
        ResponseCache::new().with_ttl("api.hvs", Duration::from_secs(60))
    }

    #[test]
    fn test_store_and_hit() {
        let cache = cache();
        let url = Url::parse("https://api.hvs/users").unwrap();

        assert!(cache.get(HttpMethod::Get, &url).is_none());
        cache.store(HttpMethod::Get, &url, &success("https://api.hvs/users"));

        let hit = cache.get(HttpMethod::Get, &url).unwrap();
        assert!(hit.is_success());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_non_get_not_cached() {
        let cache = cache();
        let url = Url::parse("https://api.hvs/users").unwrap();

        cache.store(HttpMethod::Post, &url, &success("https://api.hvs/users"));
        assert!(cache.is_empty());
        assert!(cache.get(HttpMethod::Post, &url).is_none());
    }

    #[test]
    fn test_failure_not_cached() {
        let cache = cache();
        let url = Url::parse("https://api.hvs/users").unwrap();

        cache.store(HttpMethod::Get, &url, &failure());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_domain_without_ttl_not_cached() {
        let cache = cache();
        let url = Url::parse("https://other.hvs/users").unwrap();

        cache.store(HttpMethod::Get, &url, &success("https://other.hvs/users"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_dropped() {
        let cache = ResponseCache::new().with_ttl("api.hvs", Duration::from_millis(40));
        let url = Url::parse("https://api.hvs/users").unwrap();

        cache.store(HttpMethod::Get, &url, &success("https://api.hvs/users"));
        std::thread::sleep(Duration::from_millis(50));

        assert!(cache.get(HttpMethod::Get, &url).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = ResponseCache::with_capacity(2).with_ttl("api.hvs", Duration::from_secs(60));

        for path in ["a", "b", "c"] {
            let url = Url::parse(&format!("https://api.hvs/{path}")).unwrap();
            cache.store(HttpMethod::Get, &url, &success(url.as_str()));
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(cache.len(), 2);
        let newest = Url::parse("https://api.hvs/c").unwrap();
        assert!(cache.get(HttpMethod::Get, &newest).is_some());
        let oldest = Url::parse("https://api.hvs/a").unwrap();
        assert!(cache.get(HttpMethod::Get, &oldest).is_none());
    }
}
