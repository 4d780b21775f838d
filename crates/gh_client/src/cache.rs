use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Clone, Debug)]
pub struct CachedPayload {
    pub body: Vec<u8>,
    pub stored_at: Instant,
}

impl CachedPayload {
    pub fn is_fresh_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// URL-keyed memoization of GET responses. Entries go stale after the
/// freshness horizon but are only ever superseded in place on refetch;
/// unbounded growth is accepted for a single session.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Mutex<HashMap<String, CachedPayload>>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.get_at(url, Instant::now()).await
    }

    /// Freshness evaluated against an explicit clock so expiry is testable.
    pub async fn get_at(&self, url: &str, now: Instant) -> Option<Vec<u8>> {
        let guard = self.inner.lock().await;
        guard
            .get(url)
            .filter(|entry| entry.is_fresh_at(now, self.ttl))
            .map(|entry| entry.body.clone())
    }

    pub async fn put(&self, url: String, body: Vec<u8>) {
        let mut guard = self.inner.lock().await;
        guard.insert(
            url,
            CachedPayload {
                body,
                stored_at: Instant::now(),
            },
        );
    }
}
