//! Response cache with TTL and LRU eviction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

/// A simple TTL + LRU cache for model responses.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<RwLock<CacheInner>>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    max_entries: usize,
    ttl: Duration,
}

struct CacheEntry {
    value: String,
    inserted_at: Instant,
    last_accessed: Instant,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("len", &self.len())
            .finish()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(256, Duration::from_secs(3600))
    }
}

impl ResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                entries: HashMap::new(),
                max_entries: max_entries.max(1),
                ttl,
            })),
        }
    }

    /// Derive a stable cache key from arbitrary request bytes.
    pub fn key_for(input: &[u8]) -> String {
        format!("{:x}", Sha256::digest(input))
    }

    /// Get a cached value by key, returning None if expired or missing.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());
        let ttl = inner.ttl;

        let expired = inner
            .entries
            .get(key)
            .map(|e| e.inserted_at.elapsed() > ttl);
        match expired {
            Some(true) => {
                inner.entries.remove(key);
                None
            }
            Some(false) => {
                let entry = inner.entries.get_mut(key)?;
                entry.last_accessed = Instant::now();
                Some(entry.value.clone())
            }
            None => None,
        }
    }

    /// Insert a value, evicting LRU if at capacity.
    pub fn insert(&self, key: String, value: String) {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());

        let ttl = inner.ttl;
        inner.entries.retain(|_, e| e.inserted_at.elapsed() <= ttl);

        if !inner.entries.contains_key(&key) && inner.entries.len() >= inner.max_entries {
            if let Some(lru_key) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(k, _)| k.clone())
            {
                inner.entries.remove(&lru_key);
            }
        }

        let now = Instant::now();
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_accessed: now,
            },
        );
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.inner.write().unwrap_or_else(|p| p.into_inner()).entries.clear();
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|p| p.into_inner()).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
