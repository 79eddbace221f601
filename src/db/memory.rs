//! In-process TTL cache backed by DashMap for lock-free concurrent access.
//! Used instead of Redis when `CACHE_BACKEND=memory`.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    db::cache::{CacheKey, RecommendationCache},
    error::AppResult,
    models::Product,
};

/// Longest an entry is kept, whatever TTL is asked for
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

struct CacheEntry {
    products: Vec<Product>,
    expires_at: Instant,
}

/// Per-process recommendation cache with lazy expiry
#[derive(Clone)]
pub struct MemoryCache {
    store: Arc<DashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    /// Remove expired entries. Returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let before = self.store.len();
        let now = Instant::now();
        self.store.retain(|_, entry| entry.expires_at > now);
        // Concurrent inserts can grow the map while it is being pruned
        before.saturating_sub(self.store.len())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait::async_trait]
impl RecommendationCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<Vec<Product>>> {
        let key = key.to_string();
        let Some(entry) = self.store.get(&key) else {
            return Ok(None);
        };
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.store.remove(&key);
            return Ok(None);
        }
        Ok(Some(entry.products.clone()))
    }

    fn set(&self, key: &CacheKey, products: &[Product], ttl: u64) {
        let key = key.to_string();
        if self.store.len() >= self.max_entries && !self.store.contains_key(&key) {
            // Full: make room from expired entries, otherwise skip the write
            if self.evict_expired() == 0 {
                tracing::debug!(key = %key, "Memory cache full, skipping write");
                return;
            }
        }
        let now = Instant::now();
        let ttl = Duration::from_secs(ttl).min(MAX_TTL);
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.store.insert(
            key,
            CacheEntry {
                products: products.to_vec(),
                expires_at,
            },
        );
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
