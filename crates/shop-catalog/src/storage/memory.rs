//! Process-wide keyed cache using DashMap

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-memory cache of serialized values
///
/// Entries without a TTL stay until they are deleted explicitly. Every
/// delete bumps the key's generation, so a value computed before the delete
/// can be refused with [`MemoryCache::set_if_generation`].
pub struct MemoryCache {
    data: Arc<DashMap<String, CacheEntry>>,
    generations: DashMap<String, u64>,
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|expires| now > expires).unwrap_or(false)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        let cache = Self {
            data: Arc::new(DashMap::new()),
            generations: DashMap::new(),
        };

        // Expired entries are also dropped lazily on read
        if tokio::runtime::Handle::try_current().is_ok() {
            cache.start_sweeper();
        }

        cache
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        {
            let entry = self.data.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }

        // Only drop what is still expired, a concurrent set may have replaced it
        self.data.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Store `value`, optionally expiring after `ttl`
    pub fn set(&self, key: impl Into<String>, value: Vec<u8>, ttl: Option<Duration>) {
        self.data.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
    }

    /// Current generation of `key`, read before computing a value for it
    pub fn generation(&self, key: &str) -> u64 {
        self.generations.get(key).map(|g| *g).unwrap_or(0)
    }

    /// Store `value` unless `key` was deleted since `generation` was read
    ///
    /// Returns whether the value was stored.
    pub fn set_if_generation(
        &self,
        key: impl Into<String>,
        generation: u64,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> bool {
        // Holding the generation entry serializes this against delete
        let current = self.generations.entry(key.into()).or_insert(0);
        if *current != generation {
            return false;
        }

        self.data.insert(
            current.key().clone(),
            CacheEntry {
                value,
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        true
    }

    /// Returns whether an entry was removed
    pub fn delete(&self, key: &str) -> bool {
        let mut generation = self.generations.entry(key.to_string()).or_insert(0);
        *generation += 1;
        self.data.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn clear(&self) {
        let keys: Vec<String> = self.data.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            self.delete(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn start_sweeper(&self) {
        // Weak so the task ends once the cache is dropped
        let data = Arc::downgrade(&self.data);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;

                let Some(data) = data.upgrade() else {
                    break;
                };
                let now = Instant::now();
                data.retain(|_, entry| !entry.is_expired(now));
            }
        });
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}
