//! In-memory result cache with a TTL and an LRU size bound.

use crate::config::CacheConfig;
use crate::report::GenerationStats;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Cached output for one (token set, options) key
#[derive(Debug)]
pub struct CacheEntry {
    pub key: String,
    pub css: String,
    pub stats: GenerationStats,
    pub expires_at: Instant,
    last_access: AtomicU64,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Logical clock value of the most recent read or write
    pub fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }
}

/// Counters exposed by [`CssCache::stats`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entries: usize,
    pub hit_rate: f64,
}

#[derive(Debug, Default)]
struct Counters {
    total_requests: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

/// Thread-safe cache shared between generator calls.
///
/// Reads take the read lock and bump the entry's access clock atomically;
/// inserts, evictions and lazy expiry removals take the write lock.
#[derive(Debug)]
pub struct CssCache {
    config: CacheConfig,
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
    clock: AtomicU64,
    counters: Counters,
}

impl CssCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<CacheEntry>>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<CacheEntry>>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Look up a live entry; expired entries are removed and count as misses.
    pub fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);
        if !self.config.enabled {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let now = Instant::now();
        let expired = {
            let entries = self.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    entry.last_access.store(self.tick(), Ordering::Relaxed);
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(Arc::clone(entry));
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = self.write();
            if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
                entries.remove(key);
                self.counters.expirations.fetch_add(1, Ordering::Relaxed);
                debug!("Cache entry {} expired", key);
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result, evicting least recently used entries past the bound.
    pub fn set(&self, key: &str, css: String, stats: GenerationStats) {
        if !self.config.enabled || self.config.max_entries == 0 {
            return;
        }

        let entry = Arc::new(CacheEntry {
            key: key.to_string(),
            css,
            stats,
            expires_at: Instant::now() + self.config.ttl(),
            last_access: AtomicU64::new(self.tick()),
        });

        let mut entries = self.write();
        entries.insert(key.to_string(), entry);

        while entries.len() > self.config.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access())
                .map(|(key, _)| key.clone());
            match oldest {
                Some(oldest) => {
                    entries.remove(&oldest);
                    self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!("Evicted cache entry {}", oldest);
                }
                None => break,
            }
        }
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let total_requests = self.counters.total_requests.load(Ordering::Relaxed);
        let cache_hits = self.counters.hits.load(Ordering::Relaxed);
        CacheStats {
            total_requests,
            cache_hits,
            cache_misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
            entries: self.len(),
            hit_rate: if total_requests == 0 {
                0.0
            } else {
                cache_hits as f64 / total_requests as f64
            },
        }
    }
}

impl Default for CssCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Key for a token set: order and duplicates do not matter, every
/// output-affecting setting in `fingerprint` does.
pub fn cache_key<S: AsRef<str>>(tokens: &[S], fingerprint: &str) -> String {
    let mut sorted: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.dedup();

    // length prefixes keep token boundaries unambiguous
    let mut material = String::new();
    for token in &sorted {
        material.push_str(&token.len().to_string());
        material.push(':');
        material.push_str(token);
    }
    material.push('\u{0}');
    material.push_str(fingerprint);
    format!("{:x}", md5::compute(material.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn config(max_entries: usize, ttl_secs: u64) -> CacheConfig {
        CacheConfig {
            enabled: true,
            max_entries,
            ttl_secs,
        }
    }

    #[test]
    fn test_set_and_get() {
        let cache = CssCache::default();
        assert!(cache.get("k").is_none());
        cache.set("k", ".a{b:c}".to_string(), GenerationStats::default());

        let entry = cache.get("k").unwrap();
        assert_eq!(entry.css, ".a{b:c}");
        assert_eq!(entry.key, "k");

        let stats = cache.stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = CssCache::new(config(2, 60));
        cache.set("a", "a".into(), GenerationStats::default());
        cache.set("b", "b".into(), GenerationStats::default());
        assert!(cache.get("a").is_some());
        cache.set("c", "c".into(), GenerationStats::default());

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_ttl_expiry_is_lazy() {
        let cache = CssCache::new(config(10, 0));
        cache.set("a", "a".into(), GenerationStats::default());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_disabled_cache() {
        let cache = CssCache::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });
        cache.set("a", "a".into(), GenerationStats::default());
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = CssCache::default();
        cache.set("a", "a".into(), GenerationStats::default());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = cache_key(&["p-[1px]", "m-[2px]", "p-[1px]"], "opts");
        let b = cache_key(&["m-[2px]", "p-[1px]"], "opts");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(a, cache_key(&["m-[2px]", "p-[1px]"], "other"));
        assert_ne!(a, cache_key(&["m-[2px]"], "opts"));
    }

    #[test]
    fn test_cache_key_keeps_token_boundaries() {
        let joined = cache_key(&["m-[2rem]\np-[1rem]"], "opts");
        let split = cache_key(&["p-[1rem]", "m-[2rem]"], "opts");
        assert_ne!(joined, split);
        assert_ne!(cache_key(&["a:b"], "opts"), cache_key(&["a", "b"], "opts"));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(CssCache::new(config(50, 60)));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("{}-{}", i, j % 10);
                        cache.set(&key, key.clone(), GenerationStats::default());
                        if let Some(entry) = cache.get(&key) {
                            assert_eq!(entry.css, entry.key);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 50);
    }
}
