//! Short-lived decision cache with TTL expiry and a bounded entry count

use dashmap::DashMap;
use palisade_core::{Action, ActorId, Decision};
use std::time::{Duration, Instant};

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before eviction kicks in.
    pub capacity: usize,

    /// Time-to-live for cached decisions.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl: Duration::from_millis(500),
        }
    }
}

/// Memoization key for one (actor, block, action) query.
///
/// Structural equality only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub actor: ActorId,
    pub dimension: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub action: Action,
}

#[derive(Clone)]
struct CachedEntry {
    decision: Decision,
    cached_at: Instant,
}

impl CachedEntry {
    fn new(decision: Decision) -> Self {
        Self {
            decision,
            cached_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }
}

/// Thread-safe decision cache.
///
/// TTL expiry and the entry bound are independent triggers: entries die on
/// read once stale, and inserting at capacity evicts the oldest slice
/// first. The short default TTL means the cache only ever absorbs bursts
/// of identical queries (e.g. a stack of events for one block), never
/// stale policy.
pub struct DecisionCache {
    entries: DashMap<CacheKey, CachedEntry>,
    config: CacheConfig,
    stats: DashMap<&'static str, usize>,
}

impl DecisionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            stats: DashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &CacheKey) -> Option<Decision> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired(self.config.ttl) {
                drop(entry);
                self.entries.remove(key);
                self.increment_stat("expirations");
                return None;
            }

            self.increment_stat("hits");
            return Some(entry.decision.clone());
        }

        self.increment_stat("misses");
        None
    }

    pub(crate) fn insert(&self, key: CacheKey, decision: Decision) {
        if self.entries.len() >= self.config.capacity {
            self.evict_oldest();
        }

        self.entries.insert(key, CachedEntry::new(decision));
    }

    /// Drop every entry (provider set changed, teardown).
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            expirations: self.get_stat("expirations"),
            entries: self.entries.len(),
            max_entries: self.config.capacity,
        }
    }

    /// Remove the oldest ~10% of entries to make room.
    fn evict_oldest(&self) {
        let to_remove = (self.config.capacity / 10).max(1);

        let mut ages: Vec<(CacheKey, Instant)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().cached_at))
            .collect();
        ages.sort_by_key(|(_, cached_at)| *cached_at);

        for (key, _) in ages.into_iter().take(to_remove) {
            self.entries.remove(&key);
        }
    }

    fn increment_stat(&self, key: &'static str) {
        self.stats
            .entry(key)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub expirations: usize,
    pub entries: usize,
    pub max_entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
