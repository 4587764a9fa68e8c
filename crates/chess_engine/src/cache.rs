//! Position-result cache
//!
//! Memoizes search results keyed by the full FEN of a position. The key
//! is stored and compared in full, so two different positions can never
//! share an entry.
//!
//! ## Eviction
//!
//! Capacity is bounded (default [`DEFAULT_CACHE_CAPACITY`]). When a new key
//! would exceed it, the single oldest-inserted entry is evicted first.
//! This is strict FIFO by insertion order. Reads and overwrites do not
//! refresh an entry's age.
//!
//! ## Validity
//!
//! The cache stores whatever it is given and never decides whether an
//! entry may be trusted. The search applies the depth, bound and mate
//! checks when probing (see `search::alphabeta`).

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::types::Evaluation;

/// What a stored value says about the true minimax value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The value is exact
    Exact,
    /// True value is at least this (search failed high)
    Lower,
    /// True value is at most this (search failed low)
    Upper,
}

/// One memoized search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub evaluation: Evaluation,
    /// Remaining depth the value was computed with
    pub depth: u32,
    pub bound: Bound,
}

/// Running counters, reset by [`PositionCache::clear`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let probes = self.hits + self.misses;
        if probes == 0 {
            0.0
        } else {
            self.hits as f64 / probes as f64
        }
    }
}

/// Stored entry plus the insertion stamp that ties it to its queue slot
#[derive(Debug, Clone, Copy)]
struct Slot {
    entry: CacheEntry,
    stamp: u64,
}

/// Bounded FIFO map from position key to [`CacheEntry`].
///
/// `order` holds `(stamp, key)` in insertion order. Removing a key leaves
/// its queue slot behind; eviction skips slots whose stamp no longer
/// matches the live entry.
#[derive(Debug, Clone)]
pub struct PositionCache {
    entries: HashMap<String, Slot>,
    order: VecDeque<(u64, String)>,
    next_stamp: u64,
    capacity: usize,
    stats: CacheStats,
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PositionCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 gives a cache that never stores anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            next_stamp: 0,
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up an entry. Counts a hit or a miss.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(slot) => {
                self.stats.hits += 1;
                Some(slot.entry)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up an entry without touching the statistics
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key).map(|slot| &slot.entry)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store an exact value
    pub fn store(&mut self, key: &str, evaluation: Evaluation, depth: u32) {
        self.store_bounded(key, evaluation, depth, Bound::Exact);
    }

    /// Store a value with its bound type.
    ///
    /// Overwriting an existing key keeps its place in the eviction order.
    pub fn store_bounded(&mut self, key: &str, evaluation: Evaluation, depth: u32, bound: Bound) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry {
            evaluation,
            depth,
            bound,
        };
        self.stats.stores += 1;

        if let Some(existing) = self.entries.get_mut(key) {
            existing.entry = entry;
            return;
        }

        while self.entries.len() >= self.capacity {
            if !self.evict_oldest() {
                break;
            }
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.entries.insert(key.to_string(), Slot { entry, stamp });
        self.order.push_back((stamp, key.to_string()));
        self.compact();
    }

    /// Drop one entry, e.g. a mate score that no longer holds
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key).map(|slot| slot.entry)
    }

    /// Remove every entry and reset the statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats = CacheStats::default();
    }

    /// Evict the oldest live entry. Returns false once the queue is empty.
    fn evict_oldest(&mut self) -> bool {
        while let Some((stamp, oldest)) = self.order.pop_front() {
            let live = self
                .entries
                .get(&oldest)
                .is_some_and(|slot| slot.stamp == stamp);
            if live {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
                trace!("[CACHE] Evicted {}", oldest);
                return true;
            }
        }
        false
    }

    /// Drop queue slots left behind by removals once they outnumber live entries
    fn compact(&mut self) {
        if self.order.len() <= 2 * self.entries.len().max(self.capacity.min(1024)) {
            return;
        }
        let entries = &self.entries;
        self.order
            .retain(|(stamp, key)| entries.get(key).is_some_and(|slot| slot.stamp == *stamp));
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let mut cache = PositionCache::new(10);
        cache.store("a", 42, 3);

        let entry = cache.get("a").expect("entry should be present");
        assert_eq!(entry.evaluation, 42);
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.bound, Bound::Exact);
        assert!(cache.get("b").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_fifo_eviction_of_oldest_insert() {
        //! Reading an entry must not protect it from eviction
        let mut cache = PositionCache::new(3);
        cache.store("k1", 1, 1);
        cache.store("k2", 2, 1);
        cache.store("k3", 3, 1);
        assert!(cache.get("k1").is_some());

        cache.store("k4", 4, 1);

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("k1"), "oldest insert should be evicted");
        assert!(cache.contains("k2"));
        assert!(cache.contains("k4"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_keeps_insertion_order() {
        let mut cache = PositionCache::new(2);
        cache.store("k1", 1, 1);
        cache.store("k2", 2, 1);
        cache.store("k1", 10, 5);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek("k1").map(|e| e.evaluation), Some(10));

        cache.store("k3", 3, 1);
        assert!(!cache.contains("k1"), "k1 is still the oldest insert");
        assert!(cache.contains("k2"));
        assert!(cache.contains("k3"));
    }

    #[test]
    fn test_zero_capacity_always_misses() {
        let mut cache = PositionCache::new(0);
        cache.store("a", 1, 1);
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = PositionCache::new(3);
        cache.store_bounded("a", 99_999, 2, Bound::Lower);
        cache.store("b", 5, 2);

        assert_eq!(cache.remove("a").map(|e| e.bound), Some(Bound::Lower));
        assert!(cache.remove("a").is_none());
        assert_eq!(cache.len(), 1);

        // Removal frees a slot without evicting anything else
        cache.store("c", 1, 1);
        cache.store("d", 1, 1);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 0);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_reinserted_key_is_evicted_by_its_new_age() {
        //! A key removed and stored again counts as a fresh insert
        let mut cache = PositionCache::new(2);
        cache.store("k1", 1, 1);
        cache.store("k2", 2, 1);
        cache.remove("k1");
        cache.store("k1", 3, 1);

        cache.store("k3", 4, 1);
        assert!(!cache.contains("k2"), "k2 is now the oldest insert");
        assert!(cache.contains("k1"));
        assert!(cache.contains("k3"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_removals_do_not_grow_the_queue_without_bound() {
        let mut cache = PositionCache::new(4);
        for i in 0..10_000 {
            cache.store("churn", i, 1);
            cache.remove("churn");
        }
        cache.store("kept", 1, 1);
        assert_eq!(cache.len(), 1);
        assert!(
            cache.queued() <= 2 * cache.capacity(),
            "queue holds {} slots",
            cache.queued()
        );
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(PositionCache::default().capacity(), 100_000);
    }
}
