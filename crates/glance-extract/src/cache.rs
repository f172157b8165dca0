//! Extraction completion cache.
//!
//! Remembers which inputs have already been fully processed so repeated
//! requests skip extraction. Entries expire after a TTL and the map is
//! bounded; at capacity the oldest entry is evicted first.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// One completion record.
#[derive(Debug, Clone)]
struct CacheEntry {
    completed: bool,
    inserted_at: Instant,
}

/// Counters reported by [`ResultCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    /// Age of the oldest live entry, when any exist.
    pub oldest_age: Option<Duration>,
}

/// Bounded, time-expiring record of completed extractions.
///
/// All state sits behind one mutex; a lookup never observes a partially
/// written entry.
pub struct ResultCache {
    max_entries: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    /// Create a cache bounded at `max_entries` with the given TTL.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache with the defaults: 100 entries, 24 hour TTL.
    pub fn with_defaults() -> Self {
        Self::new(100, Duration::from_secs(24 * 60 * 60))
    }

    /// Whether `key` completed extraction within the TTL.
    ///
    /// An expired entry is purged on the way out (lazy expiry), so a key is
    /// never reported cached past its expiration window.
    pub fn is_cached(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let (expired, completed) = match entries.get(key) {
            None => return false,
            Some(entry) => (entry.inserted_at.elapsed() > self.ttl, entry.completed),
        };
        if expired {
            entries.remove(key);
            debug!(key, "Expired cache entry purged");
            return false;
        }
        completed
    }

    /// Record `key` as fully processed.
    ///
    /// When inserting a new key at capacity, the entry with the oldest
    /// timestamp is evicted first. Re-marking an existing key refreshes its
    /// timestamp without evicting anything.
    pub fn mark_completed(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                debug!(key = %oldest, "Evicted oldest cache entry");
            }
        }
        entries.insert(
            key.to_string(),
            CacheEntry {
                completed: true,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Forget one key.
    pub fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Live entry count and the oldest entry's age.
    ///
    /// Entries past their TTL are swept out before counting.
    pub fn stats(&self) -> CacheStats {
        let mut entries = self.entries.lock().unwrap();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() <= ttl);

        CacheStats {
            entries: entries.len(),
            oldest_age: entries.values().map(|entry| entry.inserted_at.elapsed()).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_ttl(ttl_ms: u64) -> ResultCache {
        ResultCache::new(100, Duration::from_millis(ttl_ms))
    }

    #[test]
    fn test_mark_then_lookup() {
        let cache = ResultCache::with_defaults();
        assert!(!cache.is_cached("a"));

        cache.mark_completed("a");
        assert!(cache.is_cached("a"));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let cache = ResultCache::with_defaults();
        assert!(!cache.is_cached("phantom"));
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_remove() {
        let cache = ResultCache::with_defaults();
        cache.mark_completed("a");
        cache.remove("a");
        assert!(!cache.is_cached("a"));
        // Removing an absent key is a no-op, not an error.
        cache.remove("a");
    }

    #[test]
    fn test_clear() {
        let cache = ResultCache::with_defaults();
        cache.mark_completed("a");
        cache.mark_completed("b");
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        assert!(cache.stats().oldest_age.is_none());
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = cache_with_ttl(10);
        cache.mark_completed("a");
        assert!(cache.is_cached("a"));

        std::thread::sleep(Duration::from_millis(25));
        assert!(!cache.is_cached("a"));
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_stats_sweeps_expired_entries() {
        let cache = cache_with_ttl(10);
        cache.mark_completed("a");
        std::thread::sleep(Duration::from_millis(25));

        // stats alone must not report the expired entry.
        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert!(stats.oldest_age.is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = ResultCache::new(3, Duration::from_secs(60));
        for key in ["a", "b", "c"] {
            cache.mark_completed(key);
            // Distinct timestamps on coarse clocks.
            std::thread::sleep(Duration::from_millis(2));
        }

        cache.mark_completed("d");

        assert!(!cache.is_cached("a"));
        assert!(cache.is_cached("b"));
        assert!(cache.is_cached("c"));
        assert!(cache.is_cached("d"));
        assert_eq!(cache.stats().entries, 3);
    }

    #[test]
    fn test_remarking_existing_key_does_not_evict() {
        let cache = ResultCache::new(2, Duration::from_secs(60));
        cache.mark_completed("a");
        std::thread::sleep(Duration::from_millis(2));
        cache.mark_completed("b");

        // "a" is the oldest, but re-marking "b" only refreshes "b".
        cache.mark_completed("b");
        assert!(cache.is_cached("a"));
        assert!(cache.is_cached("b"));
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn test_refreshed_key_is_no_longer_oldest() {
        let cache = ResultCache::new(2, Duration::from_secs(60));
        cache.mark_completed("a");
        std::thread::sleep(Duration::from_millis(2));
        cache.mark_completed("b");
        std::thread::sleep(Duration::from_millis(2));

        // Refresh "a"; now "b" holds the oldest timestamp.
        cache.mark_completed("a");
        cache.mark_completed("c");

        assert!(cache.is_cached("a"));
        assert!(!cache.is_cached("b"));
        assert!(cache.is_cached("c"));
    }

    #[test]
    fn test_stats_oldest_age() {
        let cache = ResultCache::with_defaults();
        cache.mark_completed("a");
        std::thread::sleep(Duration::from_millis(5));

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert!(stats.oldest_age.unwrap() >= Duration::from_millis(5));
    }
}
