//! TTL cache with advisory staleness

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Construction error: the TTL must be positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTtl;

impl fmt::Display for InvalidTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache TTL must be a positive duration")
    }
}

impl std::error::Error for InvalidTtl {}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// In-memory key/value cache where expiry is advisory, not evictive.
///
/// `get` always returns the stored value if one exists, together with a
/// staleness flag; entries are never dropped on expiry. This makes the cache
/// a stale-fallback buffer: when an upstream fetch fails, the caller can
/// still serve the last known value. Memory is bounded by the distinct key
/// space, which for this service is a handful of news categories and ticker
/// symbols.
///
/// All keys in one cache instance share a single TTL fixed at construction.
/// A `set` replaces the entry wholesale, so a concurrent `get` observes
/// either the old entry or the new one, never a partial write.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache whose entries go stale after `ttl`.
    ///
    /// Rejects a zero TTL: every entry would be born stale, which is always
    /// a configuration mistake.
    pub fn new(ttl: Duration) -> Result<Self, InvalidTtl> {
        if ttl.is_zero() {
            return Err(InvalidTtl);
        }
        Ok(Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        })
    }

    /// The TTL shared by all entries in this cache
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or overwrite the entry for `key`, timestamped now
    pub fn set(&self, key: &str, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Look up `key`. Returns the value and whether it is stale, or `None`
    /// if the key was never set. A stale hit still carries the full value.
    pub fn get(&self, key: &str) -> Option<(V, bool)> {
        self.get_at(key, Instant::now())
    }

    /// Number of entries currently stored (fresh and stale alike)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    fn insert_at(&self, key: &str, value: V, inserted_at: Instant) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), CacheEntry { value, inserted_at });
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<(V, bool)> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).map(|entry| {
            let stale = now.duration_since(entry.inserted_at) > self.ttl;
            (entry.value.clone(), stale)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_zero_ttl_rejected() {
        assert_eq!(
            TtlCache::<String>::new(Duration::ZERO).err(),
            Some(InvalidTtl)
        );
    }

    #[test]
    fn test_get_after_set_is_fresh() {
        let cache = TtlCache::new(TTL).unwrap();
        cache.set("news:general", "headline".to_string());
        let (value, stale) = cache.get("news:general").unwrap();
        assert_eq!(value, "headline");
        assert!(!stale);
    }

    #[test]
    fn test_never_set_key_is_absent() {
        let cache = TtlCache::<String>::new(TTL).unwrap();
        assert!(cache.get("news:general").is_none());
    }

    #[test]
    fn test_entry_goes_stale_but_is_not_evicted() {
        let cache = TtlCache::new(TTL).unwrap();
        let base = Instant::now();
        cache.insert_at("news:general", "headline".to_string(), base);

        // one second past the TTL
        let later = base + TTL + Duration::from_secs(1);
        let (value, stale) = cache.get_at("news:general", later).unwrap();
        assert_eq!(value, "headline");
        assert!(stale);

        // much later the value is still there, unchanged
        let much_later = base + TTL * 100;
        let (value, stale) = cache.get_at("news:general", much_later).unwrap();
        assert_eq!(value, "headline");
        assert!(stale);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_fresh_exactly_at_ttl() {
        let cache = TtlCache::new(TTL).unwrap();
        let base = Instant::now();
        cache.insert_at("k", 1u32, base);
        let (_, stale) = cache.get_at("k", base + TTL).unwrap();
        assert!(!stale, "staleness requires age strictly greater than TTL");
    }

    #[test]
    fn test_set_replaces_entry_and_timestamp() {
        let cache = TtlCache::new(TTL).unwrap();
        let base = Instant::now();
        cache.insert_at("k", 1u32, base);

        // overwrite after expiry: entry is fresh again with the new value
        let later = base + TTL + Duration::from_secs(1);
        cache.insert_at("k", 2u32, later);
        let (value, stale) = cache.get_at("k", later).unwrap();
        assert_eq!(value, 2);
        assert!(!stale);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = TtlCache::new(TTL).unwrap();
        let base = Instant::now();
        cache.insert_at("old", 1u32, base);
        cache.insert_at("new", 2u32, base + TTL);

        let now = base + TTL + Duration::from_secs(1);
        assert_eq!(cache.get_at("old", now), Some((1, true)));
        assert_eq!(cache.get_at("new", now), Some((2, false)));
    }
}
