//! Per-key single-flight coordination

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Hands out one async mutex per key so that concurrent cache misses for the
/// same key share a single upstream fetch.
///
/// Usage pattern: check the cache, and on a miss or stale hit acquire the
/// key's guard, then **re-check the cache** before fetching — a waiter that
/// acquires the guard after another task completed the fetch finds a fresh
/// entry and returns without touching the upstream.
///
/// ```no_run
/// # async fn example(flights: &stale_cache::FlightGroup,
/// #                  cache: &stale_cache::TtlCache<String>) {
/// let guard = flights.guard("news:general");
/// let _held = guard.lock().await;
/// if let Some((value, false)) = cache.get("news:general") {
///     return; // someone else fetched while we waited
/// }
/// // ... perform the fetch, then cache.set(...)
/// # }
/// ```
///
/// Guards are kept for the lifetime of the group; the key space here is a
/// small set of logical cache keys, not unbounded request input.
pub struct FlightGroup {
    guards: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FlightGroup {
    pub fn new() -> Self {
        Self {
            guards: Mutex::new(HashMap::new()),
        }
    }

    /// Get the guard for `key`, creating it on first use
    pub fn guard(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut guards = self.guards.lock().unwrap();
        guards
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

impl Default for FlightGroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TtlCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_same_key_returns_same_guard() {
        let flights = FlightGroup::new();
        let a = flights.guard("k");
        let b = flights.guard("k");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_different_keys_do_not_share_a_guard() {
        let flights = FlightGroup::new();
        let a = flights.guard("a");
        let b = flights.guard("b");
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let flights = Arc::new(FlightGroup::new());
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)).unwrap());
        let fetches = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let flights = flights.clone();
            let cache = cache.clone();
            let fetches = fetches.clone();
            tasks.push(tokio::spawn(async move {
                if let Some((value, false)) = cache.get("k") {
                    return value;
                }
                let guard = flights.guard("k");
                let _held = guard.lock().await;
                if let Some((value, false)) = cache.get("k") {
                    return value;
                }
                // the simulated upstream fetch
                fetches.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                cache.set("k", 42u32);
                42
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap(), 42);
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
