//! Cache-backed read path for provider-sourced data
//!
//! Every endpoint that talks to the provider at request time (news, index
//! quotes) goes through [`read_through`]: fresh cache hits short-circuit,
//! misses share one upstream fetch per key, and when the provider is
//! throttling a stale entry is served instead of an error.

use crate::error::AppError;
use finnhub_client::FinnhubError;
use stale_cache::{FlightGroup, TtlCache};
use std::future::Future;
use tracing::{info, warn};

/// Resolve `key` through the cache, fetching from the provider on a miss.
///
/// Returns the value and whether it was served stale. The decision ladder:
///
/// 1. Fresh cache hit: return it, no provider call.
/// 2. Miss or stale hit: acquire the key's flight guard, re-check the cache
///    (another request may have completed the fetch while we waited), then
///    fetch.
/// 3. Fetch succeeded: cache and return fresh.
/// 4. Fetch rate-limited: serve the stale entry if one exists, otherwise 503.
/// 5. Fetch failed any other way: 502. Stale data does not paper over a
///    broken provider, only a throttled one.
pub async fn read_through<V, F, Fut>(
    cache: &TtlCache<V>,
    flights: &FlightGroup,
    key: &str,
    fetch: F,
) -> Result<(V, bool), AppError>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, FinnhubError>>,
{
    if let Some((value, false)) = cache.get(key) {
        return Ok((value, false));
    }

    let guard = flights.guard(key);
    let _held = guard.lock().await;

    if let Some((value, false)) = cache.get(key) {
        return Ok((value, false));
    }

    match fetch().await {
        Ok(value) => {
            cache.set(key, value.clone());
            Ok((value, false))
        }
        Err(e) if e.is_rate_limited() => match cache.get(key) {
            Some((value, _)) => {
                info!(key = %key, "Provider rate limited; serving stale cache entry");
                Ok((value, true))
            }
            None => Err(AppError::from_provider(e)),
        },
        Err(e) => {
            warn!(key = %key, error = %e, "Provider fetch failed");
            Err(AppError::from_provider(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn fixtures(ttl: Duration) -> (TtlCache<String>, FlightGroup) {
        (TtlCache::new(ttl).unwrap(), FlightGroup::new())
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let (cache, flights) = fixtures(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let (value, stale) = read_through(&cache, &flights, "k", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("fetched".to_string())
        })
        .await
        .unwrap();

        assert_eq!(value, "fetched");
        assert!(!stale);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("k"), Some(("fetched".to_string(), false)));
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_provider() {
        let (cache, flights) = fixtures(Duration::from_secs(60));
        cache.set("k", "cached".to_string());

        let (value, stale) = read_through(&cache, &flights, "k", || async {
            panic!("fresh hit must not reach the provider")
        })
        .await
        .unwrap();

        assert_eq!(value, "cached");
        assert!(!stale);
    }

    #[tokio::test]
    async fn test_rate_limited_serves_stale_entry() {
        let (cache, flights) = fixtures(Duration::from_millis(10));
        cache.set("k", "old".to_string());
        tokio::time::sleep(Duration::from_millis(30)).await;

        let (value, stale) = read_through(&cache, &flights, "k", || async {
            Err(FinnhubError::RateLimited)
        })
        .await
        .unwrap();

        assert_eq!(value, "old");
        assert!(stale);
    }

    #[tokio::test]
    async fn test_rate_limited_with_empty_cache_is_unavailable() {
        let (cache, flights) = fixtures(Duration::from_secs(60));

        let err = read_through::<String, _, _>(&cache, &flights, "k", || async {
            Err(FinnhubError::RateLimited)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_non_throttle_failure_is_upstream_even_with_stale_entry() {
        let (cache, flights) = fixtures(Duration::from_millis(10));
        cache.set("k", "old".to_string());
        tokio::time::sleep(Duration::from_millis(30)).await;

        let err = read_through(&cache, &flights, "k", || async {
            Err(FinnhubError::Api("Finnhub returned status 500".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_stale_hit_refetches_and_replaces() {
        let (cache, flights) = fixtures(Duration::from_millis(10));
        cache.set("k", "old".to_string());
        tokio::time::sleep(Duration::from_millis(30)).await;

        let (value, stale) = read_through(&cache, &flights, "k", || async {
            Ok("new".to_string())
        })
        .await
        .unwrap();

        assert_eq!(value, "new");
        assert!(!stale);
        assert_eq!(cache.get("k"), Some(("new".to_string(), false)));
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)).unwrap());
        let flights = Arc::new(FlightGroup::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..12 {
            let cache = cache.clone();
            let flights = flights.clone();
            let calls = calls.clone();
            tasks.push(tokio::spawn(async move {
                read_through(&cache, &flights, "k", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok("v".to_string())
                })
                .await
                .unwrap()
            }));
        }

        for task in tasks {
            let (value, stale) = task.await.unwrap();
            assert_eq!(value, "v");
            assert!(!stale);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
