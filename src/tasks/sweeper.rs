//! Expiration Sweep Task
//!
//! Background task that periodically reclaims expired cache entries, so
//! entries that are never read again do not hold capacity until evicted.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::SharedCache;
use crate::cache::current_timestamp_ms;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The write lock is held only for the sweep itself. The returned handle is
/// aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let state = AppState::from_config(&config)?;
/// let sweep_handle = spawn_sweep_task(state.cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting expiration sweep task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired(current_timestamp_ms())
            };

            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppState;
    use crate::cache::{CacheConfig, CacheEngine};

    fn shared_cache() -> SharedCache {
        let engine = CacheEngine::new(CacheConfig::new(100, None).unwrap()).unwrap();
        AppState::new(engine).cache
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = shared_cache();

        cache
            .write()
            .await
            .set("expire_soon", "value", Some(Duration::from_millis(50)), current_timestamp_ms())
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(300)).await;

        // Reclaimed without any read touching the key
        {
            let cache_guard = cache.read().await;
            assert_eq!(cache_guard.len(), 0, "Expired entry should have been swept");
            assert_eq!(cache_guard.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let cache = shared_cache();

        cache
            .write()
            .await
            .set("long_lived", "value", Some(Duration::from_secs(3600)), current_timestamp_ms())
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;

        {
            let mut cache_guard = cache.write().await;
            let value = cache_guard.get("long_lived", current_timestamp_ms());
            assert_eq!(value.as_deref(), Some(&b"value"[..]), "Valid entry should not be removed");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let handle = spawn_sweep_task(shared_cache(), Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
