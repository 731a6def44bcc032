//! Expired Entry Sweep
//!
//! Optional background task that periodically drops expired cache entries so
//! they stop occupying capacity. The cache itself only expires lazily; this
//! task runs only when a sweep interval is configured.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LruCache;

/// Spawns a task calling [`LruCache::cleanup_expired`] every `interval_secs`.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(LruCache::new(1000, Duration::from_secs(300)));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<K, V>(cache: Arc<LruCache<K, V>>, interval_secs: u64) -> JoinHandle<()>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    spawn_with_interval(cache, Duration::from_secs(interval_secs))
}

fn spawn_with_interval<K, V>(cache: Arc<LruCache<K, V>>, interval: Duration) -> JoinHandle<()>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "Starting expired entry sweep");

        loop {
            tokio::time::sleep(interval).await;

            // Lock is taken and released inside cleanup_expired
            let removed = cache.cleanup_expired();

            if removed > 0 {
                info!("Sweep: removed {} expired entries", removed);
            } else {
                debug!("Sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let cache: Arc<LruCache<String, String>> =
            Arc::new(LruCache::new(100, Duration::from_millis(50)));
        cache.put("expire_soon".to_string(), "value".to_string());

        let handle = spawn_with_interval(cache.clone(), Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(250)).await;

        // Gone without any read observing it
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_valid_entries() {
        let cache: Arc<LruCache<String, String>> =
            Arc::new(LruCache::new(100, Duration::from_secs(3600)));
        cache.put("long_lived".to_string(), "value".to_string());

        let handle = spawn_with_interval(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get(&"long_lived".to_string()), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache: Arc<LruCache<String, String>> =
            Arc::new(LruCache::new(10, Duration::from_secs(1)));

        let handle = spawn_sweep_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
