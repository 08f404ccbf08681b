//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries. Lookups
//! already ignore expired entries, so this only reclaims memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that calls [`CacheStore::cleanup_expired`] every `interval`.
///
/// The returned handle is owned by [`BackgroundTasks`], which aborts it on
/// shutdown.
///
/// [`CacheStore::cleanup_expired`]: crate::cache::CacheStore::cleanup_expired
/// [`BackgroundTasks`]: crate::tasks::BackgroundTasks
pub fn spawn_sweep_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup_expired();

            if removed > 0 {
                info!(removed, "cache sweep removed expired entries");
            } else {
                debug!("cache sweep found no expired entries");
            }
        }
    })
}
