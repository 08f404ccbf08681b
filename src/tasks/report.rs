//! Stats Report Task
//!
//! Periodically logs cache hit/miss figures.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStats, SharedCache};

/// Spawns a task that logs the cache stats every `interval`.
pub fn spawn_stats_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so the first report
        // covers a full interval.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let stats = cache.read().await.stats();
            report(&stats);
        }
    })
}

fn report(stats: &CacheStats) {
    info!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = %format_hit_rate(stats.hit_rate()),
        size = stats.size,
        "cache stats"
    );
}

/// Formats a 0..=1 ratio as a percentage with one decimal, e.g. `87.5%`.
pub fn format_hit_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
