//! Background Tasks Module
//!
//! Periodic work tied to the lifetime of the cache.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries
//! - Stats report: logs hit/miss figures

mod report;
mod sweep;

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::SharedCache;

pub use report::{format_hit_rate, spawn_stats_task};
pub use sweep::spawn_sweep_task;

// == Background Tasks ==
/// Owns the background tasks of one cache.
///
/// Tasks are aborted by [`BackgroundTasks::shutdown`], or when the guard is
/// dropped.
#[derive(Debug)]
pub struct BackgroundTasks {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Starts the sweep and stats tasks for `cache`.
    pub fn start(cache: &SharedCache, sweep_interval: Duration, stats_interval: Duration) -> Self {
        Self {
            handles: vec![
                spawn_sweep_task(cache.clone(), sweep_interval),
                spawn_stats_task(cache.clone(), stats_interval),
            ],
        }
    }

    /// Number of tasks still running.
    pub fn running(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Aborts every task and waits for them to stop.
    pub async fn shutdown(mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
            // A cancelled JoinError is the expected outcome
            let _ = handle.await;
        }
        info!("background tasks stopped");
    }
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
