//! Response DTOs for the proxy's own endpoints
//!
//! Proxied `/api/*` responses carry the upstream payload unchanged; these
//! types cover the cache management and health routes.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    /// Current number of entries in cache
    pub size: usize,
    /// hits / (hits + misses), 0 when nothing was looked up
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            deletes: stats.deletes,
            size: stats.size,
        }
    }
}

/// Response body for the flush endpoint (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub success: bool,
    pub message: String,
    /// Entries dropped by the flush
    pub cleared: usize,
}

impl FlushResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            success: true,
            message: "Cache cleared".to_string(),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
