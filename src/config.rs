//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Base URL of the HiAnime API.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://nicolas-maduro.nescoroco.lat/api/v1";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for cached upstream responses
    pub cache_ttl: u64,
    /// Maximum number of cached responses
    pub cache_max_keys: usize,
    /// Expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// Stats report interval in seconds
    pub stats_interval: u64,
    /// Base URL prepended to every upstream path
    pub upstream_base_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// Directory served for non-API paths
    pub static_dir: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL` - Default TTL in seconds (default: 600)
    /// - `CACHE_MAX_KEYS` - Maximum cached responses (default: 1000)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: TTL * 0.2)
    /// - `STATS_INTERVAL` - Stats report frequency in seconds (default: 60)
    /// - `UPSTREAM_BASE_URL` - HiAnime API base URL
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 15)
    /// - `STATIC_DIR` - Static asset directory (default: public)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache_ttl = env_or("CACHE_TTL", defaults.cache_ttl);

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_ttl,
            cache_max_keys: env_or("CACHE_MAX_KEYS", defaults.cache_max_keys),
            sweep_interval: env_or("SWEEP_INTERVAL", sweep_interval_for(cache_ttl)),
            stats_interval: env_or("STATS_INTERVAL", defaults.stats_interval),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval.max(1))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: 600,
            cache_max_keys: 1000,
            sweep_interval: sweep_interval_for(600),
            stats_interval: 60,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: 15,
            static_dir: "public".to_string(),
        }
    }
}

/// Sweep every fifth of the TTL, never more often than once a second.
fn sweep_interval_for(ttl_secs: u64) -> u64 {
    (ttl_secs / 5).max(1)
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
