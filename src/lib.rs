//! AniLab Proxy - A caching proxy for the HiAnime API
//!
//! Forwards GET requests to the upstream API, caches successful JSON
//! responses with a TTL, and falls back to placeholder payloads when the
//! upstream is unavailable.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use proxy::{FetchOutcome, FetchSource, ProxyFetcher};
pub use tasks::BackgroundTasks;
