//! Upstream Module
//!
//! The outbound side of the proxy: a trait seam for "GET a JSON document"
//! and the reqwest-backed HiAnime client implementing it.

mod client;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

pub use client::HiAnimeClient;

/// A JSON API reachable by path and query string.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Performs one GET of `path` with the given query pairs and returns the
    /// decoded JSON body.
    async fn get_json(&self, path: &str, query: &[(String, String)])
        -> Result<Value, UpstreamError>;
}
