//! Proxy Fetcher
//!
//! Wraps upstream calls with the response cache and the fallback policy.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::fallback::{unavailable_payload, FallbackRegistry};
use super::key::{CacheKey, QueryParams};
use crate::cache::SharedCache;
use crate::error::UpstreamError;
use crate::upstream::Upstream;

/// Where a fetched payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// Served from the cache, no upstream call
    Cache,
    /// Fresh upstream payload, now cached
    Upstream,
    /// Upstream failed; registered family fallback
    Fallback,
    /// Upstream failed and no fallback applies
    Unavailable,
}

impl FetchSource {
    /// Value of the `x-cache` response header.
    pub fn as_header(&self) -> &'static str {
        match self {
            FetchSource::Cache => "HIT",
            FetchSource::Upstream => "MISS",
            FetchSource::Fallback => "FALLBACK",
            FetchSource::Unavailable => "UNAVAILABLE",
        }
    }
}

/// Result of [`ProxyFetcher::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub source: FetchSource,
    /// `{success: true, data}` or `{success: false, message}`
    pub body: Value,
}

impl FetchOutcome {
    fn new(source: FetchSource, body: Value) -> Self {
        Self { source, body }
    }

    pub fn is_success(&self) -> bool {
        is_success_payload(&self.body)
    }
}

/// Fetches upstream payloads through the response cache.
///
/// Concurrent misses for the same key each call the upstream; requests are
/// not coalesced.
pub struct ProxyFetcher {
    cache: SharedCache,
    upstream: Arc<dyn Upstream>,
    fallbacks: FallbackRegistry,
}

impl ProxyFetcher {
    pub fn new(cache: SharedCache, upstream: Arc<dyn Upstream>, fallbacks: FallbackRegistry) -> Self {
        Self {
            cache,
            upstream,
            fallbacks,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Returns the payload for `path` with `params`.
    ///
    /// Never fails: key derivation errors and upstream failures become a
    /// fallback or the generic `API unavailable` payload, neither of which
    /// is cached.
    pub async fn fetch(&self, path: &str, params: &QueryParams) -> FetchOutcome {
        match CacheKey::derive(path, params) {
            Ok(key) => self.fetch_key(&key).await,
            Err(err) => {
                warn!(%path, error = %err, "rejecting request with malformed cache key");
                FetchOutcome::new(FetchSource::Unavailable, unavailable_payload())
            }
        }
    }

    /// Same as [`ProxyFetcher::fetch`] for an already derived key.
    ///
    /// Lookups share the read lock; only storing a fresh payload writes.
    pub async fn fetch_key(&self, key: &CacheKey) -> FetchOutcome {
        let cached = self.cache.read().await.get(key.as_str());
        if let Some(cached) = cached {
            debug!(key = %key, "cache hit");
            return FetchOutcome::new(FetchSource::Cache, cached);
        }

        match self.fetch_upstream(key).await {
            Ok(payload) => {
                self.cache
                    .write()
                    .await
                    .set(key.as_str(), payload.clone(), None);
                FetchOutcome::new(FetchSource::Upstream, payload)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "upstream fetch failed");
                self.fallback_for(key.path())
            }
        }
    }

    async fn fetch_upstream(&self, key: &CacheKey) -> Result<Value, UpstreamError> {
        let payload = self.upstream.get_json(key.path(), key.query()).await?;

        if is_success_payload(&payload) {
            Ok(payload)
        } else {
            let reason = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("payload does not report success")
                .to_string();
            Err(UpstreamError::Logical(reason))
        }
    }

    fn fallback_for(&self, path: &str) -> FetchOutcome {
        match self.fallbacks.for_path(path) {
            Some(body) => FetchOutcome::new(FetchSource::Fallback, body),
            None => FetchOutcome::new(FetchSource::Unavailable, unavailable_payload()),
        }
    }
}

/// A payload counts as successful only when it carries `"success": true`.
pub fn is_success_payload(payload: &Value) -> bool {
    payload.get("success").and_then(Value::as_bool) == Some(true)
}
