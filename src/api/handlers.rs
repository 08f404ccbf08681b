//! API Handlers
//!
//! HTTP request handlers for the proxy route and the cache management
//! endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::{CacheStore, SharedCache};
use crate::config::Config;
use crate::error::Result;
use crate::models::{FlushResponse, HealthResponse, StatsResponse};
use crate::proxy::{group_pairs, CacheKey, FallbackRegistry, FetchSource, ProxyFetcher};
use crate::upstream::Upstream;

/// Name of the header reporting how a proxied response was produced.
pub const X_CACHE: &str = "x-cache";

/// Mount point of the proxy route.
pub const API_PREFIX: &str = "/api";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide response cache
    pub cache: SharedCache,
    /// Fetcher bound to `cache`
    pub fetcher: Arc<ProxyFetcher>,
    /// `max-age` advertised on live proxied responses, in seconds
    pub max_age: u64,
    /// Directory served for paths no route matches
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Creates state around `cache` with the built-in fallbacks.
    pub fn new(cache: CacheStore, upstream: Arc<dyn Upstream>) -> Self {
        Self::with_fallbacks(cache, upstream, FallbackRegistry::with_defaults())
    }

    pub fn with_fallbacks(
        cache: CacheStore,
        upstream: Arc<dyn Upstream>,
        fallbacks: FallbackRegistry,
    ) -> Self {
        let max_age = cache.default_ttl().as_secs();
        let cache = cache.into_shared();
        let fetcher = Arc::new(ProxyFetcher::new(cache.clone(), upstream, fallbacks));

        Self {
            cache,
            fetcher,
            max_age,
            static_dir: None,
        }
    }

    /// Creates state from configuration.
    pub fn from_config(config: &Config, upstream: Arc<dyn Upstream>) -> Self {
        let cache = CacheStore::new(config.cache_max_keys, config.cache_ttl());
        Self::new(cache, upstream).with_static_dir(&config.static_dir)
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

/// Handler for GET /api/*path
///
/// Proxies the request through the cache. The body is the upstream payload,
/// a fallback, or `{success: false, message}` with status 502. A request
/// that cannot be keyed is rejected with 400 before reaching the fetcher.
///
/// The path is keyed and forwarded still percent-encoded, and every query
/// pair is kept, repeated names included.
pub async fn proxy_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response> {
    let path = upstream_path(uri.path());
    let key = CacheKey::derive(&path, &group_pairs(query))?;

    let outcome = state.fetcher.fetch_key(&key).await;

    let status = match outcome.source {
        FetchSource::Unavailable => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };

    let mut response = (status, Json(outcome.body)).into_response();
    let headers = response.headers_mut();
    headers.insert(X_CACHE, HeaderValue::from_static(outcome.source.as_header()));

    if matches!(outcome.source, FetchSource::Cache | FetchSource::Upstream) {
        if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", state.max_age)) {
            headers.insert(header::CACHE_CONTROL, value);
        }
    }

    Ok(response)
}

/// Raw request path with the `/api` mount point stripped.
fn upstream_path(request_path: &str) -> String {
    let rest = request_path
        .strip_prefix(API_PREFIX)
        .unwrap_or(request_path);
    format!("/{}", rest.trim_start_matches('/'))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for DELETE /cache
///
/// Drops every cached response and resets the counters.
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    let mut cache = state.cache.write().await;
    let cleared = cache.len();
    cache.flush();
    info!(cleared, "cache flushed");

    Json(FlushResponse::new(cleared))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use async_trait::async_trait;
    use axum::http::Uri;
    use serde_json::{json, Value};
    use std::time::Duration;

    struct EchoUpstream;

    #[async_trait]
    impl Upstream for EchoUpstream {
        async fn get_json(
            &self,
            path: &str,
            query: &[(String, String)],
        ) -> std::result::Result<Value, UpstreamError> {
            Ok(json!({"success": true, "data": {"path": path, "params": query.len()}}))
        }
    }

    fn state() -> AppState {
        AppState::new(
            CacheStore::new(100, Duration::from_secs(300)),
            Arc::new(EchoUpstream),
        )
    }

    fn pairs(items: &[(&str, &str)]) -> Query<Vec<(String, String)>> {
        Query(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_upstream_path() {
        assert_eq!(upstream_path("/api/anime/1"), "/anime/1");
        assert_eq!(upstream_path("/api//home"), "/home");
        assert_eq!(upstream_path("/api/anime/a%2Fb"), "/anime/a%2Fb");
        assert_eq!(upstream_path("/home"), "/home");
    }

    #[tokio::test]
    async fn test_proxy_handler_keys_path_and_query() {
        let state = state();

        let response = proxy_handler(
            State(state.clone()),
            OriginalUri(Uri::from_static("/api/anime/1?page=2")),
            pairs(&[("page", "2")]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_CACHE], "MISS");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=300");
        assert!(state.cache.read().await.has(r#"/anime/1{"page":"2"}"#));
    }

    #[tokio::test]
    async fn test_proxy_handler_keeps_repeated_params() {
        let state = state();

        proxy_handler(
            State(state.clone()),
            OriginalUri(Uri::from_static("/api/filter?genres=action&genres=comedy")),
            pairs(&[("genres", "action"), ("genres", "comedy")]),
        )
        .await
        .unwrap();

        assert!(state
            .cache
            .read()
            .await
            .has(r#"/filter{"genres":["action","comedy"]}"#));
    }

    #[tokio::test]
    async fn test_proxy_handler_rejects_unnamed_param() {
        let result = proxy_handler(
            State(state()),
            OriginalUri(Uri::from_static("/api/filter?=x")),
            pairs(&[("", "x")]),
        )
        .await;
        assert!(matches!(
            result,
            Err(crate::error::ProxyError::InvalidQueryParam { .. })
        ));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.hit_rate, 0.0);
    }

    #[tokio::test]
    async fn test_flush_handler() {
        let state = state();
        state.cache.write().await.set("k", json!(1), None);

        let response = flush_handler(State(state.clone())).await;
        assert_eq!(response.cleared, 1);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            cache_max_keys: 5,
            cache_ttl: 42,
            ..Config::default()
        };
        let state = AppState::from_config(&config, Arc::new(EchoUpstream));

        assert_eq!(state.max_age, 42);
        assert_eq!(state.static_dir, Some(PathBuf::from("public")));
    }
}
