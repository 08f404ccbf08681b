//! API Routes
//!
//! Configures the Axum router with the proxy and cache management endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{flush_handler, health_handler, proxy_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/*path` - Proxy to the upstream API through the cache
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache` - Flush the cache
/// - `GET /health` - Health check endpoint
///
/// Unmatched paths are served from `state.static_dir` when one is set.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.static_dir.clone();

    let router = Router::new()
        .route("/api/*path", get(proxy_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(flush_handler))
        .route("/health", get(health_handler));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
