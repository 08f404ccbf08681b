//! API Module
//!
//! HTTP handlers and routing for the proxy server.
//!
//! # Endpoints
//! - `GET /api/*path` - Cached proxy to the HiAnime API
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Flush the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
