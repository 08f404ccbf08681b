//! AniLab Proxy - A caching proxy for the HiAnime API
//!
//! Serves `/api/*` from an in-memory response cache in front of the
//! upstream API, plus static assets.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anilab_proxy::api::create_router;
use anilab_proxy::upstream::HiAnimeClient;
use anilab_proxy::{AppState, BackgroundTasks, Config};

/// Main entry point for the proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the upstream client and the shared cache
/// 4. Start the sweep and stats tasks
/// 5. Serve HTTP until SIGINT/SIGTERM, then stop the tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anilab_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AniLab proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}s, cache_max_keys={}, port={}, sweep_interval={}s, upstream={}",
        config.cache_ttl,
        config.cache_max_keys,
        config.server_port,
        config.sweep_interval,
        config.upstream_base_url
    );

    let upstream = HiAnimeClient::new(&config.upstream_base_url, config.upstream_timeout())
        .context("failed to build upstream client")?;

    let state = AppState::from_config(&config, Arc::new(upstream));
    let tasks = BackgroundTasks::start(
        &state.cache,
        config.sweep_interval(),
        config.stats_interval(),
    );
    info!("Cache and background tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tasks.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
