//! hcache server binary
//!
//! Loads configuration from the environment, builds the cache engine once and
//! serves it over HTTP until SIGINT/SIGTERM.

use anyhow::Context;
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hcache::{create_router, spawn_sweep_task, AppState, Config};

/// Main entry point for the hcache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build the cache engine
/// 4. Start the background expiration sweep, if enabled
/// 5. Bind the listener and serve until a shutdown signal
///
/// Any startup failure is returned from `main`, which exits non-zero.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hcache server");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: max_entries={}, default_ttl={:?}, policy={}, listen_addr={}, sweep_interval={:?}",
        config.cache.max_entries,
        config.cache.default_ttl,
        config.cache.policy,
        config.listen_addr,
        config.sweep_interval
    );

    let state = AppState::from_config(&config).context("failed to build cache engine")?;
    info!("Cache engine initialized");

    let sweep_handle = config
        .sweep_interval
        .map(|interval| spawn_sweep_task(state.cache.clone(), interval));

    let app = create_router(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(sweep_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
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

    if let Some(handle) = sweep_handle {
        handle.abort();
        info!("Expiration sweep task stopped");
    }
}
