// =============================================================================
// Signal Desk — Main Entry Point
// =============================================================================
//
// Serves the indicator and recommendation engine over HTTP. The service holds
// no market data of its own: callers post the bar series they want scored.
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use signal_desk::api;
use signal_desk::app_state::AppState;
use signal_desk::runtime_config::{RuntimeConfig, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Signal Desk starting up");

    let config_path = PathBuf::from(
        std::env::var("SIGNAL_DESK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into()),
    );

    let config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    let problems = config.problems();
    let config = if problems.is_empty() {
        config
    } else {
        warn!(problems = ?problems, "Config is inconsistent, using defaults");
        RuntimeConfig::default()
    };

    info!(
        input_policy = %config.input_policy,
        max_bars = config.max_bars,
        min_bars = config.signal_params.min_bars,
        "Engine configured"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config, Some(config_path.clone())));

    // ── 3. Start the API server ──────────────────────────────────────────
    let bind_addr =
        std::env::var("SIGNAL_DESK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, api::router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    if let Err(e) = state.config().save(&config_path) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!(
        requests_served = state.requests_served(),
        "Signal Desk shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
