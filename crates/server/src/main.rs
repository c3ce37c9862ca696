mod addresses;
mod api;
mod bootstrap;
mod customers;
mod error;
mod health;

use std::time::Duration;

use anyhow::{Context, Result};
use rolodex_core::config::{AppConfig, LoadOptions};
use rolodex_db::DbPool;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use rolodex_core::config::LogFormat::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging has to exist before bootstrap so its events are not lost.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = app.config.server.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let router = app.router();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "rolodex-server listening"
    );
    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "rolodex-server stopping"
    );

    let _ = shutdown_tx.send(());
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    drain_within(grace, server, &app.db_pool).await?;
    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "rolodex-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

/// Waits up to `grace` for the server task, then for the pool to close.
///
/// A server still running when the grace period ends is aborted, and a pool
/// still holding checked-out connections is abandoned, so shutdown never
/// outlives twice the grace period. Returns whether both finished in time.
async fn drain_within(
    grace: Duration,
    mut server: JoinHandle<std::io::Result<()>>,
    db_pool: &DbPool,
) -> Result<bool> {
    let mut clean = true;

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => joined.context("server task panicked")??,
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "in-flight requests did not finish before the grace period elapsed; aborting"
            );
            server.abort();
            clean = false;
        }
    }

    if tokio::time::timeout(grace, db_pool.close()).await.is_err() {
        tracing::warn!(
            event_name = "system.server.pool_close_timeout",
            correlation_id = "shutdown",
            grace_secs = grace.as_secs(),
            "database connections still checked out; leaving pool to process exit"
        );
        clean = false;
    }

    Ok(clean)
}
