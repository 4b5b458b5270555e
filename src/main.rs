// HTTP server for the screener harvester
//
// Serves the job API (start / status / download), the synchronous scrape
// endpoint and a health check.

use anyhow::{Context, Result};
use kodegen_tools_screener::utils::DEFAULT_PORT;
use kodegen_tools_screener::{ChromiumLauncher, ScrapeConfig, ScrapeService, router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chromiumoxide=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = ScrapeConfig::from_env().context("Invalid SCREENER_* configuration")?;
    let port = match std::env::var("PORT") {
        Ok(value) => value
            .parse::<u16>()
            .with_context(|| format!("Invalid PORT: {value}"))?,
        Err(_) => DEFAULT_PORT,
    };

    tracing::info!(
        total_items = config.total_items(),
        page_size = config.page_size(),
        concurrency = config.concurrency(),
        "Starting screener harvester"
    );

    let launcher = ChromiumLauncher::from_config(&config);
    let service = Arc::new(ScrapeService::new(config, launcher));
    service.start_cleanup_task();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, router(Arc::clone(&service)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    service.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
