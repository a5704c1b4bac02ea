use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use watch_scrape::api::{self, AppState};
use watch_scrape::config::{Config, LoggingConfig, API_KEY_ENV};
use watch_scrape::scrapers::{ScrapeService, ScrapingBeeFetcher};
use watch_scrape::utils::http::create_client;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging)?;

    info!("Starting Watch Scrape");

    if !config.api_key_configured() {
        warn!("{} is not set; scrape requests will fail until it is configured", API_KEY_ENV);
    }

    // One pooled client shared by every request
    let client = create_client(&config.http)?;
    let fetcher = ScrapingBeeFetcher::new(client, config.provider.clone());
    let state = AppState::new(ScrapeService::new(Arc::new(fetcher)));

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Watch Scrape stopped");
    Ok(())
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("watch_scrape=info".parse()?);

    if config.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
