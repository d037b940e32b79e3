mod commands;
mod config;
mod dispatch;
mod messages;
mod platform;
mod webapp;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the subscriber so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,webapp_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenv {
        Ok(path) => info!("Loaded environment from: {}", path.display()),
        Err(e) if e.not_found() => info!("No .env file found, using process environment"),
        Err(e) => warn!("Failed to read .env file: {}", e),
    }

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Configuration loaded successfully");
    info!("  Bot token: set");
    info!("  WebApp URL: {}", config.webapp_url);
    info!("  Dev mode: {}", config.dev_mode);
    if config.has_placeholder_url() {
        warn!("WEBAPP_URL still points at the deployment placeholder; update it after deploying the web app");
    }

    info!("Bot is starting...");
    platform::telegram::run(Arc::new(config)).await?;

    Ok(())
}
