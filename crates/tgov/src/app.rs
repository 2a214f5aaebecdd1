//! Command entry points
//!
//! `run` drives the full lifecycle: configuration, logging, runtime start,
//! Ctrl-C, ordered shutdown. `render_config` prints the effective
//! configuration.

use std::path::Path;
use tgov_domain::error::Result;
use tgov_infrastructure::ErrorContext;
use tgov_infrastructure::GovernanceRuntime;
use tgov_infrastructure::config::{AppConfig, ConfigLoader, loader::render_toml};
use tgov_infrastructure::logging::init_logging;
use tracing::{info, warn};

/// Load configuration from `config_path`, or from the default locations
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}

/// Effective configuration rendered as TOML
pub fn render_config(config_path: Option<&Path>) -> Result<String> {
    render_toml(&load_config(config_path)?)
}

/// Run the governance core until Ctrl-C
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    init_logging(config.logging.clone())?;

    let runtime = GovernanceRuntime::build(config).await?;
    runtime.start();
    let health = runtime.health().await;
    info!(status = ?health.status, "Governance core running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .io_context("Failed to listen for Ctrl-C")?;
    info!("Shutdown requested");

    if !runtime.shutdown().await {
        warn!("Some background tasks did not stop before the shutdown timeout");
    }
    Ok(())
}
