//! Structured logging with tracing
//!
//! Configures the global subscriber: an `EnvFilter` (overridable through
//! `TGOV_LOG`), plain or JSON formatting on stdout, and an optional
//! daily-rotated log file.

use crate::constants::LOG_ENV_VAR;
use crate::error_ext::ErrorContext;
use tgov_domain::error::{Error, Result};

pub use crate::config::LoggingConfig;
use tracing::{Level, debug, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with the provided configuration
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = match config.file_output.as_ref() {
        Some(path) => Some(
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(
                    path.file_stem()
                        .and_then(|stem| stem.to_str())
                        .unwrap_or("tgov"),
                )
                .filename_suffix("log")
                .max_log_files(config.max_files)
                .build(path.parent().unwrap_or_else(|| std::path::Path::new(".")))
                .config_context(format!(
                    "Failed to open log file in {}",
                    path.display()
                ))?,
        ),
        None => None,
    };

    // Layer types differ between JSON and plain output, hence two branches
    let initialized = if config.json_format {
        let stdout = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        let registry = Registry::default().with(filter);
        if let Some(appender) = file_appender {
            let file = fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            registry.with(stdout).with(file).try_init()
        } else {
            registry.with(stdout).try_init()
        }
    } else {
        let stdout = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        let registry = Registry::default().with(filter);
        if let Some(appender) = file_appender {
            let file = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            registry.with(stdout).with(file).try_init()
        } else {
            registry.with(stdout).try_init()
        }
    };
    initialized.config_context("Failed to install global tracing subscriber")?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {}. Use trace, debug, info, warn, or error",
            level
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &std::path::Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}

/// Log health check result
pub fn log_health_check(component: &str, healthy: bool, details: Option<&str>) {
    if healthy {
        debug!(component = component, "Health check passed");
    } else {
        warn!(
            component = component,
            details = details.unwrap_or("Unknown failure"),
            "Health check not passing"
        );
    }
}
