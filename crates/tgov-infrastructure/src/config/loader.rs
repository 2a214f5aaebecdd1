//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::AppConfig;
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};
use tgov_domain::constants::KEY_SEPARATOR;
use tgov_domain::error::{Error, Result};
use tgov_domain::value_objects::TenantId;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `TGOV__CACHE__NAMESPACE`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Double underscore separates nested keys (e.g., TGOV__GOVERNOR__WARNING_RATIO)
        figment = figment.merge(
            Env::prefixed(&format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR))
                .split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = render_toml(config)?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = vec![
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Render configuration as pretty TOML
pub fn render_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(config)?;
    validate_cache_config(config)?;
    validate_governor_config(config)?;
    if config.shutdown_timeout_secs == 0 {
        return Err(Error::configuration("Shutdown timeout cannot be 0"));
    }
    Ok(())
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    let cache = &config.cache;
    if cache.namespace.is_empty() {
        return Err(Error::configuration("Cache namespace cannot be empty"));
    }
    if cache.namespace.contains(KEY_SEPARATOR) {
        return Err(Error::configuration(format!(
            "Cache namespace cannot contain '{}'",
            KEY_SEPARATOR
        )));
    }
    if cache.enabled && cache.default_ttl_secs == 0 {
        return Err(Error::configuration(
            "Cache TTL cannot be 0 when cache is enabled",
        ));
    }
    if cache.expiry_sweep_interval_secs == 0 {
        return Err(Error::configuration("Cache expiry sweep interval cannot be 0"));
    }
    if cache.metrics_interval_secs == 0 {
        return Err(Error::configuration("Cache metrics interval cannot be 0"));
    }
    if cache.operation_timeout_ms == 0 {
        return Err(Error::configuration("Cache operation timeout cannot be 0"));
    }
    for (tenant, ttl) in &cache.tenant_ttl_overrides {
        TenantId::parse(tenant).map_err(|e| {
            Error::configuration(format!("Invalid tenant in cache TTL overrides: {}", e))
        })?;
        if *ttl == 0 {
            return Err(Error::configuration(format!(
                "Cache TTL override for tenant {} cannot be 0",
                tenant
            )));
        }
    }
    if cache.distributed.provider == crate::config::DistributedProvider::Redis
        && cache
            .distributed
            .redis_url
            .as_deref()
            .is_none_or(str::is_empty)
    {
        return Err(Error::configuration(
            "Redis URL is required when the distributed provider is redis",
        ));
    }
    Ok(())
}

fn validate_governor_config(config: &AppConfig) -> Result<()> {
    let governor = &config.governor;
    if governor.monitoring_interval_secs == 0 {
        return Err(Error::configuration("Governor monitoring interval cannot be 0"));
    }
    if governor.inactivity_sweep_interval_secs == 0 {
        return Err(Error::configuration(
            "Governor inactivity sweep interval cannot be 0",
        ));
    }
    if governor.inactivity_window_secs == 0 {
        return Err(Error::configuration("Governor inactivity window cannot be 0"));
    }
    if governor.throttle_policy_ttl_secs == 0 {
        return Err(Error::configuration("Throttle policy TTL cannot be 0"));
    }
    if !(governor.warning_ratio > 0.0 && governor.warning_ratio <= 1.0) {
        return Err(Error::configuration(
            "Governor warning ratio must be within (0, 1]",
        ));
    }
    for (name, params) in [
        ("high", &governor.high_throttle),
        ("medium", &governor.medium_throttle),
    ] {
        if !(0.0..=1.0).contains(&params.rejection_rate) {
            return Err(Error::configuration(format!(
                "{} throttle rejection rate must be within [0, 1]",
                name
            )));
        }
    }
    Ok(())
}
