//! Main application configuration

use crate::constants::GRACEFUL_SHUTDOWN_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use super::cache::{CacheConfig, DistributedCacheConfig, DistributedProvider};
pub use super::governor::{GovernorConfig, ThrottleParams};
pub use super::logging::LoggingConfig;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Cache engine configuration
    pub cache: CacheConfig,

    /// Tenant resource governor configuration
    pub governor: GovernorConfig,

    /// Time background loops get to stop during shutdown
    pub shutdown_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            cache: CacheConfig::default(),
            governor: GovernorConfig::default(),
            shutdown_timeout_secs: GRACEFUL_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Shutdown timeout as a duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
