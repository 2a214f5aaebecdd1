//! Tenant resource governor configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tgov_domain::constants::{
    THROTTLE_HIGH_DELAY_MS, THROTTLE_HIGH_REJECTION_RATE, THROTTLE_MEDIUM_DELAY_MS,
    THROTTLE_MEDIUM_REJECTION_RATE, USAGE_WARNING_RATIO,
};

/// Delay and rejection share imposed by one throttle severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrottleParams {
    /// Delay before serving a request
    pub delay_ms: u64,
    /// Share of requests rejected, 0.0 to 1.0
    pub rejection_rate: f64,
}

/// Governor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Interval between monitoring cycles
    pub monitoring_interval_secs: u64,

    /// Interval between inactivity sweeps
    pub inactivity_sweep_interval_secs: u64,

    /// Inactivity after which a tenant's runtime state is reclaimed
    pub inactivity_window_secs: u64,

    /// TTL of a written throttle policy
    pub throttle_policy_ttl_secs: u64,

    /// Usage ratio above which a dimension counts as near its limit
    pub warning_ratio: f64,

    /// Throttle applied to FREE tenants
    pub high_throttle: ThrottleParams,

    /// Throttle applied to PROFESSIONAL tenants
    pub medium_throttle: ThrottleParams,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            monitoring_interval_secs: GOVERNOR_MONITORING_INTERVAL_SECS,
            inactivity_sweep_interval_secs: GOVERNOR_INACTIVITY_SWEEP_INTERVAL_SECS,
            inactivity_window_secs: GOVERNOR_INACTIVITY_WINDOW_SECS,
            throttle_policy_ttl_secs: GOVERNOR_THROTTLE_POLICY_TTL_SECS,
            warning_ratio: USAGE_WARNING_RATIO,
            high_throttle: ThrottleParams {
                delay_ms: THROTTLE_HIGH_DELAY_MS,
                rejection_rate: THROTTLE_HIGH_REJECTION_RATE,
            },
            medium_throttle: ThrottleParams {
                delay_ms: THROTTLE_MEDIUM_DELAY_MS,
                rejection_rate: THROTTLE_MEDIUM_REJECTION_RATE,
            },
        }
    }
}

impl GovernorConfig {
    /// Monitoring interval as a duration
    pub fn monitoring_interval(&self) -> Duration {
        Duration::from_secs(self.monitoring_interval_secs)
    }

    /// Inactivity sweep interval as a duration
    pub fn inactivity_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.inactivity_sweep_interval_secs)
    }

    /// Throttle policy TTL as a duration
    pub fn throttle_policy_ttl(&self) -> Duration {
        Duration::from_secs(self.throttle_policy_ttl_secs)
    }
}
