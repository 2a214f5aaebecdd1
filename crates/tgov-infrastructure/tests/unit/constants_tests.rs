//! Tests for infrastructure constants
//!
//! Validates that infrastructure constants have reasonable values
//! and maintain expected relationships.
#![allow(clippy::assertions_on_constants)]

use tgov_domain::constants::KEY_SEPARATOR;
use tgov_infrastructure::constants::*;

#[test]
fn test_cache_constants_reasonable() {
    assert!(CACHE_DEFAULT_TTL_SECS > 0);
    assert!(CACHE_DEFAULT_MAX_LOCAL_ITEMS >= CACHE_EVICTION_DIVISOR);
    assert!(CACHE_EVICTION_DIVISOR > 1, "Eviction must keep most entries");
    assert!(CACHE_OPERATION_TIMEOUT_MS >= 50, "Operation timeout too short");
    assert!(CACHE_OPERATION_TIMEOUT_MS <= 5_000, "Operation timeout too long");
    assert!(CACHE_LOCAL_UTILISATION_DEGRADED > 0.0 && CACHE_LOCAL_UTILISATION_DEGRADED <= 1.0);
    assert!(!CACHE_DEFAULT_NAMESPACE.contains(KEY_SEPARATOR));
}

#[test]
fn test_governor_interval_relationships() {
    assert!(
        GOVERNOR_MONITORING_INTERVAL_SECS < GOVERNOR_INACTIVITY_SWEEP_INTERVAL_SECS,
        "Monitoring should run more often than the inactivity sweep"
    );
    assert!(
        GOVERNOR_INACTIVITY_SWEEP_INTERVAL_SECS <= GOVERNOR_INACTIVITY_WINDOW_SECS,
        "Sweep should run at least once per inactivity window"
    );
    assert!(
        GOVERNOR_THROTTLE_POLICY_TTL_SECS > GOVERNOR_MONITORING_INTERVAL_SECS,
        "Throttle policies should outlive one monitoring cycle"
    );
    assert_eq!(USAGE_REQUEST_WINDOW_SECS, 60);
}

#[test]
fn test_config_constants() {
    assert!(DEFAULT_CONFIG_FILENAME.ends_with(".toml"));
    assert_eq!(CONFIG_ENV_SEPARATOR, "__");
    assert!(LOG_ENV_VAR.starts_with(CONFIG_ENV_PREFIX));
    assert!(LOG_MAX_FILES > 0);
    assert!(GRACEFUL_SHUTDOWN_TIMEOUT_SECS > 0);
}
