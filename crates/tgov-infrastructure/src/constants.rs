//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `tgov_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "tgov.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "tgov";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "TGOV";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "TGOV_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum number of rotated log files to keep
pub const LOG_MAX_FILES: usize = 7;

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default namespace token prefixed to every cache key
pub const CACHE_DEFAULT_NAMESPACE: &str = "tgov";

/// Default cache TTL in seconds (1 hour)
pub const CACHE_DEFAULT_TTL_SECS: u64 = 3600;

/// Default capacity of the local tier
pub const CACHE_DEFAULT_MAX_LOCAL_ITEMS: usize = 10_000;

/// Interval between sweeps of expired local entries
pub const CACHE_EXPIRY_SWEEP_INTERVAL_SECS: u64 = 300;

/// Interval between cache metrics refreshes and distributed-tier probes
pub const CACHE_METRICS_INTERVAL_SECS: u64 = 60;

/// Per-operation timeout for distributed-tier calls
pub const CACHE_OPERATION_TIMEOUT_MS: u64 = 500;

/// Share of the local tier evicted at once is `1 / CACHE_EVICTION_DIVISOR`
pub const CACHE_EVICTION_DIVISOR: usize = 10;

/// Default entry capacity of the Moka distributed stand-in
pub const CACHE_MOKA_MAX_CAPACITY: u64 = 100_000;

/// Local tier utilisation above which health reports degraded
pub const CACHE_LOCAL_UTILISATION_DEGRADED: f64 = 0.95;

// ============================================================================
// GOVERNOR CONSTANTS
// ============================================================================

/// Interval between monitoring cycles
pub const GOVERNOR_MONITORING_INTERVAL_SECS: u64 = 30;

/// Interval between inactivity sweeps
pub const GOVERNOR_INACTIVITY_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Inactivity after which a tenant's runtime state is reclaimed
pub const GOVERNOR_INACTIVITY_WINDOW_SECS: u64 = 86_400;

/// TTL of a written throttle policy
pub const GOVERNOR_THROTTLE_POLICY_TTL_SECS: u64 = 300;

/// Window used for the "active in the last 24h" status count
pub const GOVERNOR_ACTIVE_WINDOW_SECS: i64 = 86_400;

// ============================================================================
// USAGE RECORDING CONSTANTS
// ============================================================================

/// Sliding window for the requests-per-minute counter
pub const USAGE_REQUEST_WINDOW_SECS: u64 = 60;

/// Width of one request-counter bucket inside the window
pub const USAGE_REQUEST_BUCKET_MS: u64 = 1000;

// ============================================================================
// SHUTDOWN CONSTANTS
// ============================================================================

/// Time background loops get to stop before shutdown proceeds
pub const GRACEFUL_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
