//! Domain layer constants
//!
//! Tier profiles, throttle parameters and tenant identifier rules.
//! Infrastructure-specific constants remain in `tgov_infrastructure::constants`.

// ============================================================================
// TENANT IDENTIFIER CONSTANTS
// ============================================================================

/// Tenant used when no tenant is in scope for a cache call
pub const GLOBAL_TENANT_ID: &str = "global";

/// Maximum length of a tenant identifier
pub const TENANT_ID_MAX_LENGTH: usize = 128;

/// Key segment placed between the namespace token and the tenant identifier
pub const TENANT_KEY_SEGMENT: &str = "tenant";

/// Separator between cache key segments
pub const KEY_SEPARATOR: char = ':';

// ============================================================================
// TIER PROFILE CONSTANTS
// ============================================================================

/// FREE tier: maximum connections
pub const FREE_MAX_CONNECTIONS: u32 = 10;
/// FREE tier: maximum memory in MB
pub const FREE_MAX_MEMORY_MB: u64 = 512;
/// FREE tier: maximum storage in MB
pub const FREE_MAX_STORAGE_MB: u64 = 1024;
/// FREE tier: maximum requests per minute
pub const FREE_MAX_REQUESTS_PER_MINUTE: u32 = 100;
/// FREE tier: maximum concurrent sessions
pub const FREE_MAX_CONCURRENT_SESSIONS: u32 = 5;
/// FREE tier: maximum API calls per day
pub const FREE_MAX_API_CALLS_PER_DAY: u64 = 1_000;
/// FREE tier: cache quota in MB
pub const FREE_CACHE_QUOTA_MB: u64 = 50;
/// FREE tier: query timeout in seconds
pub const FREE_QUERY_TIMEOUT_SECS: u64 = 30;

/// PROFESSIONAL tier: maximum connections
pub const PROFESSIONAL_MAX_CONNECTIONS: u32 = 50;
/// PROFESSIONAL tier: maximum memory in MB
pub const PROFESSIONAL_MAX_MEMORY_MB: u64 = 2048;
/// PROFESSIONAL tier: maximum storage in MB
pub const PROFESSIONAL_MAX_STORAGE_MB: u64 = 10_240;
/// PROFESSIONAL tier: maximum requests per minute
pub const PROFESSIONAL_MAX_REQUESTS_PER_MINUTE: u32 = 1_000;
/// PROFESSIONAL tier: maximum concurrent sessions
pub const PROFESSIONAL_MAX_CONCURRENT_SESSIONS: u32 = 50;
/// PROFESSIONAL tier: maximum API calls per day
pub const PROFESSIONAL_MAX_API_CALLS_PER_DAY: u64 = 50_000;
/// PROFESSIONAL tier: cache quota in MB
pub const PROFESSIONAL_CACHE_QUOTA_MB: u64 = 256;
/// PROFESSIONAL tier: query timeout in seconds
pub const PROFESSIONAL_QUERY_TIMEOUT_SECS: u64 = 60;

/// ENTERPRISE tier: maximum connections
pub const ENTERPRISE_MAX_CONNECTIONS: u32 = 100;
/// ENTERPRISE tier: maximum memory in MB
pub const ENTERPRISE_MAX_MEMORY_MB: u64 = 8192;
/// ENTERPRISE tier: maximum storage in MB
pub const ENTERPRISE_MAX_STORAGE_MB: u64 = 102_400;
/// ENTERPRISE tier: maximum requests per minute
pub const ENTERPRISE_MAX_REQUESTS_PER_MINUTE: u32 = 10_000;
/// ENTERPRISE tier: maximum concurrent sessions
pub const ENTERPRISE_MAX_CONCURRENT_SESSIONS: u32 = 500;
/// ENTERPRISE tier: maximum API calls per day
pub const ENTERPRISE_MAX_API_CALLS_PER_DAY: u64 = 1_000_000;
/// ENTERPRISE tier: cache quota in MB
pub const ENTERPRISE_CACHE_QUOTA_MB: u64 = 1024;
/// ENTERPRISE tier: query timeout in seconds
pub const ENTERPRISE_QUERY_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// THROTTLING CONSTANTS
// ============================================================================

/// Usage ratio above which a dimension is penalized and flagged as a warning
pub const USAGE_WARNING_RATIO: f64 = 0.8;

/// Delay imposed by a high-severity throttle policy
pub const THROTTLE_HIGH_DELAY_MS: u64 = 1_000;

/// Share of requests rejected under a high-severity throttle policy
pub const THROTTLE_HIGH_REJECTION_RATE: f64 = 0.5;

/// Delay imposed by a medium-severity throttle policy
pub const THROTTLE_MEDIUM_DELAY_MS: u64 = 500;

/// Share of requests rejected under a medium-severity throttle policy
pub const THROTTLE_MEDIUM_REJECTION_RATE: f64 = 0.2;

/// Tenant-scoped cache key under which the active throttle policy is stored
pub const THROTTLE_POLICY_KEY: &str = "throttle_policy";

/// Best possible performance score
pub const PERFORMANCE_SCORE_MAX: f64 = 100.0;
