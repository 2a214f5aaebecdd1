//! Provider Constants
//!
//! Constants specific to provider implementations. These are separated from
//! domain constants (which live in tgov-domain) and infrastructure constants.

use std::time::Duration;

// ============================================================================
// CACHE PROVIDER CONSTANTS
// ============================================================================

/// Longest TTL handed to a backend; longer requests are clamped
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Default Redis URL
pub const REDIS_DEFAULT_URL: &str = "redis://localhost:6379";

/// Keys requested per SCAN round trip during prefix deletion
pub const REDIS_SCAN_BATCH_SIZE: usize = 500;

/// Default entry capacity of the in-process distributed stand-in
pub const MOKA_DEFAULT_MAX_CAPACITY: u64 = 100_000;
