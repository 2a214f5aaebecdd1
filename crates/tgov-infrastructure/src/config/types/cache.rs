//! Cache engine configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Backend of the distributed tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributedProvider {
    /// No distributed tier; the engine runs local-only
    #[default]
    None,
    /// In-process Moka instance
    Moka,
    /// Redis server
    Redis,
}

/// Distributed tier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributedCacheConfig {
    /// Backend to use
    pub provider: DistributedProvider,

    /// Redis URL for the shared connection
    pub redis_url: Option<String>,

    /// Redis URL for dedicated tenant connections, defaults to `redis_url`
    pub dedicated_redis_url: Option<String>,

    /// Entry capacity of each Moka instance
    pub moka_max_capacity: u64,
}

impl Default for DistributedCacheConfig {
    fn default() -> Self {
        Self {
            provider: DistributedProvider::None,
            redis_url: None,
            dedicated_redis_url: None,
            moka_max_capacity: CACHE_MOKA_MAX_CAPACITY,
        }
    }
}

/// Cache engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Disabled caches store nothing and always miss
    pub enabled: bool,

    /// Token prefixed to every key
    pub namespace: String,

    /// TTL applied when neither the call nor a tenant override sets one
    pub default_ttl_secs: u64,

    /// Local tier capacity; 0 disables the local tier
    pub max_local_items: usize,

    /// Per-tenant default TTL, keyed by tenant id
    pub tenant_ttl_overrides: HashMap<String, u64>,

    /// Interval between sweeps of expired local entries
    pub expiry_sweep_interval_secs: u64,

    /// Interval between metrics refreshes and distributed-tier probes
    pub metrics_interval_secs: u64,

    /// Timeout of a single distributed-tier call
    pub operation_timeout_ms: u64,

    /// Distributed tier
    pub distributed: DistributedCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: CACHE_DEFAULT_NAMESPACE.to_string(),
            default_ttl_secs: CACHE_DEFAULT_TTL_SECS,
            max_local_items: CACHE_DEFAULT_MAX_LOCAL_ITEMS,
            tenant_ttl_overrides: HashMap::new(),
            expiry_sweep_interval_secs: CACHE_EXPIRY_SWEEP_INTERVAL_SECS,
            metrics_interval_secs: CACHE_METRICS_INTERVAL_SECS,
            operation_timeout_ms: CACHE_OPERATION_TIMEOUT_MS,
            distributed: DistributedCacheConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Default TTL as a duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Distributed-tier call timeout as a duration
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Expiry sweep interval as a duration
    pub fn expiry_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_interval_secs)
    }

    /// Metrics interval as a duration
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_secs)
    }
}
