//! Moka in-process distributed-tier provider
//!
//! Stands in for the distributed tier in single-instance deployments and
//! tests. Entries carry their own TTL through a Moka [`Expiry`] policy.
//!
//! ## Example
//!
//! ```ignore
//! use tgov_providers::cache::MokaCacheProvider;
//!
//! let provider = MokaCacheProvider::with_capacity(10_000);
//! ```

use crate::constants::{MAX_ENTRY_TTL, MOKA_DEFAULT_MAX_CAPACITY};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tgov_domain::error::Result;
use tgov_domain::ports::providers::{DistributedCacheConnector, DistributedCacheProvider};
use tgov_domain::value_objects::TenantId;

#[derive(Debug, Clone)]
struct StoredPayload {
    payload: Arc<str>,
    ttl: Option<Duration>,
}

struct PerEntryTtl;

impl Expiry<String, StoredPayload> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredPayload,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredPayload,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Moka-based provider for the distributed tier
#[derive(Clone)]
pub struct MokaCacheProvider {
    cache: Cache<String, StoredPayload>,
    max_capacity: u64,
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaCacheProvider {
    /// Create a provider with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MOKA_DEFAULT_MAX_CAPACITY)
    }

    /// Create a provider holding at most `max_capacity` entries
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            max_capacity,
        }
    }

    /// Get the maximum capacity of the cache
    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    /// Number of resident entries after pending maintenance
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl DistributedCacheProvider for MokaCacheProvider {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .cache
            .get(key)
            .await
            .map(|stored| stored.payload.to_string()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let stored = StoredPayload {
            payload: Arc::from(value),
            ttl: ttl
                .filter(|ttl| !ttl.is_zero())
                .map(|ttl| ttl.min(MAX_ENTRY_TTL)),
        };
        self.cache.insert(key.to_string(), stored).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64> {
        let keys: Vec<Arc<String>> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();

        let mut removed = 0;
        for key in keys {
            if self.cache.remove(key.as_str()).await.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheProvider")
            .field("max_capacity", &self.max_capacity)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

/// Hands every dedicated tenant its own Moka instance
#[derive(Debug, Clone)]
pub struct MokaCacheConnector {
    max_capacity: u64,
}

impl MokaCacheConnector {
    /// Create a connector whose instances hold at most `max_capacity` entries
    pub fn new(max_capacity: u64) -> Self {
        Self { max_capacity }
    }
}

impl Default for MokaCacheConnector {
    fn default() -> Self {
        Self::new(MOKA_DEFAULT_MAX_CAPACITY)
    }
}

#[async_trait]
impl DistributedCacheConnector for MokaCacheConnector {
    async fn connect_dedicated(
        &self,
        tenant: &TenantId,
    ) -> Result<Arc<dyn DistributedCacheProvider>> {
        tracing::debug!(tenant = %tenant, "Creating dedicated moka instance");
        Ok(Arc::new(MokaCacheProvider::with_capacity(self.max_capacity)))
    }
}
