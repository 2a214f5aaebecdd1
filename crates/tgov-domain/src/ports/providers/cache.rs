//! Distributed Cache Provider Port
//!
//! Port for the distributed cache tier. The tier is an opaque key/value
//! service with TTL support that may be absent or unavailable at any time.
//!
//! ## Implementations
//!
//! - **Redis**: shared service for multi-instance deployments
//! - **Moka**: in-process stand-in for single-instance deployments and tests
//! - **Null**: no-op provider

use crate::error::Result;
use crate::value_objects::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Distributed Cache Provider Port
///
/// Values are the serialized envelope strings produced by the cache engine.
/// Keys are fully qualified; the provider never interprets them beyond
/// prefix matching in [`delete_by_prefix`](Self::delete_by_prefix).
///
/// # Example
///
/// ```ignore
/// use tgov_domain::ports::providers::DistributedCacheProvider;
///
/// provider.set_with_ttl("tgov:tenant:acme:profile", &payload, Some(ttl)).await?;
/// if let Some(payload) = provider.get("tgov:tenant:acme:profile").await? {
///     // decode envelope
/// }
/// ```
#[async_trait]
pub trait DistributedCacheProvider: Send + Sync + std::fmt::Debug {
    /// Get the payload stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl` when given
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Delete `key`
    ///
    /// # Returns
    /// True if the key existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Delete every key starting with `prefix`
    ///
    /// # Returns
    /// Number of keys removed
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64>;

    /// Round-trip health check
    async fn ping(&self) -> Result<()>;

    /// Release the underlying connection
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Get the name/identifier of this provider implementation
    ///
    /// # Returns
    /// A string identifier for the provider (e.g., "moka", "redis", "null")
    fn provider_name(&self) -> &str;
}

/// Opens private distributed-tier connections for DEDICATED tenants
#[async_trait]
pub trait DistributedCacheConnector: Send + Sync + std::fmt::Debug {
    /// Open a connection reserved for `tenant`
    async fn connect_dedicated(
        &self,
        tenant: &TenantId,
    ) -> Result<Arc<dyn DistributedCacheProvider>>;
}
