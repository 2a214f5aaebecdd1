//! Usage Sampler Port
//!
//! Defines the contract for reading per-tenant resource usage.

use crate::error::Result;
use crate::value_objects::{TenantId, UsageSample};
use async_trait::async_trait;

/// Per-tenant usage source polled by the governor every monitoring cycle
///
/// The cache-usage dimension is filled in by the governor from the cache
/// engine; samplers may leave it at zero.
#[async_trait]
pub trait UsageSampler: Send + Sync + std::fmt::Debug {
    /// Read current usage of `tenant`
    async fn sample(&self, tenant: &TenantId) -> Result<UsageSample>;

    /// Drop any state held for `tenant` after it was reclaimed
    async fn forget(&self, _tenant: &TenantId) {}

    /// Tenants the sampler holds state for
    async fn known_tenants(&self) -> Vec<TenantId> {
        Vec::new()
    }
}
