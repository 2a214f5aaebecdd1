//! Domain Value Objects
//!
//! Immutable value objects that represent concepts in the domain
//! without identity. Value objects are defined by their attributes
//! and can be compared for equality.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`TenantId`] | Validated tenant identifier |
//! | [`TenantConfig`] | Tier, isolation and limits of a tenant |
//! | [`TenantMetrics`] | Live usage counters of a tenant |
//! | [`ThrottlePolicy`] | Admission directive for a throttled tenant |
//! | [`CachedValue`] | Tagged envelope for cached payloads |
//! | [`CacheMetrics`] | Process-wide cache counters |

/// Cache-related value objects
pub mod cache;
/// Usage, violation and throttling value objects
pub mod governance;
/// Tenant configuration value objects
pub mod tenant;

pub use cache::{
    CacheLevel, CacheMetrics, CacheMetricsSnapshot, CacheOptions, CachedValue, Lifetime, Primitive,
    StoredValue, TenantCacheUsage,
};
pub use governance::{
    LimitDimension, TenantMetrics, TenantStatus, TenantsOverview, ThrottlePolicy, ThrottleState,
    UsageSample, Violation, ViolationSeverity,
};
pub use tenant::{
    IsolationLevel, LimitsUpdate, ServiceTier, TenantConfig, TenantId, TenantResourceLimits,
};
