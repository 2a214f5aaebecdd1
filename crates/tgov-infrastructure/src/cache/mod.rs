//! Tenant-aware two-tier caching
//!
//! A bounded process-local tier in front of an optional distributed tier,
//! with per-tenant key namespaces and dedicated connections.

pub mod engine;
pub mod factory;
pub mod key;
pub mod local;

pub use engine::CacheEngine;
pub use factory::{CacheProviderFactory, build_cache_engine};
pub use key::{qualified_key, resolve_tenant, tenant_prefix};
pub use local::{CacheEntry, InsertOutcome, LocalLookup, LocalStats, LocalTier};
