//! # tgov
//!
//! Tenant-aware resource governance core: a two-tier cache engine and a
//! tenant resource governor.
//!
//! ## Features
//!
//! - **Tenant-isolated caching**: every key is namespaced per tenant
//! - **Two tiers**: bounded local tier in front of Redis or Moka
//! - **Graceful degradation**: an unreachable distributed tier falls back to local-only
//! - **Tier-based governance**: FREE/PROFESSIONAL/ENTERPRISE limits and throttling
//!
//! ## Example
//!
//! ```ignore
//! use tgov::domain::{CacheOptions, ServiceTier, TenantId};
//! use tgov::infrastructure::{config::AppConfig, GovernanceRuntime};
//!
//! let runtime = GovernanceRuntime::build(AppConfig::default()).await?;
//! runtime.governor().create_tenant("acme", ServiceTier::Free, None).await;
//!
//! let acme = TenantId::parse("acme")?;
//! let cache = runtime.cache();
//! cache.set("profile", "alice", CacheOptions::for_tenant(&acme)).await;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Value objects, ports and the domain error
//! - `infrastructure` - Cache engine, governor, config, logging, runtime
//! - `providers` - Distributed cache adapters

/// Domain layer - value objects, ports and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use tgov_domain::*;
}

/// Infrastructure layer - cache engine, governor and runtime
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use tgov_infrastructure::*;
}

/// Distributed cache adapters
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use tgov_providers::*;
}

/// Command entry points shared by the binary
pub mod app;

pub use tgov_domain::{Error, Result};
pub use tgov_infrastructure::GovernanceRuntime;
