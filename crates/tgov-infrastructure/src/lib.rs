//! # Tenant Governance - Infrastructure Layer
//!
//! The runtime half of the governance core: the two-tier cache engine, the
//! tenant resource governor, and the cross-cutting concerns around them.
//!
//! ## Module Categories
//!
//! ### Caching
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Tenant-aware local + distributed cache engine |
//!
//! ### Tenant Governance
//! | Module | Description |
//! |--------|-------------|
//! | [`tenant`] | Tenant context, usage recording, resource governor |
//! | [`runtime`] | Component wiring and background loops |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based TOML + environment configuration |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability & Lifecycle
//! | Module | Description |
//! |--------|-------------|
//! | [`health`] | Health checks for cache tiers and governor |
//! | [`logging`] | Structured logging with tracing |
//! | [`shutdown`] | Cancellation and tracked background tasks |

pub mod cache;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod health;
pub mod logging;
pub mod runtime;
pub mod shutdown;
pub mod tenant;

pub use cache::CacheEngine;
pub use error_ext::ErrorContext;
pub use runtime::GovernanceRuntime;
pub use tenant::{TenantContext, TenantResourceGovernor, UsageRecorder};
