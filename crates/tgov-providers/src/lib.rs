//! # Tenant Governance - Provider Implementations
//!
//! Distributed-tier adapters. Each provider implements a port defined in
//! `tgov-domain`.
//!
//! | Port | Implementations |
//! |------|-----------------|
//! | `DistributedCacheProvider` | Moka, Redis, Null |
//! | `DistributedCacheConnector` | Moka, Redis |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! tgov-providers = { version = "0.1", default-features = false, features = ["cache-moka"] }
//! ```

pub use tgov_domain::error::{Error, Result};
pub use tgov_domain::ports::providers::{DistributedCacheConnector, DistributedCacheProvider};

/// Provider-specific constants
pub mod constants;

/// Distributed cache provider implementations
pub mod cache;
