//! # Tenant Governance - Domain Layer
//!
//! Core types and contracts of the tenant-aware resource governance core.
//! This crate has no runtime or I/O dependencies; the cache engine and the
//! tenant resource governor live in `tgov-infrastructure`, distributed-tier
//! adapters in `tgov-providers`.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value_objects`] | Tenant model, cache envelope, metrics, throttle policy |
//! | [`ports`] | `DistributedCacheProvider`, `DistributedCacheConnector`, `UsageSampler` |
//! | [`constants`] | Tier profiles and throttle parameters |
//! | [`error`] | Domain error type |

/// Domain layer constants
pub mod constants;
/// Error handling types
pub mod error;
/// Boundary contracts
pub mod ports;
/// Value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::*;
