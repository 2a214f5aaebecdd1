//! External Provider Ports
//!
//! Ports for external services the domain depends on.
//!
//! ## Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | DistributedCacheProvider | Distributed key/value tier with TTL |
//! | DistributedCacheConnector | Private connections for dedicated tenants |

/// Distributed cache provider port
pub mod cache;

pub use cache::{DistributedCacheConnector, DistributedCacheProvider};
