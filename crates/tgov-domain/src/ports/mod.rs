//! Domain Port Interfaces
//!
//! Defines all boundary contracts between domain and external layers.
//!
//! ## Architecture
//!
//! Ports define the contracts that external layers must implement.
//! This follows the Dependency Inversion Principle:
//! - High-level modules (domain) define interfaces
//! - Low-level modules (providers, infrastructure) implement them
//!
//! ## Organization
//!
//! - **infrastructure/** - In-process services (usage sampling)
//! - **providers/** - External service provider ports (distributed cache)

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

pub use infrastructure::UsageSampler;
pub use providers::{DistributedCacheConnector, DistributedCacheProvider};
