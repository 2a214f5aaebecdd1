//! Infrastructure Service Ports
//!
//! Ports implemented by in-process infrastructure services.

/// Usage sampler port
pub mod usage;

pub use usage::UsageSampler;
