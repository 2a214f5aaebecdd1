//! Tenant governance
//!
//! Task-scoped tenant resolution, in-process usage recording and the
//! resource governor that turns usage into throttle policies.

pub mod context;
pub mod governor;
pub mod usage;

pub use context::TenantContext;
pub use governor::{MonitoringReport, TenantResourceGovernor};
pub use usage::UsageRecorder;
