//! Health checks
//!
//! A registry of [`HealthChecker`]s aggregated into one [`HealthResponse`],
//! plus built-in checkers for the cache tiers and the governor.

use crate::logging::log_health_check;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Fully operational
    Up,
    /// Operational with reduced capability
    Degraded,
    /// Not operational
    Down,
}

impl HealthStatus {
    /// Check if the status indicates the service is healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Check if the service is operational (healthy or degraded)
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Up | Self::Degraded)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Name of the health check
    pub name: String,
    /// Current status
    pub status: HealthStatus,
    /// Timestamp of last check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Why the check is not up
    pub error: Option<String>,
    /// Additional details
    pub details: Option<serde_json::Value>,
}

impl HealthCheck {
    fn with_status<S: Into<String>>(name: S, status: HealthStatus, error: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            timestamp: chrono::Utc::now(),
            response_time_ms: 0,
            error,
            details: None,
        }
    }

    /// Create a successful health check
    pub fn healthy<S: Into<String>>(name: S) -> Self {
        Self::with_status(name, HealthStatus::Up, None)
    }

    /// Create a failed health check
    pub fn failed<S: Into<String>>(name: S, error: Option<String>) -> Self {
        Self::with_status(name, HealthStatus::Down, error)
    }

    /// Create a degraded health check
    pub fn degraded<S: Into<String>>(name: S, reason: Option<String>) -> Self {
        Self::with_status(name, HealthStatus::Degraded, reason)
    }

    /// Set response time
    pub fn with_response_time(mut self, duration: Duration) -> Self {
        self.response_time_ms = duration.as_millis() as u64;
        self
    }

    /// Set additional details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Overall health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Worst status among the checks
    pub status: HealthStatus,
    /// Timestamp of the health check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Total response time in milliseconds
    pub response_time_ms: u64,
    /// Individual health check results
    pub checks: HashMap<String, HealthCheck>,
    /// Crate version
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthResponse {
    /// Create a response with no checks
    pub fn new() -> Self {
        Self {
            status: HealthStatus::Up,
            timestamp: chrono::Utc::now(),
            response_time_ms: 0,
            checks: HashMap::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Add a health check result
    pub fn add_check(mut self, check: HealthCheck) -> Self {
        if check.status == HealthStatus::Down {
            self.status = HealthStatus::Down;
        } else if check.status == HealthStatus::Degraded && self.status == HealthStatus::Up {
            self.status = HealthStatus::Degraded;
        }

        self.checks.insert(check.name.clone(), check);
        self
    }

    /// Set response time
    pub fn with_response_time(mut self, duration: Duration) -> Self {
        self.response_time_ms = duration.as_millis() as u64;
        self
    }

    /// Check if the overall system is healthy
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

/// Health check function trait
///
/// # Example
///
/// ```no_run
/// use tgov_infrastructure::health::{HealthChecker, HealthCheck};
/// use async_trait::async_trait;
///
/// struct QueueHealthChecker;
///
/// #[async_trait]
/// impl HealthChecker for QueueHealthChecker {
///     async fn check_health(&self) -> HealthCheck {
///         HealthCheck::healthy("queue")
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait HealthChecker: Send + Sync {
    /// Perform a health check
    async fn check_health(&self) -> HealthCheck;
}

/// Health check registry
#[derive(Clone, Default)]
pub struct HealthRegistry {
    checkers: Arc<RwLock<HashMap<String, Box<dyn HealthChecker>>>>,
}

impl HealthRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a health checker
    pub async fn register_checker<C>(&self, name: String, checker: C)
    where
        C: HealthChecker + 'static,
    {
        self.checkers.write().await.insert(name, Box::new(checker));
    }

    /// Unregister a health checker
    pub async fn unregister_checker(&self, name: &str) {
        self.checkers.write().await.remove(name);
    }

    /// Perform all registered health checks
    pub async fn perform_health_checks(&self) -> HealthResponse {
        let start_time = Instant::now();
        let checkers = self.checkers.read().await;

        let mut response = HealthResponse::new();
        for (name, checker) in checkers.iter() {
            let check = checker.check_health().await;
            log_health_check(name, check.status.is_healthy(), check.error.as_deref());
            response = response.add_check(check);
        }

        response.with_response_time(start_time.elapsed())
    }

    /// Get a list of registered health check names
    pub async fn list_checks(&self) -> Vec<String> {
        self.checkers.read().await.keys().cloned().collect()
    }
}

/// Built-in health checkers
pub mod checkers {
    use super::{HealthCheck, HealthChecker};
    use crate::cache::CacheEngine;
    use crate::constants::CACHE_LOCAL_UTILISATION_DEGRADED;
    use crate::tenant::TenantResourceGovernor;
    use std::sync::Arc;
    use std::time::Instant;

    /// Pings the shared distributed tier
    ///
    /// Down never happens: an unreachable tier degrades the engine to
    /// local-only.
    pub struct DistributedTierHealthChecker {
        cache: Arc<CacheEngine>,
    }

    impl DistributedTierHealthChecker {
        pub fn new(cache: Arc<CacheEngine>) -> Self {
            Self { cache }
        }
    }

    #[async_trait::async_trait]
    impl HealthChecker for DistributedTierHealthChecker {
        async fn check_health(&self) -> HealthCheck {
            const NAME: &str = "distributed_cache";
            let start_time = Instant::now();

            let Some(provider) = self.cache.distributed_provider_name().map(str::to_string) else {
                return HealthCheck::healthy(NAME)
                    .with_details(serde_json::json!({ "provider": "disabled" }));
            };
            let check = if self.cache.probe_distributed().await {
                HealthCheck::healthy(NAME)
            } else {
                HealthCheck::degraded(
                    NAME,
                    Some("Distributed tier unreachable, serving local-only".to_string()),
                )
            };
            check
                .with_details(serde_json::json!({
                    "provider": provider,
                    "dedicated_connections": self.cache.dedicated_count(),
                }))
                .with_response_time(start_time.elapsed())
        }
    }

    /// Reports local tier utilisation
    pub struct LocalTierHealthChecker {
        cache: Arc<CacheEngine>,
        degraded_ratio: f64,
    }

    impl LocalTierHealthChecker {
        /// Degrade above 95% utilisation
        pub fn new(cache: Arc<CacheEngine>) -> Self {
            Self::with_threshold(cache, CACHE_LOCAL_UTILISATION_DEGRADED)
        }

        pub fn with_threshold(cache: Arc<CacheEngine>, degraded_ratio: f64) -> Self {
            Self {
                cache,
                degraded_ratio,
            }
        }
    }

    #[async_trait::async_trait]
    impl HealthChecker for LocalTierHealthChecker {
        async fn check_health(&self) -> HealthCheck {
            const NAME: &str = "local_cache";
            let start_time = Instant::now();
            let snapshot = self.cache.metrics();

            let utilisation = if snapshot.capacity > 0 {
                snapshot.item_count as f64 / snapshot.capacity as f64
            } else {
                0.0
            };
            let check = if utilisation > self.degraded_ratio {
                HealthCheck::degraded(
                    NAME,
                    Some(format!("Local tier at {:.0}% of capacity", utilisation * 100.0)),
                )
            } else {
                HealthCheck::healthy(NAME)
            };
            check
                .with_details(serde_json::json!({
                    "enabled": self.cache.is_enabled(),
                    "item_count": snapshot.item_count,
                    "capacity": snapshot.capacity,
                    "utilisation": utilisation,
                    "hit_ratio": snapshot.hit_ratio,
                    "evictions": snapshot.metrics.evictions,
                }))
                .with_response_time(start_time.elapsed())
        }
    }

    /// Summarises the governor's tenants
    pub struct GovernorHealthChecker {
        governor: Arc<TenantResourceGovernor>,
    }

    impl GovernorHealthChecker {
        pub fn new(governor: Arc<TenantResourceGovernor>) -> Self {
            Self { governor }
        }
    }

    #[async_trait::async_trait]
    impl HealthChecker for GovernorHealthChecker {
        async fn check_health(&self) -> HealthCheck {
            let start_time = Instant::now();
            let overview = self.governor.get_all_tenants_status().await;
            HealthCheck::healthy("governor")
                .with_details(serde_json::json!({
                    "total_tenants": overview.total_tenants,
                    "enabled_tenants": overview.enabled_tenants,
                    "active_last_24h": overview.active_last_24h,
                    "throttled_tenants": overview.throttled_tenants,
                }))
                .with_response_time(start_time.elapsed())
        }
    }
}
