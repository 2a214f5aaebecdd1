//! Governance runtime
//!
//! Wires the cache engine, usage recorder and governor from an
//! [`AppConfig`], runs their maintenance loops, and tears everything down
//! in order: loops first, then distributed connections, then local state.

use crate::cache::{CacheEngine, build_cache_engine};
use crate::config::AppConfig;
use crate::health::checkers::{
    DistributedTierHealthChecker, GovernorHealthChecker, LocalTierHealthChecker,
};
use crate::health::{HealthRegistry, HealthResponse};
use crate::shutdown::ShutdownCoordinator;
use crate::tenant::{TenantResourceGovernor, UsageRecorder};
use chrono::Utc;
use std::sync::Arc;
use tgov_domain::error::Result;
use tgov_domain::ports::infrastructure::UsageSampler;
use tracing::{debug, info};

/// Running instance of the governance core
pub struct GovernanceRuntime {
    config: AppConfig,
    cache: Arc<CacheEngine>,
    usage: Arc<UsageRecorder>,
    governor: Arc<TenantResourceGovernor>,
    health: HealthRegistry,
    coordinator: ShutdownCoordinator,
}

impl GovernanceRuntime {
    /// Build every component; nothing runs until [`start`](Self::start)
    pub async fn build(config: AppConfig) -> Result<Self> {
        let cache = Arc::new(build_cache_engine(&config.cache)?);
        let usage = Arc::new(UsageRecorder::new());
        let sampler: Arc<dyn UsageSampler> = Arc::clone(&usage) as Arc<dyn UsageSampler>;
        let governor = Arc::new(TenantResourceGovernor::new(
            config.governor.clone(),
            Arc::clone(&cache),
            sampler,
        ));

        let health = HealthRegistry::new();
        health
            .register_checker(
                "distributed_cache".to_string(),
                DistributedTierHealthChecker::new(Arc::clone(&cache)),
            )
            .await;
        health
            .register_checker(
                "local_cache".to_string(),
                LocalTierHealthChecker::new(Arc::clone(&cache)),
            )
            .await;
        health
            .register_checker(
                "governor".to_string(),
                GovernorHealthChecker::new(Arc::clone(&governor)),
            )
            .await;

        Ok(Self {
            config,
            cache,
            usage,
            governor,
            health,
            coordinator: ShutdownCoordinator::new(),
        })
    }

    /// Spawn the expiry sweep, metrics refresh, monitoring and inactivity loops
    pub fn start(&self) {
        let cache = Arc::clone(&self.cache);
        self.coordinator.spawn_periodic(
            "cache_expiry_sweep",
            self.config.cache.expiry_sweep_interval(),
            move || {
                let cache = Arc::clone(&cache);
                async move {
                    cache.purge_expired();
                }
            },
        );

        let cache = Arc::clone(&self.cache);
        self.coordinator.spawn_periodic(
            "cache_metrics",
            self.config.cache.metrics_interval(),
            move || {
                let cache = Arc::clone(&cache);
                async move { cache.refresh_metrics().await }
            },
        );

        let governor = Arc::clone(&self.governor);
        self.coordinator.spawn_periodic(
            "governor_monitoring",
            self.config.governor.monitoring_interval(),
            move || {
                let governor = Arc::clone(&governor);
                async move {
                    governor.run_monitoring_cycle().await;
                }
            },
        );

        let governor = Arc::clone(&self.governor);
        self.coordinator.spawn_periodic(
            "governor_inactivity_sweep",
            self.config.governor.inactivity_sweep_interval(),
            move || {
                let governor = Arc::clone(&governor);
                async move {
                    let reclaimed = governor.sweep_inactive(Utc::now()).await;
                    if !reclaimed.is_empty() {
                        debug!(count = reclaimed.len(), "Inactive tenants reclaimed");
                    }
                }
            },
        );

        info!(
            tasks = self.coordinator.active_tasks(),
            "Governance runtime started"
        );
    }

    /// Stop loops, close distributed connections and clear local state
    ///
    /// # Returns
    /// True if every loop stopped within the shutdown timeout
    pub async fn shutdown(&self) -> bool {
        let completed = self
            .coordinator
            .shutdown(self.config.shutdown_timeout())
            .await;
        self.cache.close().await;
        let cleared = self.cache.clear_local();
        info!(cleared, completed, "Governance runtime stopped");
        completed
    }

    /// Run every health check
    pub async fn health(&self) -> HealthResponse {
        self.health.perform_health_checks().await
    }

    /// Effective configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Cache engine
    pub fn cache(&self) -> &Arc<CacheEngine> {
        &self.cache
    }

    /// Usage recorder feeding the governor
    pub fn usage(&self) -> &Arc<UsageRecorder> {
        &self.usage
    }

    /// Tenant resource governor
    pub fn governor(&self) -> &Arc<TenantResourceGovernor> {
        &self.governor
    }

    /// Whether shutdown has started
    pub fn is_shutting_down(&self) -> bool {
        self.coordinator.is_shutting_down()
    }
}
