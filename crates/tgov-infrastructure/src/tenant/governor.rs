//! Tenant resource governor
//!
//! Holds tenant configurations and live metrics, samples usage every
//! monitoring cycle, and writes throttle policies through the cache engine
//! for tenants over their limits. Tenants inactive for longer than the
//! inactivity window have their runtime state reclaimed; their
//! configuration stays.

use crate::cache::CacheEngine;
use crate::config::{GovernorConfig, ThrottleParams};
use crate::constants::GOVERNOR_ACTIVE_WINDOW_SECS;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tgov_domain::constants::THROTTLE_POLICY_KEY;
use tgov_domain::error::{Error, Result};
use tgov_domain::ports::infrastructure::UsageSampler;
use tgov_domain::value_objects::{
    CacheOptions, LimitsUpdate, ServiceTier, TenantConfig, TenantId, TenantMetrics,
    TenantResourceLimits, TenantStatus, TenantsOverview, ThrottlePolicy, ThrottleState,
    Violation, ViolationSeverity,
};
use tracing::{debug, info, warn};

/// Outcome of one monitoring cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringReport {
    /// Enabled tenants with usage that were evaluated
    pub tenants_checked: usize,
    /// Tenants a throttle policy was written for
    pub throttled: usize,
    /// Tenants left in the WARNED state
    pub warned: usize,
    /// Limit violations found across all tenants
    pub violations: usize,
    /// Tenants whose usage could not be sampled
    pub sample_failures: usize,
}

/// Tenant registry and usage monitor
///
/// # Example
///
/// ```ignore
/// let governor = TenantResourceGovernor::new(config.governor, cache, usage);
/// governor.create_tenant("acme", ServiceTier::Free, None).await;
///
/// let report = governor.run_monitoring_cycle().await;
/// if let Some(policy) = governor.throttle_policy(&acme).await {
///     tokio::time::sleep(policy.delay()).await;
/// }
/// ```
#[derive(Debug)]
pub struct TenantResourceGovernor {
    config: GovernorConfig,
    cache: Arc<CacheEngine>,
    sampler: Arc<dyn UsageSampler>,
    tenants: DashMap<TenantId, TenantConfig>,
    metrics: DashMap<TenantId, TenantMetrics>,
}

impl TenantResourceGovernor {
    /// Create a governor reading usage from `sampler`
    pub fn new(
        config: GovernorConfig,
        cache: Arc<CacheEngine>,
        sampler: Arc<dyn UsageSampler>,
    ) -> Self {
        Self {
            config,
            cache,
            sampler,
            tenants: DashMap::new(),
            metrics: DashMap::new(),
        }
    }

    /// Governor settings
    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    /// Cache engine the governor writes policies through
    pub fn cache(&self) -> &Arc<CacheEngine> {
        &self.cache
    }

    /// Registered tenants
    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    /// Configuration of `tenant`
    pub fn tenant_config(&self, tenant: &TenantId) -> Option<TenantConfig> {
        self.tenants.get(tenant).map(|config| config.clone())
    }

    /// Live metrics of `tenant`
    pub fn tenant_metrics(&self, tenant: &TenantId) -> Option<TenantMetrics> {
        self.metrics.get(tenant).map(|metrics| metrics.clone())
    }

    /// Register a tenant
    ///
    /// # Returns
    /// False, with nothing changed, if the id is invalid, reserved or taken
    pub async fn create_tenant(
        &self,
        tenant_id: &str,
        tier: ServiceTier,
        custom_limits: Option<TenantResourceLimits>,
    ) -> bool {
        let id = match TenantId::parse(tenant_id) {
            Ok(id) if id.is_global() => {
                warn!(tenant = %id, "Refusing to create reserved tenant");
                return false;
            }
            Ok(id) => id,
            Err(e) => {
                warn!(tenant = tenant_id, error = %e, "Refusing to create tenant with invalid id");
                return false;
            }
        };

        let config = TenantConfig::new(id.clone(), tier, custom_limits);
        let isolation = config.isolation_level;
        match self.tenants.entry(id.clone()) {
            Entry::Occupied(_) => {
                warn!(tenant = %id, "Tenant already exists");
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(config);
            }
        }
        info!(tenant = %id, tier = %tier, isolation = %isolation, "Tenant created");

        if isolation.requires_dedicated_connection() {
            self.provision(&id).await;
        }
        true
    }

    /// Move `tenant` to another tier, re-deriving limits and isolation
    pub async fn update_tenant_tier(&self, tenant: &TenantId, tier: ServiceTier) -> bool {
        let dedicated = {
            let Some(mut config) = self.tenants.get_mut(tenant) else {
                return false;
            };
            config.change_tier(tier);
            config.isolation_level.requires_dedicated_connection()
        };
        info!(tenant = %tenant, tier = %tier, "Tenant tier updated");

        if dedicated {
            self.provision(tenant).await;
        } else {
            self.cache.release_dedicated(tenant).await;
        }
        true
    }

    /// Override some resource limits of `tenant`
    ///
    /// # Errors
    /// `InvalidArgument` if `update` sets no limit
    pub fn update_tenant_limits(&self, tenant: &TenantId, update: LimitsUpdate) -> Result<bool> {
        if update.is_empty() {
            return Err(Error::invalid_argument("No resource limits to update"));
        }
        let Some(mut config) = self.tenants.get_mut(tenant) else {
            return Ok(false);
        };
        config.apply_limits(&update);
        info!(tenant = %tenant, "Tenant resource limits updated");
        Ok(true)
    }

    /// Enable or retire `tenant`
    ///
    /// Retired tenants keep their configuration but are skipped by
    /// monitoring and lose their dedicated connection.
    pub async fn set_tenant_enabled(&self, tenant: &TenantId, enabled: bool) -> bool {
        {
            let Some(mut config) = self.tenants.get_mut(tenant) else {
                return false;
            };
            config.enabled = enabled;
            config.updated_at = Utc::now();
        }
        if !enabled {
            self.cache.release_dedicated(tenant).await;
        }
        info!(tenant = %tenant, enabled, "Tenant state changed");
        true
    }

    /// Throttle policy currently stored for `tenant`
    ///
    /// Policy reads do not count towards cache hit ratio.
    pub async fn throttle_policy(&self, tenant: &TenantId) -> Option<ThrottlePolicy> {
        self.cache
            .peek(THROTTLE_POLICY_KEY, CacheOptions::for_tenant(tenant))
            .await
    }

    /// Status of one tenant
    pub async fn get_tenant_status(&self, tenant: &TenantId) -> Option<TenantStatus> {
        let config = self.tenant_config(tenant)?;
        Some(TenantStatus {
            config,
            metrics: self.tenant_metrics(tenant),
            namespace: self.cache.tenant_namespace(tenant),
            dedicated_connection: self.cache.has_dedicated(tenant),
            throttle_policy: self.throttle_policy(tenant).await,
        })
    }

    /// Aggregate status of every tenant
    pub async fn get_all_tenants_status(&self) -> TenantsOverview {
        let mut ids: Vec<TenantId> = self.tenants.iter().map(|e| e.key().clone()).collect();
        ids.sort();

        let active_since = Utc::now() - chrono::Duration::seconds(GOVERNOR_ACTIVE_WINDOW_SECS);
        let mut overview = TenantsOverview::default();
        for id in ids {
            let Some(status) = self.get_tenant_status(&id).await else {
                continue;
            };
            overview.total_tenants += 1;
            if status.config.enabled {
                overview.enabled_tenants += 1;
            }
            *overview.by_tier.entry(status.config.tier).or_insert(0) += 1;
            *overview
                .by_isolation
                .entry(status.config.isolation_level)
                .or_insert(0) += 1;
            if let Some(metrics) = &status.metrics {
                if metrics.last_activity >= active_since {
                    overview.active_last_24h += 1;
                }
                if metrics.throttle_state == ThrottleState::Throttled {
                    overview.throttled_tenants += 1;
                }
            }
            overview.tenants.push(status);
        }
        overview
    }

    /// Sample every enabled tenant and apply throttling
    pub async fn run_monitoring_cycle(&self) -> MonitoringReport {
        let tenants: Vec<TenantConfig> = self
            .tenants
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.value().clone())
            .collect();

        let mut report = MonitoringReport::default();
        for config in &tenants {
            self.monitor_tenant(config, &mut report).await;
        }
        debug!(
            checked = report.tenants_checked,
            throttled = report.throttled,
            warned = report.warned,
            "Monitoring cycle complete"
        );
        report
    }

    async fn monitor_tenant(&self, config: &TenantConfig, report: &mut MonitoringReport) {
        let id = &config.tenant_id;
        let mut sample = match self.sampler.sample(id).await {
            Ok(sample) => sample,
            Err(e) => {
                report.sample_failures += 1;
                warn!(tenant = %id, error = %e, "Failed to sample tenant usage");
                return;
            }
        };
        sample.cache_usage_mb = self.cache.tenant_usage(id).size_mb();

        let now = Utc::now();
        let mut metrics = match self.tenant_metrics(id) {
            Some(metrics) => metrics,
            None if sample.is_idle() => return,
            None => TenantMetrics::new(id.clone(), sample.last_activity.unwrap_or(now)),
        };
        report.tenants_checked += 1;

        if config.isolation_level.requires_dedicated_connection() && !self.cache.has_dedicated(id) {
            self.provision(id).await;
        }

        metrics.apply_sample(&sample, now);
        let limits = &config.resource_limits;
        let violations = metrics.violations(limits);
        let state = if violations.is_empty() {
            if metrics.near_limits(limits, self.config.warning_ratio) {
                ThrottleState::Warned
            } else {
                ThrottleState::Normal
            }
        } else {
            report.violations += violations.len();
            self.respond_to_violations(config, &violations, now).await
        };

        metrics.performance_score =
            metrics.compute_performance_score(limits, self.config.warning_ratio);
        metrics.throttle_state = state;
        metrics.violations = violations;
        match state {
            ThrottleState::Throttled => report.throttled += 1,
            ThrottleState::Warned => report.warned += 1,
            ThrottleState::Normal => {}
        }
        self.metrics.insert(id.clone(), metrics);
    }

    async fn respond_to_violations(
        &self,
        config: &TenantConfig,
        violations: &[Violation],
        now: DateTime<Utc>,
    ) -> ThrottleState {
        let id = &config.tenant_id;
        let severity = ViolationSeverity::for_tier(config.tier);
        let dimensions: Vec<String> = violations.iter().map(|v| v.dimension.to_string()).collect();

        let Some(params) = self.throttle_params(severity) else {
            warn!(
                tenant = %id,
                violations = ?dimensions,
                "Tenant exceeded resource limits"
            );
            return ThrottleState::Warned;
        };

        let policy = ThrottlePolicy {
            delay_ms: params.delay_ms,
            rejection_rate: params.rejection_rate,
            severity,
            violations: violations.iter().map(|v| v.dimension).collect(),
            issued_at: now,
        };
        let options = CacheOptions::for_tenant(id).with_ttl(self.config.throttle_policy_ttl());
        if self.cache.set(THROTTLE_POLICY_KEY, &policy, options).await {
            info!(
                tenant = %id,
                severity = ?severity,
                delay_ms = policy.delay_ms,
                rejection_rate = policy.rejection_rate,
                violations = ?dimensions,
                "Throttle policy applied"
            );
            ThrottleState::Throttled
        } else {
            warn!(tenant = %id, violations = ?dimensions, "Failed to store throttle policy");
            ThrottleState::Warned
        }
    }

    fn throttle_params(&self, severity: ViolationSeverity) -> Option<ThrottleParams> {
        match severity {
            ViolationSeverity::High => Some(self.config.high_throttle),
            ViolationSeverity::Medium => Some(self.config.medium_throttle),
            ViolationSeverity::NotifyOnly => None,
        }
    }

    /// Reclaim runtime state of tenants idle since before the inactivity window
    ///
    /// Usage held for tenants that were never registered is dropped as well.
    ///
    /// # Returns
    /// Tenants whose state was reclaimed
    pub async fn sweep_inactive(&self, now: DateTime<Utc>) -> Vec<TenantId> {
        let cutoff = i64::try_from(self.config.inactivity_window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|window| now.checked_sub_signed(window));
        let Some(cutoff) = cutoff else {
            return Vec::new();
        };

        let mut candidates: Vec<TenantId> = self
            .metrics
            .iter()
            .filter(|entry| entry.last_activity < cutoff)
            .map(|entry| entry.key().clone())
            .collect();
        // Never-active tenants only hold a dedicated connection
        candidates.extend(
            self.tenants
                .iter()
                .filter(|entry| {
                    entry.created_at < cutoff
                        && !self.metrics.contains_key(entry.key())
                        && self.cache.has_dedicated(entry.key())
                })
                .map(|entry| entry.key().clone()),
        );

        let mut reclaimed = Vec::new();
        for id in candidates {
            let fresh = self
                .metrics
                .get(&id)
                .is_some_and(|metrics| metrics.last_activity >= cutoff);
            if fresh {
                continue;
            }
            self.metrics.remove(&id);
            let invalidated = self.cache.invalidate_tenant(&id).await;
            self.cache.release_dedicated(&id).await;
            self.sampler.forget(&id).await;
            info!(tenant = %id, invalidated, "Reclaimed inactive tenant");
            reclaimed.push(id);
        }

        for id in self.sampler.known_tenants().await {
            if !self.tenants.contains_key(&id) {
                self.sampler.forget(&id).await;
                debug!(tenant = %id, "Dropped usage of unregistered tenant");
            }
        }
        reclaimed
    }

    async fn provision(&self, tenant: &TenantId) {
        if !self.cache.supports_dedicated() {
            debug!(tenant = %tenant, "No dedicated cache connector configured");
            return;
        }
        if let Err(e) = self.cache.provision_dedicated(tenant).await {
            warn!(tenant = %tenant, error = %e, "Failed to open dedicated cache connection");
        }
    }
}
