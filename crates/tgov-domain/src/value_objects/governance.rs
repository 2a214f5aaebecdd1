//! Usage, violation and throttling value objects

use crate::constants::*;
use crate::value_objects::tenant::{
    IsolationLevel, ServiceTier, TenantConfig, TenantId, TenantResourceLimits,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Point-in-time usage reading for one tenant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    /// Open connections
    pub active_connections: u32,
    /// Memory in use, MB
    pub memory_usage_mb: f64,
    /// Storage in use, MB
    pub storage_usage_mb: f64,
    /// Requests observed over the last minute
    pub requests_per_minute: u32,
    /// Open sessions
    pub concurrent_sessions: u32,
    /// API calls since midnight UTC
    pub api_calls_today: u64,
    /// Cache held for the tenant, MB
    pub cache_usage_mb: f64,
    /// Most recent activity seen by the sampler
    pub last_activity: Option<DateTime<Utc>>,
}

impl UsageSample {
    /// Whether the sampler has seen nothing at all for the tenant
    pub fn is_idle(&self) -> bool {
        self.last_activity.is_none()
            && self.active_connections == 0
            && self.memory_usage_mb == 0.0
            && self.storage_usage_mb == 0.0
            && self.requests_per_minute == 0
            && self.concurrent_sessions == 0
            && self.api_calls_today == 0
            && self.cache_usage_mb == 0.0
    }
}

/// A limit dimension that can be exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitDimension {
    /// `max_connections`
    Connections,
    /// `max_memory_mb`
    Memory,
    /// `max_storage_mb`
    Storage,
    /// `max_requests_per_minute`
    RequestsPerMinute,
    /// `max_concurrent_sessions`
    ConcurrentSessions,
    /// `max_api_calls_per_day`
    ApiCallsPerDay,
    /// `cache_quota_mb`
    CacheQuota,
}

impl LimitDimension {
    /// Every governed dimension
    pub const ALL: [LimitDimension; 7] = [
        Self::Connections,
        Self::Memory,
        Self::Storage,
        Self::RequestsPerMinute,
        Self::ConcurrentSessions,
        Self::ApiCallsPerDay,
        Self::CacheQuota,
    ];

    /// Ceiling for this dimension
    pub fn limit(&self, limits: &TenantResourceLimits) -> f64 {
        match self {
            Self::Connections => f64::from(limits.max_connections),
            Self::Memory => limits.max_memory_mb as f64,
            Self::Storage => limits.max_storage_mb as f64,
            Self::RequestsPerMinute => f64::from(limits.max_requests_per_minute),
            Self::ConcurrentSessions => f64::from(limits.max_concurrent_sessions),
            Self::ApiCallsPerDay => limits.max_api_calls_per_day as f64,
            Self::CacheQuota => limits.cache_quota_mb as f64,
        }
    }

    /// Current usage for this dimension
    pub fn usage(&self, metrics: &TenantMetrics) -> f64 {
        match self {
            Self::Connections => f64::from(metrics.active_connections),
            Self::Memory => metrics.memory_usage_mb,
            Self::Storage => metrics.storage_usage_mb,
            Self::RequestsPerMinute => f64::from(metrics.requests_per_minute),
            Self::ConcurrentSessions => f64::from(metrics.concurrent_sessions),
            Self::ApiCallsPerDay => metrics.api_calls_today as f64,
            Self::CacheQuota => metrics.cache_usage_mb,
        }
    }
}

impl fmt::Display for LimitDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connections => "connections",
            Self::Memory => "memory",
            Self::Storage => "storage",
            Self::RequestsPerMinute => "requests_per_minute",
            Self::ConcurrentSessions => "concurrent_sessions",
            Self::ApiCallsPerDay => "api_calls_per_day",
            Self::CacheQuota => "cache_quota",
        };
        f.write_str(name)
    }
}

/// A limit exceeded during a monitoring cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Exceeded dimension
    pub dimension: LimitDimension,
    /// Observed usage
    pub current: f64,
    /// Configured ceiling
    pub limit: f64,
}

/// Response severity chosen for a tenant with violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Heavy throttle
    High,
    /// Light throttle
    Medium,
    /// Log and notify, never throttle
    NotifyOnly,
}

impl ViolationSeverity {
    /// Severity applied to violations of a tenant in `tier`
    pub fn for_tier(tier: ServiceTier) -> Self {
        match tier {
            ServiceTier::Free => Self::High,
            ServiceTier::Professional => Self::Medium,
            ServiceTier::Enterprise => Self::NotifyOnly,
        }
    }

    /// Whether this severity produces a throttle policy
    pub fn throttles(&self) -> bool {
        !matches!(self, Self::NotifyOnly)
    }
}

/// Governance state of a tenant, recomputed every monitoring cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleState {
    /// Within limits
    #[default]
    Normal,
    /// Near or over limits without an active throttle
    Warned,
    /// Throttle policy written this cycle
    Throttled,
}

/// Admission directive consumed by request-handling code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrottlePolicy {
    /// Delay to impose before serving a request
    pub delay_ms: u64,
    /// Share of requests to reject, 0.0 to 1.0
    pub rejection_rate: f64,
    /// Severity that produced this policy
    pub severity: ViolationSeverity,
    /// Dimensions that were exceeded
    pub violations: Vec<LimitDimension>,
    /// When the policy was computed
    pub issued_at: DateTime<Utc>,
}

impl ThrottlePolicy {
    /// Delay as a [`Duration`]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Decide admission for a request given a uniform roll in `[0, 1)`
    pub fn should_reject(&self, roll: f64) -> bool {
        roll < self.rejection_rate
    }
}

/// Live counters for one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantMetrics {
    /// Tenant identifier
    pub tenant_id: TenantId,
    /// Open connections
    pub active_connections: u32,
    /// Memory in use, MB
    pub memory_usage_mb: f64,
    /// Storage in use, MB
    pub storage_usage_mb: f64,
    /// Requests over the last minute
    pub requests_per_minute: u32,
    /// Open sessions
    pub concurrent_sessions: u32,
    /// API calls since midnight UTC
    pub api_calls_today: u64,
    /// Cache held for the tenant, MB
    pub cache_usage_mb: f64,
    /// Most recent activity
    pub last_activity: DateTime<Utc>,
    /// When the metrics were last refreshed
    pub last_sampled: Option<DateTime<Utc>>,
    /// Derived health score, 0 to 100
    pub performance_score: f64,
    /// Governance state after the last cycle
    pub throttle_state: ThrottleState,
    /// Violations found in the last cycle
    pub violations: Vec<Violation>,
}

impl TenantMetrics {
    /// Fresh metrics for a tenant first observed at `now`
    pub fn new(tenant_id: TenantId, now: DateTime<Utc>) -> Self {
        Self {
            tenant_id,
            active_connections: 0,
            memory_usage_mb: 0.0,
            storage_usage_mb: 0.0,
            requests_per_minute: 0,
            concurrent_sessions: 0,
            api_calls_today: 0,
            cache_usage_mb: 0.0,
            last_activity: now,
            last_sampled: None,
            performance_score: PERFORMANCE_SCORE_MAX,
            throttle_state: ThrottleState::Normal,
            violations: Vec::new(),
        }
    }

    /// Overwrite counters with a new sample
    pub fn apply_sample(&mut self, sample: &UsageSample, now: DateTime<Utc>) {
        self.active_connections = sample.active_connections;
        self.memory_usage_mb = sample.memory_usage_mb;
        self.storage_usage_mb = sample.storage_usage_mb;
        self.requests_per_minute = sample.requests_per_minute;
        self.concurrent_sessions = sample.concurrent_sessions;
        self.api_calls_today = sample.api_calls_today;
        self.cache_usage_mb = sample.cache_usage_mb;
        if let Some(activity) = sample.last_activity {
            if activity > self.last_activity {
                self.last_activity = activity;
            }
        }
        self.last_sampled = Some(now);
    }

    /// Usage divided by limit for every dimension with a non-zero limit
    pub fn usage_ratios(&self, limits: &TenantResourceLimits) -> Vec<(LimitDimension, f64)> {
        LimitDimension::ALL
            .iter()
            .filter_map(|dimension| {
                let limit = dimension.limit(limits);
                (limit > 0.0).then(|| (*dimension, dimension.usage(self) / limit))
            })
            .collect()
    }

    /// Dimensions whose usage strictly exceeds the limit
    pub fn violations(&self, limits: &TenantResourceLimits) -> Vec<Violation> {
        LimitDimension::ALL
            .iter()
            .filter_map(|dimension| {
                let current = dimension.usage(self);
                let limit = dimension.limit(limits);
                (current > limit).then_some(Violation {
                    dimension: *dimension,
                    current,
                    limit,
                })
            })
            .collect()
    }

    /// Score from 0 to 100, losing one point per percent of usage above
    /// `warning_ratio` in any dimension
    pub fn compute_performance_score(
        &self,
        limits: &TenantResourceLimits,
        warning_ratio: f64,
    ) -> f64 {
        let penalty: f64 = self
            .usage_ratios(limits)
            .into_iter()
            .filter(|(_, ratio)| *ratio > warning_ratio)
            .map(|(_, ratio)| (ratio - warning_ratio) * 100.0)
            .sum();
        (PERFORMANCE_SCORE_MAX - penalty).clamp(0.0, PERFORMANCE_SCORE_MAX)
    }

    /// Whether any dimension is above `warning_ratio`
    pub fn near_limits(&self, limits: &TenantResourceLimits, warning_ratio: f64) -> bool {
        self.usage_ratios(limits)
            .iter()
            .any(|(_, ratio)| *ratio > warning_ratio)
    }
}

/// Status of a single tenant for operational consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantStatus {
    /// Tenant configuration
    pub config: TenantConfig,
    /// Live metrics, absent until first observed or after reclamation
    pub metrics: Option<TenantMetrics>,
    /// Cache namespace prefix of the tenant
    pub namespace: String,
    /// Whether a private distributed-tier connection is open
    pub dedicated_connection: bool,
    /// Throttle policy currently in force
    pub throttle_policy: Option<ThrottlePolicy>,
}

/// Aggregate view over all tenants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantsOverview {
    /// Registered tenants
    pub total_tenants: usize,
    /// Tenants not retired
    pub enabled_tenants: usize,
    /// Tenant count per tier
    pub by_tier: BTreeMap<ServiceTier, usize>,
    /// Tenant count per isolation level
    pub by_isolation: BTreeMap<IsolationLevel, usize>,
    /// Tenants active in the last 24 hours
    pub active_last_24h: usize,
    /// Tenants currently throttled
    pub throttled_tenants: usize,
    /// Per-tenant status
    pub tenants: Vec<TenantStatus>,
}
