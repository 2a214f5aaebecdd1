//! Tenant configuration value objects
//!
//! Identifiers, service tiers, isolation levels and the numeric limit set a
//! tenant is governed by.

use crate::constants::*;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Validated tenant identifier
///
/// Identifiers are 1 to [`TENANT_ID_MAX_LENGTH`] characters drawn from
/// `[A-Za-z0-9_.-]`. The key separator and glob metacharacters are rejected,
/// so one tenant's key prefix can never match another tenant's keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Parse and validate a tenant identifier
    pub fn parse<S: AsRef<str>>(value: S) -> Result<Self> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(Error::invalid_argument("Tenant id cannot be empty"));
        }
        if value.len() > TENANT_ID_MAX_LENGTH {
            return Err(Error::invalid_argument(format!(
                "Tenant id too long (max {} characters)",
                TENANT_ID_MAX_LENGTH
            )));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(Error::invalid_argument(format!(
                "Tenant id '{}' contains invalid character '{}'",
                value, c
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// The reserved tenant used when no tenant is in scope
    pub fn global() -> Self {
        Self(GLOBAL_TENANT_ID.to_string())
    }

    /// Whether this is the reserved global tenant
    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_TENANT_ID
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TenantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Service tier a tenant subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTier {
    /// Entry tier with the tightest limits
    Free,
    /// Paid tier with moderate limits
    Professional,
    /// Highest tier, never throttled automatically
    Enterprise,
}

impl ServiceTier {
    /// All tiers, lowest first
    pub const ALL: [ServiceTier; 3] = [Self::Free, Self::Professional, Self::Enterprise];

    /// Isolation level assigned to tenants of this tier
    pub fn isolation_level(&self) -> IsolationLevel {
        match self {
            Self::Free => IsolationLevel::Shared,
            Self::Professional => IsolationLevel::Hybrid,
            Self::Enterprise => IsolationLevel::Dedicated,
        }
    }

    /// Default resource limits for this tier
    pub fn profile(&self) -> TenantResourceLimits {
        TenantResourceLimits::for_tier(*self)
    }

    /// Lowercase name of the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "professional" | "pro" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(Error::invalid_argument(format!(
                "Unknown service tier: {}. Use free, professional, or enterprise",
                other
            ))),
        }
    }
}

/// How strongly a tenant's resources are separated from other tenants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationLevel {
    /// Logical namespacing on shared connections
    Shared,
    /// Private distributed-tier connection
    Dedicated,
    /// Shared connections with tier-level limits
    Hybrid,
}

impl IsolationLevel {
    /// Whether the tenant needs a private distributed-tier connection
    pub fn requires_dedicated_connection(&self) -> bool {
        matches!(self, Self::Dedicated)
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shared => "shared",
            Self::Dedicated => "dedicated",
            Self::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Numeric ceilings a tenant is governed by
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenantResourceLimits {
    /// Maximum simultaneous connections
    pub max_connections: u32,
    /// Maximum memory in MB
    pub max_memory_mb: u64,
    /// Maximum storage in MB
    pub max_storage_mb: u64,
    /// Maximum requests per minute
    pub max_requests_per_minute: u32,
    /// Maximum concurrent sessions
    pub max_concurrent_sessions: u32,
    /// Maximum API calls per day
    pub max_api_calls_per_day: u64,
    /// Cache quota in MB
    pub cache_quota_mb: u64,
    /// Query timeout in seconds
    pub query_timeout_secs: u64,
}

impl TenantResourceLimits {
    /// Tier profile limits
    pub fn for_tier(tier: ServiceTier) -> Self {
        match tier {
            ServiceTier::Free => Self {
                max_connections: FREE_MAX_CONNECTIONS,
                max_memory_mb: FREE_MAX_MEMORY_MB,
                max_storage_mb: FREE_MAX_STORAGE_MB,
                max_requests_per_minute: FREE_MAX_REQUESTS_PER_MINUTE,
                max_concurrent_sessions: FREE_MAX_CONCURRENT_SESSIONS,
                max_api_calls_per_day: FREE_MAX_API_CALLS_PER_DAY,
                cache_quota_mb: FREE_CACHE_QUOTA_MB,
                query_timeout_secs: FREE_QUERY_TIMEOUT_SECS,
            },
            ServiceTier::Professional => Self {
                max_connections: PROFESSIONAL_MAX_CONNECTIONS,
                max_memory_mb: PROFESSIONAL_MAX_MEMORY_MB,
                max_storage_mb: PROFESSIONAL_MAX_STORAGE_MB,
                max_requests_per_minute: PROFESSIONAL_MAX_REQUESTS_PER_MINUTE,
                max_concurrent_sessions: PROFESSIONAL_MAX_CONCURRENT_SESSIONS,
                max_api_calls_per_day: PROFESSIONAL_MAX_API_CALLS_PER_DAY,
                cache_quota_mb: PROFESSIONAL_CACHE_QUOTA_MB,
                query_timeout_secs: PROFESSIONAL_QUERY_TIMEOUT_SECS,
            },
            ServiceTier::Enterprise => Self {
                max_connections: ENTERPRISE_MAX_CONNECTIONS,
                max_memory_mb: ENTERPRISE_MAX_MEMORY_MB,
                max_storage_mb: ENTERPRISE_MAX_STORAGE_MB,
                max_requests_per_minute: ENTERPRISE_MAX_REQUESTS_PER_MINUTE,
                max_concurrent_sessions: ENTERPRISE_MAX_CONCURRENT_SESSIONS,
                max_api_calls_per_day: ENTERPRISE_MAX_API_CALLS_PER_DAY,
                cache_quota_mb: ENTERPRISE_CACHE_QUOTA_MB,
                query_timeout_secs: ENTERPRISE_QUERY_TIMEOUT_SECS,
            },
        }
    }

    /// Return a copy with every field set in `update` replaced
    pub fn with_update(&self, update: &LimitsUpdate) -> Self {
        Self {
            max_connections: update.max_connections.unwrap_or(self.max_connections),
            max_memory_mb: update.max_memory_mb.unwrap_or(self.max_memory_mb),
            max_storage_mb: update.max_storage_mb.unwrap_or(self.max_storage_mb),
            max_requests_per_minute: update
                .max_requests_per_minute
                .unwrap_or(self.max_requests_per_minute),
            max_concurrent_sessions: update
                .max_concurrent_sessions
                .unwrap_or(self.max_concurrent_sessions),
            max_api_calls_per_day: update
                .max_api_calls_per_day
                .unwrap_or(self.max_api_calls_per_day),
            cache_quota_mb: update.cache_quota_mb.unwrap_or(self.cache_quota_mb),
            query_timeout_secs: update.query_timeout_secs.unwrap_or(self.query_timeout_secs),
        }
    }
}

/// Partial override of a tenant's resource limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitsUpdate {
    /// New maximum connections
    pub max_connections: Option<u32>,
    /// New maximum memory in MB
    pub max_memory_mb: Option<u64>,
    /// New maximum storage in MB
    pub max_storage_mb: Option<u64>,
    /// New maximum requests per minute
    pub max_requests_per_minute: Option<u32>,
    /// New maximum concurrent sessions
    pub max_concurrent_sessions: Option<u32>,
    /// New maximum API calls per day
    pub max_api_calls_per_day: Option<u64>,
    /// New cache quota in MB
    pub cache_quota_mb: Option<u64>,
    /// New query timeout in seconds
    pub query_timeout_secs: Option<u64>,
}

impl LimitsUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.max_connections.is_none()
            && self.max_memory_mb.is_none()
            && self.max_storage_mb.is_none()
            && self.max_requests_per_minute.is_none()
            && self.max_concurrent_sessions.is_none()
            && self.max_api_calls_per_day.is_none()
            && self.cache_quota_mb.is_none()
            && self.query_timeout_secs.is_none()
    }
}

/// Configuration record of a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Tenant identifier
    pub tenant_id: TenantId,
    /// Subscribed service tier
    pub tier: ServiceTier,
    /// Isolation level derived from the tier
    pub isolation_level: IsolationLevel,
    /// Effective resource limits
    pub resource_limits: TenantResourceLimits,
    /// Whether the limits were overridden instead of taken from the tier profile
    pub custom_limits: bool,
    /// Disabled tenants are retired: kept, but no longer monitored
    pub enabled: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl TenantConfig {
    /// Build a tenant configuration from its tier and optional custom limits
    pub fn new(
        tenant_id: TenantId,
        tier: ServiceTier,
        custom_limits: Option<TenantResourceLimits>,
    ) -> Self {
        let now = Utc::now();
        Self {
            tenant_id,
            tier,
            isolation_level: tier.isolation_level(),
            resource_limits: custom_limits.unwrap_or_else(|| tier.profile()),
            custom_limits: custom_limits.is_some(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the tenant to another tier, re-deriving isolation and limits
    pub fn change_tier(&mut self, tier: ServiceTier) {
        self.tier = tier;
        self.isolation_level = tier.isolation_level();
        self.resource_limits = tier.profile();
        self.custom_limits = false;
        self.updated_at = Utc::now();
    }

    /// Apply a partial limits override
    pub fn apply_limits(&mut self, update: &LimitsUpdate) {
        self.resource_limits = self.resource_limits.with_update(update);
        self.custom_limits = true;
        self.updated_at = Utc::now();
    }
}
