//! Cache value objects
//!
//! Options passed to cache calls, the tagged envelope values are stored in,
//! and the process-wide cache metrics.

use crate::error::{Error, Result};
use crate::value_objects::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Which tiers a cache call touches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLevel {
    /// Process-local tier only
    Local,
    /// Distributed tier only
    Distributed,
    /// Local tier backed by the distributed tier
    #[default]
    Both,
}

impl CacheLevel {
    /// Whether the local tier is consulted
    pub fn uses_local(&self) -> bool {
        matches!(self, Self::Local | Self::Both)
    }

    /// Whether the distributed tier is consulted
    pub fn uses_distributed(&self) -> bool {
        matches!(self, Self::Distributed | Self::Both)
    }
}

/// Per-call cache options
///
/// # Example
///
/// ```ignore
/// let opts = CacheOptions::new()
///     .with_tenant(TenantId::parse("acme")?)
///     .with_ttl_secs(60)
///     .with_level(CacheLevel::Local);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheOptions {
    /// Explicit TTL, overriding tenant and global defaults
    pub ttl: Option<Duration>,
    /// Explicit tenant, overriding the task-scoped tenant
    pub tenant: Option<TenantId>,
    /// Tiers to touch
    pub level: CacheLevel,
}

impl CacheOptions {
    /// Options with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Options scoped to `tenant`
    pub fn for_tenant(tenant: &TenantId) -> Self {
        Self::new().with_tenant(tenant.clone())
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the TTL in seconds
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.ttl = Some(Duration::from_secs(secs));
        self
    }

    /// Set the tenant
    pub fn with_tenant(mut self, tenant: TenantId) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Set the tiers to touch
    pub fn with_level(mut self, level: CacheLevel) -> Self {
        self.level = level;
        self
    }
}

/// Scalar payload of a [`CachedValue`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Primitive {
    /// JSON null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer beyond `i64::MAX`
    UInt(u64),
    /// Floating point number
    Float(f64),
    /// UTF-8 text
    Text(String),
}

/// Tagged envelope every cached value is stored in
///
/// Scalars keep their exact kind so a cached `42` never comes back as `42.0`
/// or `"42"`; everything else is stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CachedValue {
    /// Scalar value
    Primitive(Primitive),
    /// Structured document (objects, arrays)
    Structured(serde_json::Value),
}

impl CachedValue {
    /// Wrap a serializable value
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(Self::from_json(json))
    }

    /// Classify a JSON value into the envelope
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value;
        match json {
            Value::Null => Self::Primitive(Primitive::Null),
            Value::Bool(b) => Self::Primitive(Primitive::Bool(b)),
            Value::String(s) => Self::Primitive(Primitive::Text(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Primitive(Primitive::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Self::Primitive(Primitive::UInt(u))
                } else {
                    Self::Primitive(Primitive::Float(n.as_f64().unwrap_or_default()))
                }
            }
            other => Self::Structured(other),
        }
    }

    /// Unwrap into a JSON value
    pub fn into_json(self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Primitive(Primitive::Null) => Value::Null,
            Self::Primitive(Primitive::Bool(b)) => Value::Bool(b),
            Self::Primitive(Primitive::Int(i)) => Value::from(i),
            Self::Primitive(Primitive::UInt(u)) => Value::from(u),
            Self::Primitive(Primitive::Float(f)) => Value::from(f),
            Self::Primitive(Primitive::Text(s)) => Value::String(s),
            Self::Structured(value) => value,
        }
    }

    /// Unwrap into a typed value
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_json())?)
    }

    /// Whether this is a scalar
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

/// Lifetime left to a [`StoredValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Never expires
    Unbounded,
    /// Expires after the duration
    Remaining(Duration),
    /// Deadline has passed
    Expired,
}

/// Stored form of a cache entry: the envelope and its absolute deadline
///
/// The deadline travels with the value so that a copy read back from the
/// distributed tier keeps only the lifetime it has left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    /// Unix milliseconds at which the value expires, `None` if it never does
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
    /// Wrapped value
    pub value: CachedValue,
}

impl StoredValue {
    /// Wrap `value` to live for `ttl` from `now`
    ///
    /// A deadline beyond the representable range means no expiry.
    pub fn new(value: CachedValue, ttl: Duration, now: DateTime<Utc>) -> Self {
        let expires_at_ms = i64::try_from(ttl.as_millis())
            .ok()
            .and_then(|ms| now.timestamp_millis().checked_add(ms));
        Self {
            expires_at_ms,
            value,
        }
    }

    /// Lifetime left at `now`
    pub fn lifetime(&self, now: DateTime<Utc>) -> Lifetime {
        let Some(deadline) = self.expires_at_ms else {
            return Lifetime::Unbounded;
        };
        match u64::try_from(deadline.saturating_sub(now.timestamp_millis())) {
            Ok(ms) if ms > 0 => Lifetime::Remaining(Duration::from_millis(ms)),
            _ => Lifetime::Expired,
        }
    }

    /// Serialize to the string form the tiers hold
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the string form the tiers hold
    pub fn from_payload(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| Error::cache(format!("Malformed cache entry: {}", e)))
    }
}

/// Process-wide cache counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetrics {
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that returned nothing
    pub misses: u64,
    /// Local entries evicted for capacity
    pub evictions: u64,
    /// Bytes held by the local tier
    pub memory_usage_bytes: u64,
    /// Running average lookup latency
    pub avg_lookup_time_ms: f64,
    /// Local item count per tenant
    pub tenant_distribution: BTreeMap<String, u64>,
}

impl CacheMetrics {
    /// Total lookups
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hits over lookups, 0.0 when nothing was looked up
    pub fn hit_ratio(&self) -> f64 {
        let total = self.lookups();
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Count a lookup and fold its latency into the running average
    pub fn record_lookup(&mut self, hit: bool, elapsed_ms: f64) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        let n = self.lookups() as f64;
        self.avg_lookup_time_ms = (self.avg_lookup_time_ms * (n - 1.0) + elapsed_ms) / n;
    }
}

/// Point-in-time cache report for the operational surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetricsSnapshot {
    /// Counters
    pub metrics: CacheMetrics,
    /// Hits over lookups
    pub hit_ratio: f64,
    /// Local entries resident
    pub item_count: usize,
    /// Local tier capacity
    pub capacity: usize,
    /// Name of the shared distributed provider, if any
    pub distributed_provider: Option<String>,
    /// Whether the distributed tier is currently usable
    pub distributed_connected: bool,
    /// Open dedicated tenant connections
    pub dedicated_connections: usize,
}

/// Local-tier footprint of one tenant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCacheUsage {
    /// Resident entries
    pub item_count: u64,
    /// Bytes held
    pub size_bytes: u64,
}

impl TenantCacheUsage {
    /// Bytes held, in MB
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}
