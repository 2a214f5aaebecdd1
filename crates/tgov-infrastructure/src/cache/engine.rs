//! Two-tier cache engine
//!
//! Reads go local first and fall back to the distributed tier; writes go to
//! the tiers selected by [`CacheLevel`]. Every key is qualified by namespace
//! and tenant. Distributed-tier calls run under a per-operation timeout;
//! a failure on the shared connection marks the tier unavailable and the
//! engine carries on local-only until a probe restores it.
//!
//! Stored payloads carry their absolute deadline, so a value copied back
//! from the distributed tier keeps only the lifetime it has left.

use crate::cache::key::{qualified_key, resolve_tenant, tenant_prefix};
use crate::cache::local::{CacheEntry, InsertOutcome, LocalLookup, LocalStats, LocalTier};
use crate::config::CacheConfig;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tgov_domain::error::{Error, Result};
use tgov_domain::ports::providers::{DistributedCacheConnector, DistributedCacheProvider};
use tgov_domain::value_objects::{
    CacheLevel, CacheMetrics, CacheMetricsSnapshot, CacheOptions, CachedValue, Lifetime,
    StoredValue, TenantCacheUsage, TenantId,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Distributed provider chosen for one call
struct Route {
    provider: Arc<dyn DistributedCacheProvider>,
    dedicated: bool,
}

/// Tenant-aware two-tier cache
///
/// # Example
///
/// ```ignore
/// let engine = CacheEngine::new(&config.cache).with_distributed(redis);
///
/// let opts = CacheOptions::for_tenant(&tenant).with_ttl_secs(60);
/// engine.set("profile", &profile, opts.clone()).await;
/// let cached: Option<Profile> = engine.get("profile", opts).await;
/// ```
#[derive(Debug)]
pub struct CacheEngine {
    enabled: bool,
    namespace: String,
    default_ttl: Duration,
    tenant_ttl_overrides: HashMap<TenantId, Duration>,
    operation_timeout: Duration,
    local: LocalTier,
    distributed: Option<Arc<dyn DistributedCacheProvider>>,
    connector: Option<Arc<dyn DistributedCacheConnector>>,
    dedicated: DashMap<TenantId, Arc<dyn DistributedCacheProvider>>,
    distributed_available: AtomicBool,
    metrics: Mutex<CacheMetrics>,
}

impl CacheEngine {
    /// Create a local-only engine from configuration
    pub fn new(config: &CacheConfig) -> Self {
        let tenant_ttl_overrides = config
            .tenant_ttl_overrides
            .iter()
            .filter_map(|(tenant, secs)| match TenantId::parse(tenant) {
                Ok(id) => Some((id, Duration::from_secs(*secs))),
                Err(e) => {
                    warn!(tenant = %tenant, error = %e, "Ignoring TTL override for invalid tenant");
                    None
                }
            })
            .collect();
        let capacity = if config.enabled {
            config.max_local_items
        } else {
            0
        };

        Self {
            enabled: config.enabled,
            namespace: config.namespace.clone(),
            default_ttl: config.default_ttl(),
            tenant_ttl_overrides,
            operation_timeout: config.operation_timeout(),
            local: LocalTier::new(capacity),
            distributed: None,
            connector: None,
            dedicated: DashMap::new(),
            distributed_available: AtomicBool::new(false),
            metrics: Mutex::new(CacheMetrics::default()),
        }
    }

    /// Attach the shared distributed tier
    pub fn with_distributed(mut self, provider: Arc<dyn DistributedCacheProvider>) -> Self {
        if self.enabled {
            self.distributed = Some(provider);
            self.distributed_available.store(true, Ordering::SeqCst);
        }
        self
    }

    /// Attach the connector used for DEDICATED tenants
    pub fn with_connector(mut self, connector: Arc<dyn DistributedCacheConnector>) -> Self {
        if self.enabled {
            self.connector = Some(connector);
        }
        self
    }

    /// Whether the engine stores anything
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured namespace token
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Local tier capacity
    pub fn local_capacity(&self) -> usize {
        self.local.capacity()
    }

    /// Local entries resident
    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    /// Whether the shared distributed tier is configured and reachable
    pub fn is_distributed_available(&self) -> bool {
        self.distributed.is_some() && self.distributed_available.load(Ordering::SeqCst)
    }

    /// Name of the shared distributed provider
    pub fn distributed_provider_name(&self) -> Option<&str> {
        self.distributed
            .as_deref()
            .map(|provider| provider.provider_name())
    }

    /// Whether dedicated connections can be opened
    pub fn supports_dedicated(&self) -> bool {
        self.connector.is_some()
    }

    /// TTL applied to `tenant` when the call sets none
    pub fn effective_ttl(&self, tenant: &TenantId, explicit: Option<Duration>) -> Duration {
        explicit
            .or_else(|| self.tenant_ttl_overrides.get(tenant).copied())
            .unwrap_or(self.default_ttl)
    }

    /// Namespace prefix of `tenant`
    pub fn tenant_namespace(&self, tenant: &TenantId) -> String {
        tenant_prefix(&self.namespace, tenant)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.operation_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn metrics_lock(&self) -> MutexGuard<'_, CacheMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn route(&self, tenant: &TenantId) -> Option<Route> {
        if let Some(provider) = self.dedicated.get(tenant) {
            return Some(Route {
                provider: Arc::clone(provider.value()),
                dedicated: true,
            });
        }
        self.shared_route()
    }

    fn shared_route(&self) -> Option<Route> {
        if !self.is_distributed_available() {
            return None;
        }
        self.distributed.as_ref().map(|provider| Route {
            provider: Arc::clone(provider),
            dedicated: false,
        })
    }

    async fn guarded<T, F>(&self, route: &Route, operation: &'static str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                self.distributed_failed(route, operation, &e.to_string());
                None
            }
            Err(_) => {
                let e = Error::timeout(operation, self.timeout_ms());
                self.distributed_failed(route, operation, &e.to_string());
                None
            }
        }
    }

    fn distributed_failed(&self, route: &Route, operation: &str, error: &str) {
        let provider = route.provider.provider_name();
        if route.dedicated {
            warn!(provider, operation, error, "Dedicated cache connection failed");
        } else if self.distributed_available.swap(false, Ordering::SeqCst) {
            warn!(
                provider,
                operation, error, "Distributed cache unavailable, continuing local-only"
            );
        } else {
            debug!(provider, operation, error, "Distributed cache call failed");
        }
    }

    fn store_local(
        &self,
        key: &str,
        payload: &str,
        tenant: &TenantId,
        ttl: Option<Duration>,
        evict: bool,
    ) -> bool {
        let entry = CacheEntry::new(
            key.to_string(),
            payload.to_string(),
            tenant.clone(),
            ttl,
            Instant::now(),
        );
        match self.local.insert(entry, evict) {
            InsertOutcome::Stored { evicted } => {
                if evicted > 0 {
                    self.metrics_lock().evictions += evicted;
                    debug!(evicted, "Evicted least recently used local entries");
                }
                true
            }
            InsertOutcome::Full | InsertOutcome::Disabled => false,
        }
    }

    /// Store `value` under `key`
    ///
    /// A zero TTL stores nothing.
    ///
    /// # Returns
    /// True if at least one tier accepted the write
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: CacheOptions,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let tenant = resolve_tenant(options.tenant.as_ref());
        let qualified = qualified_key(&self.namespace, &tenant, key);
        let ttl = self.effective_ttl(&tenant, options.ttl);
        if ttl.is_zero() {
            debug!(tenant = %tenant, key, "Skipping cache write with zero TTL");
            return false;
        }
        let payload = match CachedValue::encode(value)
            .and_then(|v| StoredValue::new(v, ttl, Utc::now()).to_payload())
        {
            Ok(payload) => payload,
            Err(e) => {
                warn!(tenant = %tenant, key, error = %e, "Failed to serialize cache value");
                return false;
            }
        };

        let local_stored = options.level.uses_local()
            && self.store_local(&qualified, &payload, &tenant, Some(ttl), true);

        let mut distributed_stored = false;
        if options.level.uses_distributed()
            && let Some(route) = self.route(&tenant)
        {
            distributed_stored = self
                .guarded(
                    &route,
                    "set",
                    route.provider.set_with_ttl(&qualified, &payload, Some(ttl)),
                )
                .await
                .is_some();
        }

        if options.level == CacheLevel::Distributed {
            return if distributed_stored {
                self.store_local(&qualified, &payload, &tenant, Some(ttl), false);
                true
            } else {
                debug!(tenant = %tenant, key, "Distributed write degraded to local tier");
                self.store_local(&qualified, &payload, &tenant, Some(ttl), true)
            };
        }

        local_stored || distributed_stored
    }

    /// Fetch the value stored under `key`
    ///
    /// Undecodable values are reported as misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, options: CacheOptions) -> Option<T> {
        let started = Instant::now();
        let value = self.lookup(key, &options).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics_lock().record_lookup(value.is_some(), elapsed_ms);
        value
    }

    /// Fetch the value stored under `key` without counting a lookup
    pub async fn peek<T: DeserializeOwned>(&self, key: &str, options: CacheOptions) -> Option<T> {
        self.lookup(key, &options).await
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str, options: &CacheOptions) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let tenant = resolve_tenant(options.tenant.as_ref());
        let qualified = qualified_key(&self.namespace, &tenant, key);

        if options.level.uses_local()
            && let LocalLookup::Hit(payload) = self.local.get(&qualified, Instant::now())
        {
            match StoredValue::from_payload(&payload).and_then(|stored| stored.value.decode()) {
                Ok(value) => return Some(value),
                Err(e) => {
                    debug!(tenant = %tenant, key, error = %e, "Undecodable local cache entry");
                    return None;
                }
            }
        }

        if !options.level.uses_distributed() {
            return None;
        }
        let route = self.route(&tenant)?;
        let payload = self
            .guarded(&route, "get", route.provider.get(&qualified))
            .await
            .flatten()?;
        let stored = match StoredValue::from_payload(&payload) {
            Ok(stored) => stored,
            Err(e) => {
                debug!(tenant = %tenant, key, error = %e, "Undecodable distributed cache entry");
                return None;
            }
        };
        let ttl = match stored.lifetime(Utc::now()) {
            Lifetime::Expired => {
                debug!(tenant = %tenant, key, "Distributed cache entry past its deadline");
                return None;
            }
            Lifetime::Remaining(ttl) => Some(ttl),
            Lifetime::Unbounded => None,
        };
        match stored.value.decode() {
            Ok(value) => {
                self.store_local(&qualified, &payload, &tenant, ttl, false);
                Some(value)
            }
            Err(e) => {
                debug!(tenant = %tenant, key, error = %e, "Undecodable distributed cache entry");
                None
            }
        }
    }

    /// Whether a live value exists, without counting a lookup
    pub async fn exists(&self, key: &str, options: CacheOptions) -> bool {
        if !self.enabled {
            return false;
        }
        let tenant = resolve_tenant(options.tenant.as_ref());
        let qualified = qualified_key(&self.namespace, &tenant, key);
        if options.level.uses_local() && self.local.contains(&qualified, Instant::now()) {
            return true;
        }
        if !options.level.uses_distributed() {
            return false;
        }
        match self.route(&tenant) {
            Some(route) => self
                .guarded(&route, "exists", route.provider.get(&qualified))
                .await
                .flatten()
                .and_then(|payload| StoredValue::from_payload(&payload).ok())
                .is_some_and(|stored| stored.lifetime(Utc::now()) != Lifetime::Expired),
            None => false,
        }
    }

    /// Remove `key` from both tiers
    pub async fn delete(&self, key: &str, options: CacheOptions) -> bool {
        let tenant = resolve_tenant(options.tenant.as_ref());
        let qualified = qualified_key(&self.namespace, &tenant, key);
        let local_removed = self.local.remove(&qualified);

        let distributed_removed = match self.route(&tenant) {
            Some(route) => self
                .guarded(&route, "delete", route.provider.delete(&qualified))
                .await
                .unwrap_or(false),
            None => false,
        };
        local_removed || distributed_removed
    }

    /// Remove every entry of `tenant` from both tiers
    ///
    /// # Returns
    /// Entries removed locally plus keys removed from the distributed tier
    pub async fn invalidate_tenant(&self, tenant: &TenantId) -> u64 {
        let mut removed = self.local.remove_tenant(tenant);
        let prefix = self.tenant_namespace(tenant);

        if let Some(route) = self.shared_route() {
            removed += self
                .guarded(
                    &route,
                    "delete_by_prefix",
                    route.provider.delete_by_prefix(&prefix),
                )
                .await
                .unwrap_or(0);
        }
        let dedicated = self.dedicated.get(tenant).map(|p| Arc::clone(p.value()));
        if let Some(provider) = dedicated {
            let route = Route {
                provider,
                dedicated: true,
            };
            removed += self
                .guarded(
                    &route,
                    "delete_by_prefix",
                    route.provider.delete_by_prefix(&prefix),
                )
                .await
                .unwrap_or(0);
        }

        info!(tenant = %tenant, removed, "Invalidated tenant cache");
        removed
    }

    /// Return the cached value, or compute, cache and return it
    ///
    /// Factory errors are returned as-is and nothing is cached.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        factory: F,
        options: CacheOptions,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(value) = self.get(key, options.clone()).await {
            return Ok(value);
        }
        let value = factory().await?;
        self.set(key, &value, options).await;
        Ok(value)
    }

    /// Drop every local entry
    pub fn clear_local(&self) -> u64 {
        self.local.clear()
    }

    /// Drop expired local entries
    pub fn purge_expired(&self) -> u64 {
        let purged = self.local.purge_expired(Instant::now());
        if purged > 0 {
            debug!(purged, "Purged expired local cache entries");
        }
        purged
    }

    /// Local footprint of `tenant`
    pub fn tenant_usage(&self, tenant: &TenantId) -> TenantCacheUsage {
        self.local.tenant_usage(tenant)
    }

    /// Point-in-time report
    pub fn metrics(&self) -> CacheMetricsSnapshot {
        let stats = self.local.stats();
        let mut metrics = self.metrics_lock().clone();
        apply_stats(&mut metrics, &stats);
        CacheMetricsSnapshot {
            hit_ratio: metrics.hit_ratio(),
            metrics,
            item_count: stats.item_count,
            capacity: self.local.capacity(),
            distributed_provider: self.distributed_provider_name().map(str::to_string),
            distributed_connected: self.is_distributed_available(),
            dedicated_connections: self.dedicated.len(),
        }
    }

    /// Refresh memory and distribution counters, probing the distributed
    /// tier if it is marked unavailable
    pub async fn refresh_metrics(&self) {
        let stats = self.local.stats();
        apply_stats(&mut self.metrics_lock(), &stats);
        debug!(
            items = stats.item_count,
            bytes = stats.memory_bytes,
            "Cache metrics refreshed"
        );

        if self.distributed.is_some() && !self.is_distributed_available() {
            self.probe_distributed().await;
        }
    }

    /// Ping the shared distributed tier and update its availability
    pub async fn probe_distributed(&self) -> bool {
        let Some(provider) = self.distributed.as_ref() else {
            return false;
        };
        let reachable = matches!(
            tokio::time::timeout(self.operation_timeout, provider.ping()).await,
            Ok(Ok(()))
        );
        let was_available = self.distributed_available.swap(reachable, Ordering::SeqCst);
        match (was_available, reachable) {
            (false, true) => info!(
                provider = provider.provider_name(),
                "Distributed cache restored"
            ),
            (true, false) => warn!(
                provider = provider.provider_name(),
                "Distributed cache unavailable, continuing local-only"
            ),
            _ => {}
        }
        reachable
    }

    /// Open a private distributed connection for `tenant`
    ///
    /// # Returns
    /// False if one was already open
    pub async fn provision_dedicated(&self, tenant: &TenantId) -> Result<bool> {
        if self.dedicated.contains_key(tenant) {
            return Ok(false);
        }
        let connector = self.connector.as_ref().ok_or_else(|| {
            Error::configuration("No connector configured for dedicated cache connections")
        })?;
        let provider =
            tokio::time::timeout(self.operation_timeout, connector.connect_dedicated(tenant))
                .await
                .map_err(|_| Error::timeout("connect_dedicated", self.timeout_ms()))??;

        let inserted = match self.dedicated.entry(tenant.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&provider));
                true
            }
        };
        if inserted {
            info!(
                tenant = %tenant,
                provider = provider.provider_name(),
                "Dedicated cache connection opened"
            );
        } else {
            close_quietly(provider.as_ref(), self.operation_timeout).await;
        }
        Ok(inserted)
    }

    /// Close the private connection of `tenant`
    pub async fn release_dedicated(&self, tenant: &TenantId) -> bool {
        let Some((_, provider)) = self.dedicated.remove(tenant) else {
            return false;
        };
        close_quietly(provider.as_ref(), self.operation_timeout).await;
        info!(tenant = %tenant, "Dedicated cache connection released");
        true
    }

    /// Whether `tenant` has a private connection open
    pub fn has_dedicated(&self, tenant: &TenantId) -> bool {
        self.dedicated.contains_key(tenant)
    }

    /// Open private connections
    pub fn dedicated_count(&self) -> usize {
        self.dedicated.len()
    }

    /// Close the shared and every dedicated distributed connection
    pub async fn close(&self) {
        let dedicated: Vec<Arc<dyn DistributedCacheProvider>> = self
            .dedicated
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        self.dedicated.clear();
        for provider in dedicated {
            close_quietly(provider.as_ref(), self.operation_timeout).await;
        }

        if let Some(provider) = self.distributed.as_ref() {
            self.distributed_available.store(false, Ordering::SeqCst);
            close_quietly(provider.as_ref(), self.operation_timeout).await;
            info!(provider = provider.provider_name(), "Distributed cache closed");
        }
    }
}

fn apply_stats(metrics: &mut CacheMetrics, stats: &LocalStats) {
    metrics.memory_usage_bytes = stats.memory_bytes;
    metrics.tenant_distribution = stats.tenant_distribution.clone();
}

async fn close_quietly(provider: &dyn DistributedCacheProvider, timeout: Duration) {
    match tokio::time::timeout(timeout, provider.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(
            provider = provider.provider_name(),
            error = %e,
            "Failed to close cache connection"
        ),
        Err(_) => warn!(
            provider = provider.provider_name(),
            "Timed out closing cache connection"
        ),
    }
}
