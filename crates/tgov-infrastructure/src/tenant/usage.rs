//! In-process usage recording
//!
//! [`UsageRecorder`] collects per-tenant counters from request-handling code
//! and serves them to the governor through the [`UsageSampler`] port.

use crate::constants::{USAGE_REQUEST_BUCKET_MS, USAGE_REQUEST_WINDOW_SECS};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::Duration;
use tgov_domain::error::Result;
use tgov_domain::ports::infrastructure::UsageSampler;
use tgov_domain::value_objects::{TenantId, UsageSample};
use tokio::time::Instant;

#[derive(Debug, Default)]
struct TenantUsage {
    /// Request counts keyed by bucket start, oldest first
    request_buckets: VecDeque<(Instant, u64)>,
    requests_in_window: u64,
    api_calls_today: u64,
    api_day: Option<NaiveDate>,
    active_connections: u32,
    concurrent_sessions: u32,
    memory_usage_mb: f64,
    storage_usage_mb: f64,
    last_activity: Option<DateTime<Utc>>,
}

impl TenantUsage {
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&(start, count)) = self.request_buckets.front() {
            if now.duration_since(start) < window {
                break;
            }
            self.request_buckets.pop_front();
            self.requests_in_window = self.requests_in_window.saturating_sub(count);
        }
    }

    fn add_requests(&mut self, now: Instant, count: u64) {
        let bucket = Duration::from_millis(USAGE_REQUEST_BUCKET_MS);
        match self.request_buckets.back_mut() {
            Some((start, total)) if now.duration_since(*start) < bucket => {
                *total = total.saturating_add(count);
            }
            _ => self.request_buckets.push_back((now, count)),
        }
        self.requests_in_window = self.requests_in_window.saturating_add(count);
    }

    fn touch(&mut self) {
        self.last_activity = Some(Utc::now());
    }
}

/// Per-tenant usage counters
///
/// Requests per minute is a sliding window of one-second buckets; API calls
/// per day reset when the UTC date changes.
#[derive(Debug)]
pub struct UsageRecorder {
    tenants: DashMap<TenantId, TenantUsage>,
    request_window: Duration,
}

impl Default for UsageRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageRecorder {
    /// Recorder with a 60 second request window
    pub fn new() -> Self {
        Self::with_request_window(Duration::from_secs(USAGE_REQUEST_WINDOW_SECS))
    }

    /// Recorder with a custom request window
    pub fn with_request_window(request_window: Duration) -> Self {
        Self {
            tenants: DashMap::new(),
            request_window,
        }
    }

    /// Record one handled request
    pub fn record_request(&self, tenant: &TenantId) {
        self.record_requests(tenant, 1);
    }

    /// Record `count` handled requests
    pub fn record_requests(&self, tenant: &TenantId, count: u32) {
        let now = Instant::now();
        let window = self.request_window;
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.prune(now, window);
        usage.add_requests(now, u64::from(count));
        usage.touch();
    }

    /// Record one API call
    pub fn record_api_call(&self, tenant: &TenantId) {
        let today = Utc::now().date_naive();
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        if usage.api_day != Some(today) {
            usage.api_day = Some(today);
            usage.api_calls_today = 0;
        }
        usage.api_calls_today += 1;
        usage.touch();
    }

    /// A connection was opened
    pub fn connection_opened(&self, tenant: &TenantId) {
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.active_connections = usage.active_connections.saturating_add(1);
        usage.touch();
    }

    /// A connection was closed
    pub fn connection_closed(&self, tenant: &TenantId) {
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.active_connections = usage.active_connections.saturating_sub(1);
        usage.touch();
    }

    /// A session started
    pub fn session_started(&self, tenant: &TenantId) {
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.concurrent_sessions = usage.concurrent_sessions.saturating_add(1);
        usage.touch();
    }

    /// A session ended
    pub fn session_ended(&self, tenant: &TenantId) {
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.concurrent_sessions = usage.concurrent_sessions.saturating_sub(1);
        usage.touch();
    }

    /// Report current memory usage
    pub fn set_memory_usage_mb(&self, tenant: &TenantId, mb: f64) {
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.memory_usage_mb = mb.max(0.0);
        usage.touch();
    }

    /// Report current storage usage
    pub fn set_storage_usage_mb(&self, tenant: &TenantId, mb: f64) {
        let mut usage = self.tenants.entry(tenant.clone()).or_default();
        usage.storage_usage_mb = mb.max(0.0);
        usage.touch();
    }

    /// Number of tenants with recorded usage
    pub fn tracked_tenants(&self) -> usize {
        self.tenants.len()
    }

    fn snapshot(&self, tenant: &TenantId) -> UsageSample {
        let Some(mut usage) = self.tenants.get_mut(tenant) else {
            return UsageSample::default();
        };
        usage.prune(Instant::now(), self.request_window);
        let today = Utc::now().date_naive();
        let api_calls_today = if usage.api_day == Some(today) {
            usage.api_calls_today
        } else {
            0
        };
        UsageSample {
            active_connections: usage.active_connections,
            memory_usage_mb: usage.memory_usage_mb,
            storage_usage_mb: usage.storage_usage_mb,
            requests_per_minute: u32::try_from(usage.requests_in_window).unwrap_or(u32::MAX),
            concurrent_sessions: usage.concurrent_sessions,
            api_calls_today,
            cache_usage_mb: 0.0,
            last_activity: usage.last_activity,
        }
    }
}

#[async_trait]
impl UsageSampler for UsageRecorder {
    async fn sample(&self, tenant: &TenantId) -> Result<UsageSample> {
        Ok(self.snapshot(tenant))
    }

    async fn forget(&self, tenant: &TenantId) {
        self.tenants.remove(tenant);
    }

    async fn known_tenants(&self) -> Vec<TenantId> {
        self.tenants.iter().map(|entry| entry.key().clone()).collect()
    }
}
