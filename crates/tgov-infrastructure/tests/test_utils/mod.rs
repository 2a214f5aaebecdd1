//! Shared helpers for the infrastructure test suite

#![allow(dead_code)]


use std::sync::Arc;
use tgov_domain::ports::infrastructure::UsageSampler;
use tgov_domain::value_objects::TenantId;
use tgov_infrastructure::cache::CacheEngine;
use tgov_infrastructure::config::{CacheConfig, GovernorConfig};
use tgov_infrastructure::tenant::{TenantResourceGovernor, UsageRecorder};

pub fn tenant(id: &str) -> TenantId {
    TenantId::parse(id).unwrap()
}

pub fn cache_config(max_local_items: usize) -> CacheConfig {
    CacheConfig {
        max_local_items,
        ..Default::default()
    }
}

pub fn local_engine() -> CacheEngine {
    CacheEngine::new(&CacheConfig::default())
}

/// Governor over a local-only cache fed by an in-process recorder
pub fn governor_with(cache: CacheEngine) -> (Arc<TenantResourceGovernor>, Arc<UsageRecorder>) {
    let usage = Arc::new(UsageRecorder::new());
    let sampler: Arc<dyn UsageSampler> = usage.clone();
    let governor = Arc::new(TenantResourceGovernor::new(
        GovernorConfig::default(),
        Arc::new(cache),
        sampler,
    ));
    (governor, usage)
}

pub fn governor() -> (Arc<TenantResourceGovernor>, Arc<UsageRecorder>) {
    governor_with(local_engine())
}
