//! Tenant Resource Governor Tests

use crate::test_utils::doubles::{FailingSampler, RecordingConnector, ScriptedProvider};
use crate::test_utils::{governor, governor_with, local_engine, tenant};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tgov_domain::constants::THROTTLE_POLICY_KEY;
use tgov_domain::ports::infrastructure::UsageSampler;
use tgov_domain::value_objects::{
    CacheOptions, IsolationLevel, LimitDimension, LimitsUpdate, ServiceTier, ThrottleState,
    ViolationSeverity,
};
use tgov_infrastructure::cache::CacheEngine;
use tgov_infrastructure::config::{CacheConfig, GovernorConfig};
use tgov_infrastructure::tenant::TenantResourceGovernor;

fn dedicated_engine() -> (CacheEngine, Arc<RecordingConnector>) {
    let connector = RecordingConnector::new();
    let engine = CacheEngine::new(&CacheConfig::default())
        .with_distributed(ScriptedProvider::healthy())
        .with_connector(connector.clone());
    (engine, connector)
}

#[tokio::test]
async fn test_create_tenant_derives_tier_settings() {
    let (governor, _) = governor();

    assert!(governor.create_tenant("acme", ServiceTier::Free, None).await);
    assert!(governor.create_tenant("pro", ServiceTier::Professional, None).await);
    assert!(governor.create_tenant("big", ServiceTier::Enterprise, None).await);

    let free = governor.tenant_config(&tenant("acme")).unwrap();
    assert_eq!(free.isolation_level, IsolationLevel::Shared);
    assert_eq!(free.resource_limits.max_requests_per_minute, 100);
    assert!(!free.custom_limits);
    assert!(free.enabled);

    let pro = governor.tenant_config(&tenant("pro")).unwrap();
    assert_eq!(pro.isolation_level, IsolationLevel::Hybrid);
    assert_eq!(pro.resource_limits.max_connections, 50);

    let big = governor.tenant_config(&tenant("big")).unwrap();
    assert_eq!(big.isolation_level, IsolationLevel::Dedicated);
    assert_eq!(big.resource_limits.max_api_calls_per_day, 1_000_000);
    assert_eq!(governor.tenant_count(), 3);
}

#[tokio::test]
async fn test_create_tenant_with_custom_limits_keeps_isolation() {
    let (governor, _) = governor();
    let mut limits = ServiceTier::Free.profile();
    limits.max_requests_per_minute = 5_000;

    assert!(governor.create_tenant("acme", ServiceTier::Free, Some(limits)).await);
    let config = governor.tenant_config(&tenant("acme")).unwrap();
    assert!(config.custom_limits);
    assert_eq!(config.resource_limits.max_requests_per_minute, 5_000);
    assert_eq!(config.isolation_level, IsolationLevel::Shared);
}

#[tokio::test]
async fn test_create_tenant_rejects_duplicates_and_bad_ids() {
    let (governor, _) = governor();

    assert!(governor.create_tenant("acme", ServiceTier::Free, None).await);
    assert!(!governor.create_tenant("acme", ServiceTier::Enterprise, None).await);
    assert!(!governor.create_tenant("", ServiceTier::Free, None).await);
    assert!(!governor.create_tenant("bad:id", ServiceTier::Free, None).await);
    assert!(!governor.create_tenant("global", ServiceTier::Free, None).await);

    assert_eq!(governor.tenant_count(), 1);
    let config = governor.tenant_config(&tenant("acme")).unwrap();
    assert_eq!(config.tier, ServiceTier::Free);
}

#[tokio::test(start_paused = true)]
async fn test_free_tier_violation_writes_high_policy() {
    let (governor, usage) = governor();
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    usage.record_requests(&acme, 150);
    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.tenants_checked, 1);
    assert_eq!(report.throttled, 1);
    assert_eq!(report.violations, 1);

    let policy = governor.throttle_policy(&acme).await.unwrap();
    assert_eq!(policy.delay_ms, 1_000);
    assert!((policy.rejection_rate - 0.5).abs() < f64::EPSILON);
    assert_eq!(policy.severity, ViolationSeverity::High);
    assert_eq!(policy.violations, vec![LimitDimension::RequestsPerMinute]);

    let metrics = governor.tenant_metrics(&acme).unwrap();
    assert_eq!(metrics.throttle_state, ThrottleState::Throttled);
    assert_eq!(metrics.requests_per_minute, 150);
    assert!(metrics.performance_score < 100.0);

    // Requests age out of the window and no new policy is written
    tokio::time::advance(Duration::from_secs(61)).await;
    governor
        .cache()
        .delete(THROTTLE_POLICY_KEY, CacheOptions::for_tenant(&acme))
        .await;
    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.throttled, 0);
    assert!(governor.throttle_policy(&acme).await.is_none());
    let metrics = governor.tenant_metrics(&acme).unwrap();
    assert_eq!(metrics.throttle_state, ThrottleState::Normal);
    assert_eq!(metrics.requests_per_minute, 0);
}

#[tokio::test]
async fn test_professional_violation_writes_medium_policy() {
    let (governor, usage) = governor();
    let pro = tenant("pro");
    governor.create_tenant("pro", ServiceTier::Professional, None).await;

    usage.record_requests(&pro, 1_001);
    governor.run_monitoring_cycle().await;

    let policy = governor.throttle_policy(&pro).await.unwrap();
    assert_eq!(policy.delay_ms, 500);
    assert!((policy.rejection_rate - 0.2).abs() < f64::EPSILON);
    assert_eq!(policy.severity, ViolationSeverity::Medium);
}

#[tokio::test]
async fn test_enterprise_violation_only_warns() {
    let (governor, usage) = governor();
    let big = tenant("big");
    governor.create_tenant("big", ServiceTier::Enterprise, None).await;

    usage.record_requests(&big, 10_001);
    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.warned, 1);
    assert_eq!(report.throttled, 0);
    assert!(governor.throttle_policy(&big).await.is_none());

    let metrics = governor.tenant_metrics(&big).unwrap();
    assert_eq!(metrics.throttle_state, ThrottleState::Warned);
    assert_eq!(metrics.violations.len(), 1);
}

#[tokio::test]
async fn test_usage_near_limits_warns_without_policy() {
    let (governor, usage) = governor();
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    usage.record_requests(&acme, 90);
    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.warned, 1);
    assert_eq!(report.violations, 0);
    assert!(governor.throttle_policy(&acme).await.is_none());

    let metrics = governor.tenant_metrics(&acme).unwrap();
    assert_eq!(metrics.throttle_state, ThrottleState::Warned);
    assert!((metrics.performance_score - 90.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_policy_write_failure_leaves_tenant_warned() {
    let disabled = CacheEngine::new(&CacheConfig {
        enabled: false,
        ..Default::default()
    });
    let (governor, usage) = governor_with(disabled);
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    usage.record_requests(&acme, 150);
    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.throttled, 0);
    assert_eq!(report.warned, 1);
    assert_eq!(
        governor.tenant_metrics(&acme).unwrap().throttle_state,
        ThrottleState::Warned
    );
}

#[tokio::test]
async fn test_idle_tenant_gets_no_metrics() {
    let (governor, _) = governor();
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.tenants_checked, 0);
    assert!(governor.tenant_metrics(&tenant("acme")).is_none());
}

#[tokio::test]
async fn test_disabled_tenant_is_not_monitored() {
    let (governor, usage) = governor();
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;
    assert!(governor.set_tenant_enabled(&acme, false).await);
    assert!(!governor.set_tenant_enabled(&tenant("ghost"), false).await);

    usage.record_requests(&acme, 150);
    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.tenants_checked, 0);
    assert!(governor.throttle_policy(&acme).await.is_none());
    assert!(!governor.tenant_config(&acme).unwrap().enabled);
}

#[tokio::test]
async fn test_sample_failure_is_counted() {
    let governor = TenantResourceGovernor::new(
        GovernorConfig::default(),
        Arc::new(local_engine()),
        Arc::new(FailingSampler),
    );
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    let report = governor.run_monitoring_cycle().await;
    assert_eq!(report.sample_failures, 1);
    assert_eq!(report.tenants_checked, 0);
}

#[tokio::test]
async fn test_update_tenant_limits() {
    let (governor, _) = governor();
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    assert!(
        governor
            .update_tenant_limits(&acme, LimitsUpdate::default())
            .is_err()
    );

    let update = LimitsUpdate {
        max_requests_per_minute: Some(500),
        ..Default::default()
    };
    assert!(!governor
        .update_tenant_limits(&tenant("ghost"), update)
        .unwrap());
    assert!(governor.update_tenant_limits(&acme, update).unwrap());

    let config = governor.tenant_config(&acme).unwrap();
    assert!(config.custom_limits);
    assert_eq!(config.resource_limits.max_requests_per_minute, 500);
    assert_eq!(config.resource_limits.max_connections, 10);
}

#[tokio::test]
async fn test_tier_change_manages_dedicated_connection() {
    let (engine, connector) = dedicated_engine();
    let (governor, _) = governor_with(engine);
    let big = tenant("big");

    governor.create_tenant("big", ServiceTier::Enterprise, None).await;
    assert!(governor.cache().has_dedicated(&big));
    assert_eq!(connector.opened(), 1);

    assert!(governor.update_tenant_tier(&big, ServiceTier::Free).await);
    assert!(!governor.cache().has_dedicated(&big));
    let config = governor.tenant_config(&big).unwrap();
    assert_eq!(config.isolation_level, IsolationLevel::Shared);
    assert_eq!(config.resource_limits.max_requests_per_minute, 100);

    assert!(governor.update_tenant_tier(&big, ServiceTier::Enterprise).await);
    assert!(governor.cache().has_dedicated(&big));
    assert_eq!(connector.opened(), 2);

    assert!(!governor.update_tenant_tier(&tenant("ghost"), ServiceTier::Free).await);
}

#[tokio::test]
async fn test_disabling_tenant_releases_dedicated_connection() {
    let (engine, _) = dedicated_engine();
    let (governor, _) = governor_with(engine);
    let big = tenant("big");

    governor.create_tenant("big", ServiceTier::Enterprise, None).await;
    governor.set_tenant_enabled(&big, false).await;
    assert!(!governor.cache().has_dedicated(&big));
}

#[tokio::test]
async fn test_refused_connection_still_creates_tenant() {
    let engine = CacheEngine::new(&CacheConfig::default())
        .with_distributed(ScriptedProvider::healthy())
        .with_connector(RecordingConnector::refusing());
    let (governor, _) = governor_with(engine);

    assert!(governor.create_tenant("big", ServiceTier::Enterprise, None).await);
    assert!(!governor.cache().has_dedicated(&tenant("big")));
}

#[tokio::test]
async fn test_sweep_reclaims_inactive_tenants() {
    let (engine, _) = dedicated_engine();
    let (governor, usage) = governor_with(engine);
    let big = tenant("big");
    governor.create_tenant("big", ServiceTier::Enterprise, None).await;

    usage.record_request(&big);
    governor.run_monitoring_cycle().await;
    governor
        .cache()
        .set("report", "cached", CacheOptions::for_tenant(&big))
        .await;
    assert!(governor.tenant_metrics(&big).is_some());

    assert!(governor.sweep_inactive(Utc::now()).await.is_empty());

    let later = Utc::now() + chrono::Duration::hours(25);
    let reclaimed = governor.sweep_inactive(later).await;
    assert_eq!(reclaimed, vec![big.clone()]);
    assert!(governor.tenant_metrics(&big).is_none());
    assert!(governor.tenant_config(&big).is_some());
    assert!(!governor.cache().has_dedicated(&big));
    assert_eq!(governor.cache().tenant_usage(&big).item_count, 0);
    assert_eq!(usage.tracked_tenants(), 0);
}

#[tokio::test]
async fn test_sweep_releases_never_active_dedicated_tenant() {
    let (engine, _) = dedicated_engine();
    let (governor, _) = governor_with(engine);
    let big = tenant("big");
    governor.create_tenant("big", ServiceTier::Enterprise, None).await;

    let later = Utc::now() + chrono::Duration::hours(25);
    assert_eq!(governor.sweep_inactive(later).await, vec![big.clone()]);
    assert!(!governor.cache().has_dedicated(&big));
}

#[tokio::test]
async fn test_sweep_drops_usage_of_unregistered_tenants() {
    let (governor, usage) = governor();
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;

    usage.record_request(&acme);
    usage.record_requests(&tenant("stranger"), 5);
    assert_eq!(usage.tracked_tenants(), 2);

    assert!(governor.sweep_inactive(Utc::now()).await.is_empty());
    assert_eq!(usage.tracked_tenants(), 1);
    assert_eq!(usage.sample(&acme).await.unwrap().requests_per_minute, 1);
}

#[tokio::test]
async fn test_monitoring_reprovisions_dedicated_connection() {
    let (engine, connector) = dedicated_engine();
    let (governor, usage) = governor_with(engine);
    let big = tenant("big");
    governor.create_tenant("big", ServiceTier::Enterprise, None).await;
    governor.cache().release_dedicated(&big).await;

    usage.record_request(&big);
    governor.run_monitoring_cycle().await;
    assert!(governor.cache().has_dedicated(&big));
    assert_eq!(connector.opened(), 2);
}

#[tokio::test]
async fn test_tenant_status_and_overview() {
    let (governor, usage) = governor();
    let acme = tenant("acme");
    governor.create_tenant("acme", ServiceTier::Free, None).await;
    governor.create_tenant("pro", ServiceTier::Professional, None).await;
    governor.create_tenant("big", ServiceTier::Enterprise, None).await;
    governor.set_tenant_enabled(&tenant("pro"), false).await;

    usage.record_requests(&acme, 150);
    governor.run_monitoring_cycle().await;

    let status = governor.get_tenant_status(&acme).await.unwrap();
    assert_eq!(status.namespace, "tgov:tenant:acme:");
    assert!(status.throttle_policy.is_some());
    assert!(!status.dedicated_connection);
    assert!(governor.get_tenant_status(&tenant("ghost")).await.is_none());

    let overview = governor.get_all_tenants_status().await;
    assert_eq!(overview.total_tenants, 3);
    assert_eq!(overview.enabled_tenants, 2);
    assert_eq!(overview.active_last_24h, 1);
    assert_eq!(overview.throttled_tenants, 1);
    assert_eq!(overview.by_tier.get(&ServiceTier::Free), Some(&1));
    assert_eq!(overview.by_isolation.get(&IsolationLevel::Dedicated), Some(&1));

    let ids: Vec<&str> = overview
        .tenants
        .iter()
        .map(|status| status.config.tenant_id.as_str())
        .collect();
    assert_eq!(ids, vec!["acme", "big", "pro"]);
    assert_eq!(governor.cache().metrics().metrics.lookups(), 0);
}
