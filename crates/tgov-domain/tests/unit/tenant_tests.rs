//! Unit tests for tenant value objects

use tgov_domain::value_objects::{
    IsolationLevel, LimitsUpdate, ServiceTier, TenantConfig, TenantId, TenantResourceLimits,
};

#[test]
fn test_tenant_id_accepts_valid_identifiers() {
    for id in ["acme", "tenant-1", "org_42", "a.b.c", "A"] {
        let parsed = TenantId::parse(id).expect("valid id");
        assert_eq!(parsed.as_str(), id);
    }
}

#[test]
fn test_tenant_id_rejects_invalid_identifiers() {
    let too_long = "x".repeat(129);
    for id in ["", "a:b", "a*", "with space", "ten?nt", "[x]", too_long.as_str()] {
        assert!(TenantId::parse(id).is_err(), "{id:?} should be rejected");
    }
}

#[test]
fn test_tenant_id_max_length_is_inclusive() {
    let id = "x".repeat(128);
    assert!(TenantId::parse(&id).is_ok());
}

#[test]
fn test_global_tenant() {
    let global = TenantId::global();
    assert!(global.is_global());
    assert_eq!(global.to_string(), "global");
    assert!(!TenantId::parse("acme").unwrap().is_global());
}

#[test]
fn test_tenant_id_serde_validates() {
    let id: TenantId = serde_json::from_str("\"acme\"").unwrap();
    assert_eq!(id.as_str(), "acme");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"acme\"");

    let bad: Result<TenantId, _> = serde_json::from_str("\"a:b\"");
    assert!(bad.is_err());
}

#[test]
fn test_service_tier_parsing() {
    assert_eq!("free".parse::<ServiceTier>().unwrap(), ServiceTier::Free);
    assert_eq!("PRO".parse::<ServiceTier>().unwrap(), ServiceTier::Professional);
    assert_eq!(
        "Enterprise".parse::<ServiceTier>().unwrap(),
        ServiceTier::Enterprise
    );
    assert!("platinum".parse::<ServiceTier>().is_err());
}

#[test]
fn test_isolation_derived_from_tier() {
    assert_eq!(ServiceTier::Free.isolation_level(), IsolationLevel::Shared);
    assert_eq!(
        ServiceTier::Professional.isolation_level(),
        IsolationLevel::Hybrid
    );
    assert_eq!(
        ServiceTier::Enterprise.isolation_level(),
        IsolationLevel::Dedicated
    );
    assert!(IsolationLevel::Dedicated.requires_dedicated_connection());
    assert!(!IsolationLevel::Hybrid.requires_dedicated_connection());
}

#[test]
fn test_tier_profiles() {
    let free = TenantResourceLimits::for_tier(ServiceTier::Free);
    assert_eq!(free.max_requests_per_minute, 100);
    assert_eq!(free.max_connections, 10);
    assert_eq!(free.cache_quota_mb, 50);

    let pro = TenantResourceLimits::for_tier(ServiceTier::Professional);
    assert_eq!(pro.max_api_calls_per_day, 50_000);
    assert_eq!(pro.query_timeout_secs, 60);

    let enterprise = TenantResourceLimits::for_tier(ServiceTier::Enterprise);
    assert_eq!(enterprise.max_connections, 100);
    assert_eq!(enterprise.max_storage_mb, 102_400);
}

#[test]
fn test_tenant_config_new_uses_profile() {
    let config = TenantConfig::new(
        TenantId::parse("acme").unwrap(),
        ServiceTier::Enterprise,
        None,
    );
    assert_eq!(config.isolation_level, IsolationLevel::Dedicated);
    assert_eq!(config.resource_limits.max_connections, 100);
    assert!(!config.custom_limits);
    assert!(config.enabled);
}

#[test]
fn test_tenant_config_custom_limits_keep_tier_isolation() {
    let mut limits = TenantResourceLimits::for_tier(ServiceTier::Free);
    limits.max_requests_per_minute = 7;
    let config = TenantConfig::new(
        TenantId::parse("acme").unwrap(),
        ServiceTier::Free,
        Some(limits),
    );
    assert_eq!(config.isolation_level, IsolationLevel::Shared);
    assert_eq!(config.resource_limits.max_requests_per_minute, 7);
    assert!(config.custom_limits);
}

#[test]
fn test_change_tier_rederives_everything() {
    let mut config = TenantConfig::new(TenantId::parse("acme").unwrap(), ServiceTier::Free, None);
    config.apply_limits(&LimitsUpdate {
        max_connections: Some(3),
        ..Default::default()
    });
    config.change_tier(ServiceTier::Professional);

    assert_eq!(config.tier, ServiceTier::Professional);
    assert_eq!(config.isolation_level, IsolationLevel::Hybrid);
    assert_eq!(config.resource_limits.max_connections, 50);
    assert!(!config.custom_limits);
}

#[test]
fn test_limits_update_applies_only_set_fields() {
    let base = TenantResourceLimits::for_tier(ServiceTier::Professional);
    let update = LimitsUpdate {
        max_memory_mb: Some(4096),
        query_timeout_secs: Some(90),
        ..Default::default()
    };
    let updated = base.with_update(&update);

    assert_eq!(updated.max_memory_mb, 4096);
    assert_eq!(updated.query_timeout_secs, 90);
    assert_eq!(updated.max_connections, base.max_connections);
    assert_eq!(updated.cache_quota_mb, base.cache_quota_mb);
}

#[test]
fn test_limits_update_is_empty() {
    assert!(LimitsUpdate::default().is_empty());
    assert!(
        !LimitsUpdate {
            cache_quota_mb: Some(1),
            ..Default::default()
        }
        .is_empty()
    );
}
