//! Tenant Context Tests

use crate::test_utils::tenant;
use tgov_infrastructure::TenantContext;
use tgov_infrastructure::cache::resolve_tenant;
use tgov_domain::value_objects::TenantId;

#[tokio::test]
async fn test_no_tenant_outside_scope() {
    assert!(TenantContext::current().is_none());
    assert_eq!(resolve_tenant(None), TenantId::global());
}

#[tokio::test]
async fn test_scope_sets_current_tenant() {
    let acme = tenant("acme");
    let seen = TenantContext::scope(acme.clone(), async { TenantContext::current() }).await;
    assert_eq!(seen, Some(acme));
    assert!(TenantContext::current().is_none());
}

#[tokio::test]
async fn test_explicit_tenant_wins_over_scope() {
    let resolved = TenantContext::scope(tenant("acme"), async {
        resolve_tenant(Some(&tenant("other")))
    })
    .await;
    assert_eq!(resolved, tenant("other"));
}

#[tokio::test]
async fn test_nested_scopes_restore_outer_tenant() {
    TenantContext::scope(tenant("outer"), async {
        let inner = TenantContext::scope(tenant("inner"), async { TenantContext::current() }).await;
        assert_eq!(inner, Some(tenant("inner")));
        assert_eq!(TenantContext::current(), Some(tenant("outer")));
    })
    .await;
}

#[tokio::test]
async fn test_spawned_task_does_not_inherit_tenant() {
    let seen = TenantContext::scope(tenant("acme"), async {
        tokio::spawn(async { TenantContext::current() }).await.unwrap()
    })
    .await;
    assert!(seen.is_none());
}

#[test]
fn test_sync_scope() {
    let seen = TenantContext::sync_scope(tenant("acme"), TenantContext::current);
    assert_eq!(seen, Some(tenant("acme")));
    assert!(TenantContext::current().is_none());
}
