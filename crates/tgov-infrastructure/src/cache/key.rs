//! Tenant-qualified cache keys
//!
//! Every key is stored as `{namespace}:tenant:{tenant_id}:{key}`.

use crate::tenant::TenantContext;
use tgov_domain::constants::{KEY_SEPARATOR, TENANT_KEY_SEGMENT};
use tgov_domain::value_objects::TenantId;

/// Prefix shared by every key of `tenant`
pub fn tenant_prefix(namespace: &str, tenant: &TenantId) -> String {
    format!(
        "{namespace}{sep}{TENANT_KEY_SEGMENT}{sep}{tenant}{sep}",
        sep = KEY_SEPARATOR
    )
}

/// Fully qualified key of `key` for `tenant`
pub fn qualified_key(namespace: &str, tenant: &TenantId, key: &str) -> String {
    let mut qualified = tenant_prefix(namespace, tenant);
    qualified.push_str(key);
    qualified
}

/// Tenant a cache call applies to: the explicit one, else the task-scoped
/// tenant, else the global tenant
pub fn resolve_tenant(explicit: Option<&TenantId>) -> TenantId {
    explicit
        .cloned()
        .or_else(TenantContext::current)
        .unwrap_or_else(TenantId::global)
}
