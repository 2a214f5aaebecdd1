//! Task-scoped current tenant
//!
//! Request middleware runs handlers inside [`TenantContext::scope`]; cache
//! calls without an explicit tenant pick the scoped one up.

use std::future::Future;
use tgov_domain::value_objects::TenantId;

tokio::task_local! {
    static CURRENT_TENANT: TenantId;
}

/// Accessor for the tenant bound to the running task
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantContext;

impl TenantContext {
    /// Run `future` with `tenant` as the current tenant
    pub async fn scope<F>(tenant: TenantId, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_TENANT.scope(tenant, future).await
    }

    /// Run a synchronous closure with `tenant` as the current tenant
    pub fn sync_scope<R>(tenant: TenantId, f: impl FnOnce() -> R) -> R {
        CURRENT_TENANT.sync_scope(tenant, f)
    }

    /// Tenant bound to the running task, if any
    pub fn current() -> Option<TenantId> {
        CURRENT_TENANT.try_with(TenantId::clone).ok()
    }
}
