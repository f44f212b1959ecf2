//! ResolveLimitsHandler - query handler for a tenant's current limits.
//!
//! Read-only; dashboards call this to render quota meters and expiry
//! banners without going through a full action validation.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementResolver, SubscriptionLimits};
use crate::domain::foundation::{TenantId, Timestamp};
use crate::domain::tenant::TenantError;
use crate::ports::TenantStore;

/// Query for a tenant's resolved subscription limits.
#[derive(Debug, Clone)]
pub struct ResolveLimitsQuery {
    pub tenant_id: TenantId,
}

/// Handler resolving a tenant's entitlements snapshot.
pub struct ResolveLimitsHandler {
    store: Arc<dyn TenantStore>,
    resolver: EntitlementResolver,
}

impl ResolveLimitsHandler {
    pub fn new(store: Arc<dyn TenantStore>, resolver: EntitlementResolver) -> Self {
        Self { store, resolver }
    }

    pub async fn handle(
        &self,
        query: ResolveLimitsQuery,
    ) -> Result<SubscriptionLimits, TenantError> {
        let tenant = self
            .store
            .get(&query.tenant_id)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?
            .ok_or_else(|| TenantError::not_found(query.tenant_id))?;

        let limits = self.resolver.resolve(&tenant, Timestamp::now())?;
        Ok(limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTenantStore;
    use crate::domain::entitlement::TrialPolicy;
    use crate::domain::foundation::PlanId;
    use crate::domain::plan::PlanCatalog;
    use crate::domain::tenant::{RenewalType, Tenant};

    fn handler(store: Arc<InMemoryTenantStore>) -> ResolveLimitsHandler {
        let resolver =
            EntitlementResolver::new(Arc::new(PlanCatalog::standard()), TrialPolicy::default());
        ResolveLimitsHandler::new(store, resolver)
    }

    #[tokio::test]
    async fn resolves_trial_limits() {
        let now = Timestamp::now();
        let tenant = Tenant::create_trial(TenantId::new(), "Lubri Centro", now, 7);
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));

        let limits = handler(store)
            .handle(ResolveLimitsQuery { tenant_id })
            .await
            .unwrap();

        assert_eq!(limits.plan_name, "Trial");
        assert_eq!(limits.max_services, Some(10));
        assert!(limits.can_add_services);
    }

    #[tokio::test]
    async fn resolves_active_plan_limits() {
        let now = Timestamp::now();
        let mut tenant = Tenant::create_trial(TenantId::new(), "Lubri Centro", now, 7);
        tenant
            .activate(PlanId::new("plus").unwrap(), RenewalType::Monthly, now)
            .unwrap();
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));

        let limits = handler(store)
            .handle(ResolveLimitsQuery { tenant_id })
            .await
            .unwrap();

        assert_eq!(limits.plan_name, "Plus");
        assert_eq!(limits.max_users, 5);
        assert_eq!(limits.max_services, Some(150));
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let store = Arc::new(InMemoryTenantStore::new());

        let err = handler(store)
            .handle(ResolveLimitsQuery {
                tenant_id: TenantId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TenantError::NotFound(_)));
    }
}
