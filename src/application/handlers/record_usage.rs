//! RecordUsageHandler - commits one unit of metered usage.
//!
//! The quota re-check lives in the store's conditional increment, so two
//! concurrent callers who both passed validation cannot both land past
//! the limit. A `false` return means the caller lost that race (or the
//! entitlements changed since validation) and must not perform the action.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entitlement::EntitlementResolver;
use crate::domain::foundation::{ErrorCode, MonthKey, TenantId, Timestamp};
use crate::domain::tenant::TenantError;
use crate::ports::TenantStore;

/// Command to record one created service against the monthly quota.
#[derive(Debug, Clone)]
pub struct RecordUsageCommand {
    pub tenant_id: TenantId,
}

/// Handler for committing metered usage.
pub struct RecordUsageHandler {
    store: Arc<dyn TenantStore>,
    resolver: EntitlementResolver,
}

impl RecordUsageHandler {
    pub fn new(store: Arc<dyn TenantStore>, resolver: EntitlementResolver) -> Self {
        Self { store, resolver }
    }

    /// Increments the tenant's current-month service counter.
    ///
    /// Returns `Ok(true)` when the unit was admitted and `Ok(false)` when
    /// the quota (or the tenant's entitlements) no longer allow it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown tenants, `PlanNotConfigured` for an
    /// active tenant whose plan is missing from the catalog, and
    /// `Infrastructure` for storage failures.
    pub async fn handle(&self, command: RecordUsageCommand) -> Result<bool, TenantError> {
        let now = Timestamp::now();

        let tenant = self
            .store
            .get(&command.tenant_id)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?
            .ok_or_else(|| TenantError::not_found(command.tenant_id))?;

        let limits = self
            .resolver
            .resolve(&tenant, now)
            .map_err(|e| match (e.code, tenant.plan_id.clone()) {
                (ErrorCode::PlanNotConfigured, Some(plan_id)) => {
                    TenantError::plan_not_configured(plan_id)
                }
                _ => TenantError::from(e),
            })?;
        if !limits.can_add_services {
            debug!(
                tenant_id = %command.tenant_id,
                plan = %limits.plan_name,
                "usage increment refused before storage"
            );
            return Ok(false);
        }

        let month = MonthKey::from_timestamp(&now);
        let admitted = self
            .store
            .increment_usage(&command.tenant_id, month, limits.max_services)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        if !admitted {
            debug!(
                tenant_id = %command.tenant_id,
                month = %month,
                "usage increment lost the quota race"
            );
        }

        Ok(admitted)
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

    fn handler(store: Arc<InMemoryTenantStore>) -> RecordUsageHandler {
        let resolver =
            EntitlementResolver::new(Arc::new(PlanCatalog::standard()), TrialPolicy::default());
        RecordUsageHandler::new(store, resolver)
    }

    fn trial_tenant(now: Timestamp) -> Tenant {
        Tenant::create_trial(TenantId::new(), "Lubri Sur", now, 7)
    }

    #[tokio::test]
    async fn admits_until_trial_quota_then_refuses() {
        let now = Timestamp::now();
        let tenant = trial_tenant(now);
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));
        let handler = handler(Arc::clone(&store));

        for _ in 0..10 {
            assert!(handler
                .handle(RecordUsageCommand { tenant_id })
                .await
                .unwrap());
        }
        assert!(!handler
            .handle(RecordUsageCommand { tenant_id })
            .await
            .unwrap());

        let stored = store.get(&tenant_id).await.unwrap().unwrap();
        let month = MonthKey::from_timestamp(&Timestamp::now());
        assert_eq!(stored.services_used_in(month), 10);
    }

    #[tokio::test]
    async fn refuses_for_inactive_tenant_without_touching_counter() {
        let now = Timestamp::now();
        let mut tenant = trial_tenant(now);
        tenant.deactivate(
            crate::domain::tenant::DeactivationReason::ManualCancellation,
            now,
        );
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));
        let handler = handler(Arc::clone(&store));

        assert!(!handler
            .handle(RecordUsageCommand { tenant_id })
            .await
            .unwrap());

        let stored = store.get(&tenant_id).await.unwrap().unwrap();
        assert_eq!(stored.services_used_this_month, 0);
    }

    #[tokio::test]
    async fn unlimited_plan_admits_past_any_count() {
        let now = Timestamp::now();
        let mut tenant = trial_tenant(now);
        tenant
            .activate(PlanId::new("premium").unwrap(), RenewalType::Monthly, now)
            .unwrap();
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));
        let handler = handler(store);

        for _ in 0..200 {
            assert!(handler
                .handle(RecordUsageCommand { tenant_id })
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let store = Arc::new(InMemoryTenantStore::new());
        let handler = handler(store);

        let err = handler
            .handle(RecordUsageCommand {
                tenant_id: TenantId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TenantError::NotFound { .. }));
    }

    #[tokio::test]
    async fn concurrent_recorders_never_exceed_quota() {
        let now = Timestamp::now();
        let tenant = trial_tenant(now);
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));

        let mut handles = Vec::new();
        for _ in 0..25 {
            let handler = handler(Arc::clone(&store));
            handles.push(tokio::spawn(async move {
                handler.handle(RecordUsageCommand { tenant_id }).await.unwrap()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 10);
    }
}
