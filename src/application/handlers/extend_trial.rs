//! ExtendTrialHandler - grants more trial days.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{TenantId, Timestamp};
use crate::domain::tenant::{Tenant, TenantError};
use crate::ports::TenantStore;

/// Command to extend (or restore) a trial.
#[derive(Debug, Clone)]
pub struct ExtendTrialCommand {
    pub tenant_id: TenantId,
    pub additional_days: u32,
}

/// Handler for trial extension.
///
/// Works for running trials and for lapsed tenants being given another
/// chance; an expired trial extends from today, not from the old
/// deadline. Active tenants are rejected.
pub struct ExtendTrialHandler {
    store: Arc<dyn TenantStore>,
}

impl ExtendTrialHandler {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: ExtendTrialCommand) -> Result<Tenant, TenantError> {
        if command.additional_days == 0 {
            return Err(TenantError::validation(
                "additional_days",
                "must be at least 1",
            ));
        }

        let mut tenant = self
            .store
            .get(&command.tenant_id)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?
            .ok_or_else(|| TenantError::not_found(command.tenant_id))?;

        let now = Timestamp::now();
        tenant.extend_trial(command.additional_days, now)?;

        self.store
            .update(&tenant)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        info!(
            tenant_id = %tenant.id,
            additional_days = command.additional_days,
            "trial extended"
        );

        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTenantStore;
    use crate::domain::foundation::PlanId;
    use crate::domain::tenant::{RenewalType, TenantState};

    fn handler(store: Arc<InMemoryTenantStore>) -> ExtendTrialHandler {
        ExtendTrialHandler::new(store)
    }

    #[tokio::test]
    async fn extends_running_trial_past_current_deadline() {
        let now = Timestamp::now();
        let tenant = Tenant::create_trial(TenantId::new(), "Lubri 9 de Julio", now, 7);
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));

        let extended = handler(store)
            .handle(ExtendTrialCommand {
                tenant_id,
                additional_days: 7,
            })
            .await
            .unwrap();

        let days = extended.trial_days_remaining(Timestamp::now()).unwrap();
        assert!((13..=14).contains(&days), "got {} days", days);
    }

    #[tokio::test]
    async fn restores_lapsed_inactive_tenant_to_trial() {
        let now = Timestamp::now();
        let mut tenant = Tenant::create_trial(TenantId::new(), "Lubri 9 de Julio", now, 7);
        tenant.deactivate(
            crate::domain::tenant::DeactivationReason::SubscriptionExpired,
            now,
        );
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));

        let restored = handler(store)
            .handle(ExtendTrialCommand {
                tenant_id,
                additional_days: 5,
            })
            .await
            .unwrap();

        assert_eq!(restored.state, TenantState::Trial);
        assert!(restored.deactivation_reason.is_none());
        assert_eq!(restored.services_used_this_month, 0);
    }

    #[tokio::test]
    async fn rejects_active_tenant() {
        let now = Timestamp::now();
        let mut tenant = Tenant::create_trial(TenantId::new(), "Lubri 9 de Julio", now, 7);
        tenant
            .activate(PlanId::new("starter").unwrap(), RenewalType::Monthly, now)
            .unwrap();
        let tenant_id = tenant.id;
        let store = Arc::new(InMemoryTenantStore::with_tenants([tenant]));

        let err = handler(store)
            .handle(ExtendTrialCommand {
                tenant_id,
                additional_days: 7,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TenantError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn rejects_zero_days() {
        let store = Arc::new(InMemoryTenantStore::new());

        let err = handler(store)
            .handle(ExtendTrialCommand {
                tenant_id: TenantId::new(),
                additional_days: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TenantError::ValidationFailed { .. }));
    }
}
