//! ActivateSubscriptionHandler - puts a tenant on a paid plan.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{PlanId, TenantId, Timestamp};
use crate::domain::plan::PlanCatalog;
use crate::domain::tenant::{RenewalType, Tenant, TenantError};
use crate::ports::TenantStore;

/// Command to activate (or re-activate) a subscription.
#[derive(Debug, Clone)]
pub struct ActivateSubscriptionCommand {
    pub tenant_id: TenantId,
    pub plan_id: PlanId,
    pub renewal: RenewalType,
}

/// Handler for subscription activation.
///
/// Valid from any state: trial conversion, upgrade/downgrade of an
/// already-active tenant, and reactivation after a lapse all go through
/// here. Activation resets the monthly usage counter.
pub struct ActivateSubscriptionHandler {
    store: Arc<dyn TenantStore>,
    catalog: Arc<PlanCatalog>,
}

impl ActivateSubscriptionHandler {
    pub fn new(store: Arc<dyn TenantStore>, catalog: Arc<PlanCatalog>) -> Self {
        Self { store, catalog }
    }

    pub async fn handle(
        &self,
        command: ActivateSubscriptionCommand,
    ) -> Result<Tenant, TenantError> {
        if !self.catalog.contains(&command.plan_id) {
            return Err(TenantError::plan_not_configured(command.plan_id));
        }

        let mut tenant = self
            .store
            .get(&command.tenant_id)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?
            .ok_or_else(|| TenantError::not_found(command.tenant_id))?;

        let now = Timestamp::now();
        tenant.activate(command.plan_id.clone(), command.renewal, now)?;

        self.store
            .update(&tenant)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        info!(
            tenant_id = %tenant.id,
            plan = command.plan_id.as_str(),
            renewal = ?command.renewal,
            "subscription activated"
        );

        Ok(tenant)
    }
}
