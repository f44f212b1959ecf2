//! DeactivateSubscriptionHandler - takes a tenant out of service.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{TenantId, Timestamp};
use crate::domain::tenant::{DeactivationReason, Tenant, TenantError};
use crate::ports::TenantStore;

/// Command to deactivate a tenant.
#[derive(Debug, Clone)]
pub struct DeactivateSubscriptionCommand {
    pub tenant_id: TenantId,
    pub reason: DeactivationReason,
}

/// Handler for deactivation. Idempotent: deactivating an already
/// inactive tenant records the new reason and succeeds.
pub struct DeactivateSubscriptionHandler {
    store: Arc<dyn TenantStore>,
}

impl DeactivateSubscriptionHandler {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        command: DeactivateSubscriptionCommand,
    ) -> Result<Tenant, TenantError> {
        let mut tenant = self
            .store
            .get(&command.tenant_id)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?
            .ok_or_else(|| TenantError::not_found(command.tenant_id))?;

        tenant.deactivate(command.reason, Timestamp::now());

        self.store
            .update(&tenant)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        info!(
            tenant_id = %tenant.id,
            reason = ?command.reason,
            "subscription deactivated"
        );

        Ok(tenant)
    }
}
