//! CreateTrialHandler - onboards a new tenant into a trial.

use std::sync::Arc;

use tracing::info;

use crate::domain::entitlement::TrialPolicy;
use crate::domain::foundation::{TenantId, Timestamp};
use crate::domain::tenant::{Tenant, TenantError};
use crate::ports::TenantStore;

/// Command to create a new trial tenant.
#[derive(Debug, Clone)]
pub struct CreateTrialCommand {
    pub name: String,
}

/// Handler for tenant onboarding.
pub struct CreateTrialHandler {
    store: Arc<dyn TenantStore>,
    trial: TrialPolicy,
}

impl CreateTrialHandler {
    pub fn new(store: Arc<dyn TenantStore>, trial: TrialPolicy) -> Self {
        Self { store, trial }
    }

    pub async fn handle(&self, command: CreateTrialCommand) -> Result<Tenant, TenantError> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(TenantError::validation("name", "must not be empty"));
        }

        let tenant = Tenant::create_trial(TenantId::new(), name, Timestamp::now(), self.trial.days);

        self.store
            .insert(&tenant)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        info!(
            tenant_id = %tenant.id,
            name = %tenant.name,
            trial_days = self.trial.days,
            "trial tenant created"
        );

        Ok(tenant)
    }
}
