//! SweepExpiredHandler - deactivates tenants whose paid period lapsed.
//!
//! Meant to run periodically from a scheduler. Access enforcement never
//! depends on this sweep: the resolver treats a lapsed period as expired
//! on its own, so the sweep only brings the stored state in line.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::Timestamp;
use crate::domain::tenant::{DeactivationReason, TenantError};
use crate::ports::TenantStore;

/// Outcome of one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepOutcome {
    /// Tenants moved to Inactive in this run.
    pub deactivated: u32,
    /// Tenants that could not be updated; they stay eligible for the
    /// next run.
    pub failed: u32,
}

/// Handler sweeping lapsed active tenants.
pub struct SweepExpiredHandler {
    store: Arc<dyn TenantStore>,
}

impl SweepExpiredHandler {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    /// Deactivates every active tenant whose period ended before `now`.
    ///
    /// Individual update failures are logged and counted; the sweep
    /// keeps going so one bad row cannot stall the rest.
    pub async fn handle(&self, now: Timestamp) -> Result<SweepOutcome, TenantError> {
        let lapsed = self
            .store
            .find_active_expiring_before(now)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        let mut outcome = SweepOutcome::default();
        for mut tenant in lapsed {
            tenant.deactivate(DeactivationReason::SubscriptionExpired, now);
            match self.store.update(&tenant).await {
                Ok(()) => outcome.deactivated += 1,
                Err(e) => {
                    warn!(tenant_id = %tenant.id, error = %e, "sweep update failed");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            deactivated = outcome.deactivated,
            failed = outcome.failed,
            "expiry sweep finished"
        );

        Ok(outcome)
    }
}
