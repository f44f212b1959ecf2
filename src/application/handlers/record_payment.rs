//! RecordPaymentHandler - registers a payment against a tenant.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{TenantId, Timestamp};
use crate::domain::tenant::{PaymentMethod, Tenant, TenantError};
use crate::ports::TenantStore;

/// Command to record a received payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub tenant_id: TenantId,
    /// Amount in cents, strictly positive.
    pub amount_cents: i64,
    pub method: PaymentMethod,
    /// External reference (receipt number, gateway id).
    pub reference: String,
}

/// Handler for payment registration.
///
/// Appends to the payment history and advances the next payment date by
/// the tenant's renewal cadence. Does not change the lifecycle state;
/// reactivating a lapsed tenant is a separate activation step.
pub struct RecordPaymentHandler {
    store: Arc<dyn TenantStore>,
}

impl RecordPaymentHandler {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: RecordPaymentCommand) -> Result<Tenant, TenantError> {
        let mut tenant = self
            .store
            .get(&command.tenant_id)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?
            .ok_or_else(|| TenantError::not_found(command.tenant_id))?;

        let now = Timestamp::now();
        tenant.record_payment(command.amount_cents, command.method, command.reference, now)?;

        self.store
            .update(&tenant)
            .await
            .map_err(|e| TenantError::infrastructure(e.to_string()))?;

        info!(
            tenant_id = %tenant.id,
            amount_cents = command.amount_cents,
            method = ?command.method,
            "payment recorded"
        );

        Ok(tenant)
    }
}
