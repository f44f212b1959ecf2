//! Tenant module - the aggregate root of the entitlement engine.

mod aggregate;
mod errors;
mod payment;
mod state;

pub use aggregate::Tenant;
pub use errors::TenantError;
pub use payment::{DeactivationReason, PaymentMethod, PaymentRecord, PaymentStatus, RenewalType};
pub use state::TenantState;
