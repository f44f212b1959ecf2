//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the entitlement engine.

mod errors;
mod ids;
mod month_key;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{PlanId, PrincipalId, TenantId};
pub use month_key::MonthKey;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
