//! Entitlement engine handlers.
//!
//! Command and query handlers for the tenant lifecycle and for action
//! validation:
//!
//! ## Commands
//! - Creating trial tenants
//! - Activating / deactivating subscriptions
//! - Extending trials
//! - Recording payments
//! - Recording metered usage
//! - Sweeping lapsed subscriptions
//!
//! ## Queries
//! - Validate an action (the orchestrator)
//! - Resolve a tenant's current limits

mod activate_subscription;
mod create_trial;
mod deactivate_subscription;
mod extend_trial;
mod record_payment;
mod record_usage;
mod resolve_limits;
mod sweep_expired;
mod validate_action;

// Commands
pub use activate_subscription::{ActivateSubscriptionCommand, ActivateSubscriptionHandler};
pub use create_trial::{CreateTrialCommand, CreateTrialHandler};
pub use deactivate_subscription::{DeactivateSubscriptionCommand, DeactivateSubscriptionHandler};
pub use extend_trial::{ExtendTrialCommand, ExtendTrialHandler};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler};
pub use record_usage::{RecordUsageCommand, RecordUsageHandler};
pub use sweep_expired::{SweepExpiredHandler, SweepOutcome};

// Queries
pub use resolve_limits::{ResolveLimitsHandler, ResolveLimitsQuery};
pub use validate_action::{ValidateActionHandler, ValidateActionQuery};
