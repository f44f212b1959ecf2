//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations and coordinates between ports. Command
//! handlers write through the tenant store; query handlers only read.

pub mod handlers;

pub use handlers::{
    ActivateSubscriptionCommand, ActivateSubscriptionHandler, CreateTrialCommand,
    CreateTrialHandler, DeactivateSubscriptionCommand, DeactivateSubscriptionHandler,
    ExtendTrialCommand, ExtendTrialHandler, RecordPaymentCommand, RecordPaymentHandler,
    RecordUsageCommand, RecordUsageHandler, ResolveLimitsHandler, ResolveLimitsQuery,
    SweepExpiredHandler, SweepOutcome, ValidateActionHandler, ValidateActionQuery,
};
