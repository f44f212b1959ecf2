//! Entitlement module - resolved limits and the resolver.

mod limits;
mod resolver;

pub use limits::SubscriptionLimits;
pub use resolver::{EntitlementResolver, TrialPolicy};
