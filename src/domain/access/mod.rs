//! Access module - roles, actions, quota checks, and decisions.

mod action;
mod decision;
mod principal;
mod quota;
mod role_gate;

pub use action::ActionKind;
pub use decision::{Denial, DenialKind, SuggestedAction, ValidationResult};
pub use principal::{AccountStatus, Principal, Role};
pub use quota::{check_quota, QuotaDecision, QuotaResource, QuotaSnapshot};
pub use role_gate::{check_role, RoleDecision};
