//! Tenant lifecycle state machine.
//!
//! Defines the subscription lifecycle states of a lubricentro account and
//! the valid transitions between them.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Subscription lifecycle state of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantState {
    /// Time- and usage-bounded evaluation period before a paid plan.
    Trial,

    /// Paid subscription on a catalog plan.
    Active,

    /// Expired or cancelled. No metered actions allowed.
    Inactive,
}

impl TenantState {
    /// Returns true if this state allows metered actions at all.
    ///
    /// Trial and Active tenants are still subject to quota; Inactive
    /// tenants are denied regardless of counters.
    pub fn has_access(&self) -> bool {
        matches!(self, TenantState::Trial | TenantState::Active)
    }
}

impl StateMachine for TenantState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TenantState::*;
        matches!(
            (self, target),
            // From TRIAL
            (Trial, Active)
                | (Trial, Inactive)
                | (Trial, Trial) // Trial extension
            // From ACTIVE
                | (Active, Active) // Renewal or plan change
                | (Active, Inactive)
            // From INACTIVE
                | (Inactive, Active) // Reactivation
                | (Inactive, Trial) // Goodwill trial extension
                | (Inactive, Inactive) // Deactivate is idempotent
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TenantState::*;
        match self {
            Trial => vec![Active, Inactive, Trial],
            Active => vec![Active, Inactive],
            Inactive => vec![Active, Trial, Inactive],
        }
    }
}
