//! Quota validator.
//!
//! Maps an action kind to the relevant can-add flag on a resolved limits
//! snapshot. Pure; the orchestrator composes it after the role gate and
//! the expiry check.

use serde::{Deserialize, Serialize};

use crate::domain::entitlement::SubscriptionLimits;

use super::{ActionKind, SuggestedAction};

/// Which metered resource a quota decision refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaResource {
    Services,
    Users,
}

/// Numeric usage snapshot attached to quota denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub resource: QuotaResource,
    pub current: u32,
    /// None = unlimited.
    pub max: Option<u32>,
}

/// Result of a quota check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Within quota, or the action has no quota semantics.
    Allowed,
    /// Over quota.
    Denied {
        reason: String,
        snapshot: QuotaSnapshot,
        suggested_action: SuggestedAction,
    },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allowed)
    }
}

/// Checks the action against the resolved limits.
///
/// `create_service` consumes the monthly service quota and `create_user`
/// the user quota; every other action passes unconditionally.
pub fn check_quota(limits: &SubscriptionLimits, action: ActionKind) -> QuotaDecision {
    match action {
        ActionKind::CreateService if !limits.can_add_services => QuotaDecision::Denied {
            reason: format!(
                "Monthly service limit reached ({} of {})",
                limits.current_services,
                limits
                    .max_services
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "unlimited".to_string()),
            ),
            snapshot: QuotaSnapshot {
                resource: QuotaResource::Services,
                current: limits.current_services,
                max: limits.max_services,
            },
            suggested_action: suggest_for(limits),
        },
        ActionKind::CreateUser if !limits.can_add_users => QuotaDecision::Denied {
            reason: format!(
                "User limit reached ({} of {})",
                limits.current_users, limits.max_users
            ),
            snapshot: QuotaSnapshot {
                resource: QuotaResource::Users,
                current: limits.current_users,
                max: Some(limits.max_users),
            },
            suggested_action: suggest_for(limits),
        },
        _ => QuotaDecision::Allowed,
    }
}

/// Trial and inactive tenants have no plan to upgrade; everyone else does.
fn suggest_for(limits: &SubscriptionLimits) -> SuggestedAction {
    if limits.plan_name == "Trial" || limits.plan_name == "Inactive" {
        SuggestedAction::ContactSupport
    } else {
        SuggestedAction::UpgradePlan
    }
}
