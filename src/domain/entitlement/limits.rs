//! Resolved subscription limits snapshot.

use serde::{Deserialize, Serialize};

/// Normalized view of what a tenant may currently do.
///
/// Derived from the tenant's lifecycle state, the plan catalog, and the
/// trial policy; never persisted. Dashboards render it directly and the
/// quota validator branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionLimits {
    /// Maximum provisioned users.
    pub max_users: u32,
    /// Maximum services per month. None = unlimited.
    pub max_services: Option<u32>,
    /// Currently provisioned users.
    pub current_users: u32,
    /// Services used in the current calendar month.
    pub current_services: u32,
    /// Days remaining in the trial or paid period. None when the tenant
    /// has no running period (Inactive).
    pub days_remaining: Option<u32>,
    /// Display name: the plan's name, "Trial", or "Inactive".
    pub plan_name: String,
    /// True when the plan places no ceiling on monthly services.
    pub is_unlimited: bool,
    /// Whether another service may be created right now.
    pub can_add_services: bool,
    /// Whether another user may be provisioned right now.
    pub can_add_users: bool,
}

impl SubscriptionLimits {
    /// An all-zero snapshot for tenants with no entitlements.
    pub fn none(plan_name: impl Into<String>) -> Self {
        Self {
            max_users: 0,
            max_services: Some(0),
            current_users: 0,
            current_services: 0,
            days_remaining: None,
            plan_name: plan_name.into(),
            is_unlimited: false,
            can_add_services: false,
            can_add_users: false,
        }
    }

    /// True when the running period has lapsed.
    ///
    /// Deliberately independent of [`Self::is_over_service_quota`]: the
    /// caller composes "expired" and "over quota" explicitly instead of
    /// conflating them in one flag.
    pub fn is_expired(&self) -> bool {
        self.days_remaining == Some(0)
    }

    /// True when the monthly service ceiling is reached.
    pub fn is_over_service_quota(&self) -> bool {
        match self.max_services {
            Some(max) => self.current_services >= max,
            None => false,
        }
    }

    /// True when the user ceiling is reached.
    pub fn is_over_user_quota(&self) -> bool {
        self.current_users >= self.max_users
    }

    /// Services left this month. None = unlimited.
    pub fn remaining_services(&self) -> Option<u32> {
        self.max_services
            .map(|max| max.saturating_sub(self.current_services))
    }

    /// User slots left. 0 when full.
    pub fn remaining_users(&self) -> u32 {
        self.max_users.saturating_sub(self.current_users)
    }
}
