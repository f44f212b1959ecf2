//! Entitlement resolver - computes a tenant's limit snapshot.
//!
//! The single place where lifecycle state, plan catalog, and trial policy
//! combine into a [`SubscriptionLimits`]. Every call site goes through the
//! orchestrator or the dashboard handler; limits are never re-derived ad
//! hoc elsewhere.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::plan::PlanCatalog;
use crate::domain::tenant::{Tenant, TenantState};

use super::SubscriptionLimits;

/// Trial entitlements, independent of the plan catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPolicy {
    /// Trial length in days for newly created tenants.
    pub days: u32,
    /// Users allowed during trial.
    pub max_users: u32,
    /// Services per month allowed during trial.
    pub max_services: u32,
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self {
            days: 7,
            max_users: 2,
            max_services: 10,
        }
    }
}

/// Resolves a tenant's current [`SubscriptionLimits`].
///
/// Pure over the tenant's persisted fields plus the injected catalog and
/// trial policy: no I/O, and two calls without an intervening mutation
/// return identical snapshots.
#[derive(Debug, Clone)]
pub struct EntitlementResolver {
    catalog: Arc<PlanCatalog>,
    trial: TrialPolicy,
}

impl EntitlementResolver {
    pub fn new(catalog: Arc<PlanCatalog>, trial: TrialPolicy) -> Self {
        Self { catalog, trial }
    }

    /// Computes the limit snapshot for a tenant at `now`.
    ///
    /// # Errors
    ///
    /// `PlanNotConfigured` when an Active tenant references a plan missing
    /// from the catalog. That is a data-integrity fault for operators, not
    /// a quota denial.
    pub fn resolve(&self, tenant: &Tenant, now: Timestamp) -> Result<SubscriptionLimits, DomainError> {
        match tenant.state {
            TenantState::Trial => Ok(self.resolve_trial(tenant, now)),
            TenantState::Active => self.resolve_active(tenant, now),
            TenantState::Inactive => Ok(SubscriptionLimits {
                current_users: tenant.active_user_count,
                current_services: tenant.current_services_used(now),
                ..SubscriptionLimits::none("Inactive")
            }),
        }
    }

    fn resolve_trial(&self, tenant: &Tenant, now: Timestamp) -> SubscriptionLimits {
        let current_users = tenant.active_user_count;
        let current_services = tenant.current_services_used(now);
        // A trial without a deadline counts as lapsed rather than eternal.
        let days_remaining = tenant.trial_days_remaining(now).unwrap_or(0);

        SubscriptionLimits {
            max_users: self.trial.max_users,
            max_services: Some(self.trial.max_services),
            current_users,
            current_services,
            days_remaining: Some(days_remaining),
            plan_name: "Trial".to_string(),
            is_unlimited: false,
            can_add_services: current_services < self.trial.max_services && days_remaining > 0,
            can_add_users: current_users < self.trial.max_users,
        }
    }

    fn resolve_active(
        &self,
        tenant: &Tenant,
        now: Timestamp,
    ) -> Result<SubscriptionLimits, DomainError> {
        let plan_id = tenant.plan_id.as_ref().ok_or_else(|| {
            DomainError::new(
                ErrorCode::PlanNotConfigured,
                format!("Active tenant {} has no plan assigned", tenant.id),
            )
        })?;
        let plan = self.catalog.get(plan_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::PlanNotConfigured,
                format!(
                    "Active tenant {} references unknown plan '{}'",
                    tenant.id, plan_id
                ),
            )
            .with_detail("plan_id", plan_id.to_string())
        })?;

        let current_users = tenant.active_user_count;
        let current_services = tenant.current_services_used(now);
        let is_unlimited = plan.is_unlimited();

        let can_add_services = is_unlimited
            || plan
                .max_monthly_services
                .map(|max| current_services < max)
                .unwrap_or(true);

        Ok(SubscriptionLimits {
            max_users: plan.max_users,
            max_services: plan.max_monthly_services,
            current_users,
            current_services,
            days_remaining: tenant.subscription_days_remaining(now),
            plan_name: plan.name.clone(),
            is_unlimited,
            can_add_services,
            can_add_users: current_users < plan.max_users,
        })
    }
}
