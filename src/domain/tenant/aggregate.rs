//! Tenant aggregate entity.
//!
//! A Tenant is a subscribing lubricentro: the unit of billing and quota.
//! All lifecycle transitions and counter bookkeeping happen through methods
//! on this aggregate; components outside the lifecycle manager and the
//! usage counter updater never write to it.
//!
//! # Design Decisions
//!
//! - **Money in cents**: All monetary values stored as i64 cents (not floats)
//! - **State machine transitions**: `TenantState` validates every transition
//! - **History-derived usage**: effective current-month usage is read from
//!   `services_used_history[current month]`, so a month rollover needs no
//!   scheduled reset job

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{
    DomainError, ErrorCode, MonthKey, PlanId, StateMachine, TenantId, Timestamp,
};

use super::{
    DeactivationReason, PaymentMethod, PaymentRecord, PaymentStatus, RenewalType, TenantError,
    TenantState,
};

/// Tenant aggregate - a subscribing lubricentro account.
///
/// # Invariants
///
/// - `plan_id` is Some only when `state == Active`
/// - `trial_end_date` is Some only when `state == Trial`
/// - the current month's history entry equals `services_used_this_month`
///   after any increment in that month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier for this tenant.
    pub id: TenantId,

    /// Shop display name.
    pub name: String,

    /// Current lifecycle state.
    pub state: TenantState,

    /// Active catalog plan. Some only when Active.
    pub plan_id: Option<PlanId>,

    /// Trial deadline. Some only when Trial.
    pub trial_end_date: Option<Timestamp>,

    /// Start of the current paid period.
    pub subscription_start_date: Option<Timestamp>,

    /// End of the current paid period.
    pub subscription_end_date: Option<Timestamp>,

    /// When the next payment is expected.
    pub next_payment_date: Option<Timestamp>,

    /// When the last payment was recorded.
    pub last_payment_date: Option<Timestamp>,

    /// Billing cadence chosen at activation.
    pub renewal_type: Option<RenewalType>,

    /// Payment standing.
    pub payment_status: PaymentStatus,

    /// Why the tenant was last deactivated, if ever.
    pub deactivation_reason: Option<DeactivationReason>,

    /// Provisioned employee accounts. Maintained by the user lifecycle;
    /// read-only here.
    pub active_user_count: u32,

    /// Services created in the current calendar month.
    pub services_used_this_month: u32,

    /// Per-month usage history, keyed by calendar month.
    pub services_used_history: BTreeMap<MonthKey, u32>,

    /// Ordered payment events, oldest first.
    pub payment_history: Vec<PaymentRecord>,

    /// Whether the subscription renews automatically.
    pub auto_renewal: bool,

    /// When the tenant was created.
    pub created_at: Timestamp,

    /// When the tenant was last updated.
    pub updated_at: Timestamp,
}

impl Tenant {
    /// Creates a new tenant in Trial state.
    ///
    /// The trial runs for `trial_days` from `now`.
    pub fn create_trial(id: TenantId, name: impl Into<String>, now: Timestamp, trial_days: u32) -> Self {
        Self {
            id,
            name: name.into(),
            state: TenantState::Trial,
            plan_id: None,
            trial_end_date: Some(now.add_days(i64::from(trial_days))),
            subscription_start_date: None,
            subscription_end_date: None,
            next_payment_date: None,
            last_payment_date: None,
            renewal_type: None,
            payment_status: PaymentStatus::Pending,
            deactivation_reason: None,
            active_user_count: 0,
            services_used_this_month: 0,
            services_used_history: BTreeMap::new(),
            payment_history: Vec::new(),
            auto_renewal: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Activates the subscription on a catalog plan.
    ///
    /// Valid from any prior state; an already-active tenant re-activates
    /// with a different plan (upgrade/downgrade) without leaving Active.
    /// Resets the monthly usage counter.
    ///
    /// # Errors
    ///
    /// Returns error if the state machine rejects the transition.
    pub fn activate(
        &mut self,
        plan_id: PlanId,
        renewal: RenewalType,
        now: Timestamp,
    ) -> Result<(), TenantError> {
        self.transition_to(TenantState::Active, "activate")?;

        let period_end = now.add_months(renewal.period_months());
        self.plan_id = Some(plan_id);
        self.trial_end_date = None;
        self.subscription_start_date = Some(now);
        self.subscription_end_date = Some(period_end);
        self.next_payment_date = Some(period_end);
        self.renewal_type = Some(renewal);
        self.payment_status = PaymentStatus::Paid;
        self.deactivation_reason = None;
        self.auto_renewal = true;
        self.reset_usage(now);
        self.updated_at = now;
        Ok(())
    }

    /// Deactivates the tenant. Idempotent.
    ///
    /// Metered actions are denied from here on regardless of counters.
    pub fn deactivate(&mut self, reason: DeactivationReason, now: Timestamp) {
        // Inactive -> Inactive is a valid self-transition, so this never fails.
        self.state = TenantState::Inactive;
        self.auto_renewal = false;
        self.payment_status = PaymentStatus::Overdue;
        self.deactivation_reason = Some(reason);
        self.updated_at = now;
    }

    /// Extends (or restores) the trial period.
    ///
    /// Allowed from Trial and Inactive. The new deadline is
    /// `max(trial_end_date, now) + additional_days`, so an expired trial
    /// extends from today rather than from the lapsed date.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for Active tenants.
    pub fn extend_trial(&mut self, additional_days: u32, now: Timestamp) -> Result<(), TenantError> {
        if self.state == TenantState::Active {
            return Err(TenantError::invalid_state("active", "extend trial for"));
        }
        self.transition_to(TenantState::Trial, "extend trial for")?;

        let base = match self.trial_end_date {
            Some(end) if end.is_after(&now) => end,
            _ => now,
        };
        self.trial_end_date = Some(base.add_days(i64::from(additional_days)));
        self.plan_id = None;
        self.deactivation_reason = None;
        self.reset_usage(now);
        self.updated_at = now;
        Ok(())
    }

    /// Appends a payment event and advances the billing dates.
    ///
    /// Does not alter the lifecycle state. The next payment date advances
    /// by the tenant's renewal cadence; tenants without a chosen cadence
    /// default to monthly.
    pub fn record_payment(
        &mut self,
        amount_cents: i64,
        method: PaymentMethod,
        reference: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), TenantError> {
        if amount_cents <= 0 {
            return Err(TenantError::validation(
                "amount_cents",
                "payment amount must be positive",
            ));
        }

        self.payment_history.push(PaymentRecord {
            date: now,
            amount_cents,
            method,
            reference: reference.into(),
        });

        let cadence = self.renewal_type.unwrap_or(RenewalType::Monthly);
        let base = match self.next_payment_date {
            Some(due) if due.is_after(&now) => due,
            _ => now,
        };
        self.next_payment_date = Some(base.add_months(cadence.period_months()));
        self.last_payment_date = Some(now);
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = now;
        Ok(())
    }

    /// Services used in the given calendar month.
    pub fn services_used_in(&self, month: MonthKey) -> u32 {
        self.services_used_history.get(&month).copied().unwrap_or(0)
    }

    /// Effective services used in the month containing `now`.
    ///
    /// Reading through the history map makes the monthly reset implicit: a
    /// new month has no entry yet, so usage starts at 0 without anyone
    /// mutating the row.
    pub fn current_services_used(&self, now: Timestamp) -> u32 {
        self.services_used_in(MonthKey::from_timestamp(&now))
    }

    /// Applies one usage increment for the month containing `now`.
    ///
    /// Keeps `services_used_this_month` equal to the current month's
    /// history entry. Counter writes normally go through the store's atomic
    /// conditional update; this method is the in-memory equivalent used by
    /// that adapter and by tests.
    pub fn apply_usage_increment(&mut self, now: Timestamp) {
        let month = MonthKey::from_timestamp(&now);
        let used = self.services_used_in(month) + 1;
        self.services_used_history.insert(month, used);
        self.services_used_this_month = used;
        self.updated_at = now;
    }

    /// Days remaining in the trial, 0 when lapsed. None outside Trial.
    pub fn trial_days_remaining(&self, now: Timestamp) -> Option<u32> {
        match (self.state, self.trial_end_date) {
            (TenantState::Trial, Some(end)) => Some(now.days_until(&end)),
            _ => None,
        }
    }

    /// Days remaining in the paid period, 0 when lapsed. None outside Active.
    pub fn subscription_days_remaining(&self, now: Timestamp) -> Option<u32> {
        match (self.state, self.subscription_end_date) {
            (TenantState::Active, Some(end)) => Some(now.days_until(&end)),
            _ => None,
        }
    }

    /// True for Active tenants whose paid period has lapsed.
    ///
    /// The expiration sweep deactivates these.
    pub fn subscription_lapsed(&self, now: Timestamp) -> bool {
        self.state == TenantState::Active
            && self
                .subscription_end_date
                .map(|end| end.is_before(&now))
                .unwrap_or(false)
    }

    /// Resets the monthly usage counter and the current month's history
    /// entry.
    ///
    /// Called on every transition into Trial or Active.
    fn reset_usage(&mut self, now: Timestamp) {
        let month = MonthKey::from_timestamp(&now);
        self.services_used_this_month = 0;
        self.services_used_history.insert(month, 0);
    }

    fn transition_to(&mut self, target: TenantState, attempted: &str) -> Result<(), TenantError> {
        self.state = self.state.transition_to(target).map_err(|_| {
            TenantError::from(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot {} tenant in {:?} state", attempted, self.state),
            ))
        })?;
        Ok(())
    }
}
