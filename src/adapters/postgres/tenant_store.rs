//! PostgreSQL implementation of TenantStore.
//!
//! Persists Tenant aggregates to the `tenants` table. Usage history and
//! payment history live in JSONB columns; the conditional usage increment
//! is a single UPDATE whose WHERE clause re-checks the quota, so two
//! concurrent increments can never both succeed past the limit.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, MonthKey, PlanId, TenantId, Timestamp,
};
use crate::domain::tenant::{
    DeactivationReason, PaymentStatus, RenewalType, Tenant, TenantState,
};
use crate::ports::TenantStore;

/// PostgreSQL implementation of TenantStore.
#[derive(Clone)]
pub struct PostgresTenantStore {
    pool: PgPool,
}

impl PostgresTenantStore {
    /// Creates a new PostgresTenantStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for PostgresTenantStore {
    async fn get(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, state, plan_id, trial_end_date,
                   subscription_start_date, subscription_end_date,
                   next_payment_date, last_payment_date, renewal_type,
                   payment_status, deactivation_reason, active_user_count,
                   services_used_this_month, services_used_history,
                   payment_history, auto_renewal, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch tenant", e))?;

        match row {
            Some(row) => Ok(Some(row_to_tenant(row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, tenant: &Tenant) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tenants (
                id, name, state, plan_id, trial_end_date,
                subscription_start_date, subscription_end_date,
                next_payment_date, last_payment_date, renewal_type,
                payment_status, deactivation_reason, active_user_count,
                services_used_this_month, services_used_history,
                payment_history, auto_renewal, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(&tenant.name)
        .bind(state_to_str(tenant.state))
        .bind(tenant.plan_id.as_ref().map(PlanId::as_str))
        .bind(tenant.trial_end_date.as_ref().map(Timestamp::as_datetime))
        .bind(
            tenant
                .subscription_start_date
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(
            tenant
                .subscription_end_date
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(tenant.next_payment_date.as_ref().map(Timestamp::as_datetime))
        .bind(tenant.last_payment_date.as_ref().map(Timestamp::as_datetime))
        .bind(tenant.renewal_type.map(renewal_to_str))
        .bind(payment_status_to_str(tenant.payment_status))
        .bind(tenant.deactivation_reason.map(deactivation_reason_to_str))
        .bind(tenant.active_user_count as i32)
        .bind(tenant.services_used_this_month as i32)
        .bind(history_to_json(tenant)?)
        .bind(payments_to_json(tenant)?)
        .bind(tenant.auto_renewal)
        .bind(tenant.created_at.as_datetime())
        .bind(tenant.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert tenant", e))?;

        Ok(())
    }

    async fn update(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tenants SET
                name = $2,
                state = $3,
                plan_id = $4,
                trial_end_date = $5,
                subscription_start_date = $6,
                subscription_end_date = $7,
                next_payment_date = $8,
                last_payment_date = $9,
                renewal_type = $10,
                payment_status = $11,
                deactivation_reason = $12,
                active_user_count = $13,
                services_used_this_month = $14,
                services_used_history = $15,
                payment_history = $16,
                auto_renewal = $17,
                updated_at = $18
            WHERE id = $1
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(&tenant.name)
        .bind(state_to_str(tenant.state))
        .bind(tenant.plan_id.as_ref().map(PlanId::as_str))
        .bind(tenant.trial_end_date.as_ref().map(Timestamp::as_datetime))
        .bind(
            tenant
                .subscription_start_date
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(
            tenant
                .subscription_end_date
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(tenant.next_payment_date.as_ref().map(Timestamp::as_datetime))
        .bind(tenant.last_payment_date.as_ref().map(Timestamp::as_datetime))
        .bind(tenant.renewal_type.map(renewal_to_str))
        .bind(payment_status_to_str(tenant.payment_status))
        .bind(tenant.deactivation_reason.map(deactivation_reason_to_str))
        .bind(tenant.active_user_count as i32)
        .bind(tenant.services_used_this_month as i32)
        .bind(history_to_json(tenant)?)
        .bind(payments_to_json(tenant)?)
        .bind(tenant.auto_renewal)
        .bind(tenant.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update tenant", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TenantNotFound,
                format!("Tenant not found: {}", tenant.id),
            ));
        }

        Ok(())
    }

    async fn increment_usage(
        &self,
        id: &TenantId,
        month: MonthKey,
        max: Option<u32>,
    ) -> Result<bool, DomainError> {
        // Check and increment in one statement. Postgres evaluates the WHERE
        // clause against the current row under the row lock, so concurrent
        // callers serialize and the count can never overshoot `max`.
        let result = sqlx::query(
            r#"
            UPDATE tenants SET
                services_used_history = jsonb_set(
                    COALESCE(services_used_history, '{}'::jsonb),
                    ARRAY[$2],
                    to_jsonb(COALESCE((services_used_history->>$2)::int, 0) + 1)
                ),
                services_used_this_month =
                    COALESCE((services_used_history->>$2)::int, 0) + 1,
                updated_at = NOW()
            WHERE id = $1
              AND ($3::int IS NULL
                   OR COALESCE((services_used_history->>$2)::int, 0) < $3)
            "#,
        )
        .bind(id.as_uuid())
        .bind(month.to_string())
        .bind(max.map(|m| m as i32))
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to increment usage", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Zero rows means either the quota held or the tenant is gone;
        // tell those apart so callers get a real error for a missing row.
        let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenants WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to check tenant existence", e))?;

        if exists.0 == 0 {
            return Err(DomainError::new(
                ErrorCode::TenantNotFound,
                format!("Tenant not found: {}", id),
            ));
        }

        Ok(false)
    }

    async fn find_active_expiring_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Tenant>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, state, plan_id, trial_end_date,
                   subscription_start_date, subscription_end_date,
                   next_payment_date, last_payment_date, renewal_type,
                   payment_status, deactivation_reason, active_user_count,
                   services_used_this_month, services_used_history,
                   payment_history, auto_renewal, created_at, updated_at
            FROM tenants
            WHERE state = 'active'
              AND subscription_end_date IS NOT NULL
              AND subscription_end_date <= $1
            ORDER BY subscription_end_date ASC
            "#,
        )
        .bind(cutoff.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch expiring tenants", e))?;

        rows.into_iter().map(row_to_tenant).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_err(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn state_to_str(state: TenantState) -> &'static str {
    match state {
        TenantState::Trial => "trial",
        TenantState::Active => "active",
        TenantState::Inactive => "inactive",
    }
}

fn str_to_state(s: &str) -> Result<TenantState, DomainError> {
    match s {
        "trial" => Ok(TenantState::Trial),
        "active" => Ok(TenantState::Active),
        "inactive" => Ok(TenantState::Inactive),
        _ => Err(db_err("Invalid tenant state", s)),
    }
}

fn renewal_to_str(renewal: RenewalType) -> &'static str {
    match renewal {
        RenewalType::Monthly => "monthly",
        RenewalType::Semiannual => "semiannual",
    }
}

fn str_to_renewal(s: &str) -> Result<RenewalType, DomainError> {
    match s {
        "monthly" => Ok(RenewalType::Monthly),
        "semiannual" => Ok(RenewalType::Semiannual),
        _ => Err(db_err("Invalid renewal type", s)),
    }
}

fn payment_status_to_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Paid => "paid",
        PaymentStatus::Pending => "pending",
        PaymentStatus::Overdue => "overdue",
    }
}

fn str_to_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "paid" => Ok(PaymentStatus::Paid),
        "pending" => Ok(PaymentStatus::Pending),
        "overdue" => Ok(PaymentStatus::Overdue),
        _ => Err(db_err("Invalid payment status", s)),
    }
}

fn deactivation_reason_to_str(reason: DeactivationReason) -> &'static str {
    match reason {
        DeactivationReason::SubscriptionExpired => "subscription_expired",
        DeactivationReason::ManualCancellation => "manual_cancellation",
        DeactivationReason::PaymentFailure => "payment_failure",
    }
}

fn str_to_deactivation_reason(s: &str) -> Result<DeactivationReason, DomainError> {
    match s {
        "subscription_expired" => Ok(DeactivationReason::SubscriptionExpired),
        "manual_cancellation" => Ok(DeactivationReason::ManualCancellation),
        "payment_failure" => Ok(DeactivationReason::PaymentFailure),
        _ => Err(db_err("Invalid deactivation reason", s)),
    }
}

fn history_to_json(tenant: &Tenant) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(&tenant.services_used_history)
        .map_err(|e| db_err("Failed to serialize usage history", e))
}

fn payments_to_json(tenant: &Tenant) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(&tenant.payment_history)
        .map_err(|e| db_err("Failed to serialize payment history", e))
}

fn row_to_tenant(row: sqlx::postgres::PgRow) -> Result<Tenant, DomainError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| db_err("Failed to get id", e))?;

    let name: String = row
        .try_get("name")
        .map_err(|e| db_err("Failed to get name", e))?;

    let state_str: String = row
        .try_get("state")
        .map_err(|e| db_err("Failed to get state", e))?;
    let state = str_to_state(&state_str)?;

    let plan_id: Option<String> = row
        .try_get("plan_id")
        .map_err(|e| db_err("Failed to get plan_id", e))?;
    let plan_id = plan_id
        .map(|p| PlanId::new(p).map_err(|e| db_err("Invalid plan_id", e)))
        .transpose()?;

    let trial_end_date: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("trial_end_date")
        .map_err(|e| db_err("Failed to get trial_end_date", e))?;

    let subscription_start_date: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("subscription_start_date")
        .map_err(|e| db_err("Failed to get subscription_start_date", e))?;

    let subscription_end_date: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("subscription_end_date")
        .map_err(|e| db_err("Failed to get subscription_end_date", e))?;

    let next_payment_date: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("next_payment_date")
        .map_err(|e| db_err("Failed to get next_payment_date", e))?;

    let last_payment_date: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("last_payment_date")
        .map_err(|e| db_err("Failed to get last_payment_date", e))?;

    let renewal_str: Option<String> = row
        .try_get("renewal_type")
        .map_err(|e| db_err("Failed to get renewal_type", e))?;
    let renewal_type = renewal_str.as_deref().map(str_to_renewal).transpose()?;

    let payment_status_str: String = row
        .try_get("payment_status")
        .map_err(|e| db_err("Failed to get payment_status", e))?;
    let payment_status = str_to_payment_status(&payment_status_str)?;

    let reason_str: Option<String> = row
        .try_get("deactivation_reason")
        .map_err(|e| db_err("Failed to get deactivation_reason", e))?;
    let deactivation_reason = reason_str
        .as_deref()
        .map(str_to_deactivation_reason)
        .transpose()?;

    let active_user_count: i32 = row
        .try_get("active_user_count")
        .map_err(|e| db_err("Failed to get active_user_count", e))?;

    let services_used_this_month: i32 = row
        .try_get("services_used_this_month")
        .map_err(|e| db_err("Failed to get services_used_this_month", e))?;

    let history_json: serde_json::Value = row
        .try_get("services_used_history")
        .map_err(|e| db_err("Failed to get services_used_history", e))?;
    let services_used_history = serde_json::from_value(history_json)
        .map_err(|e| db_err("Invalid usage history", e))?;

    let payments_json: serde_json::Value = row
        .try_get("payment_history")
        .map_err(|e| db_err("Failed to get payment_history", e))?;
    let payment_history = serde_json::from_value(payments_json)
        .map_err(|e| db_err("Invalid payment history", e))?;

    let auto_renewal: bool = row
        .try_get("auto_renewal")
        .map_err(|e| db_err("Failed to get auto_renewal", e))?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_err("Failed to get created_at", e))?;

    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| db_err("Failed to get updated_at", e))?;

    Ok(Tenant {
        id: TenantId::from_uuid(id),
        name,
        state,
        plan_id,
        trial_end_date: trial_end_date.map(Timestamp::from_datetime),
        subscription_start_date: subscription_start_date.map(Timestamp::from_datetime),
        subscription_end_date: subscription_end_date.map(Timestamp::from_datetime),
        next_payment_date: next_payment_date.map(Timestamp::from_datetime),
        last_payment_date: last_payment_date.map(Timestamp::from_datetime),
        renewal_type,
        payment_status,
        deactivation_reason,
        active_user_count: active_user_count as u32,
        services_used_this_month: services_used_this_month as u32,
        services_used_history,
        payment_history,
        auto_renewal,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
