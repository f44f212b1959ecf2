//! ValidateActionHandler - the action validation orchestrator.
//!
//! Composes the full check pipeline for "may this principal perform this
//! action right now": authentication, role permission, subscription
//! expiry, and quota, in that order. The first failed check wins and
//! produces a denial the caller can render directly.
//!
//! This handler never mutates anything. Callers that go on to perform a
//! metered action must record it through `RecordUsageHandler`, whose
//! storage-level conditional increment is the authoritative quota gate
//! under concurrency.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::access::{
    check_quota, check_role, ActionKind, DenialKind, Principal, QuotaDecision, Role, RoleDecision,
    SuggestedAction, ValidationResult,
};
use crate::domain::entitlement::EntitlementResolver;
use crate::domain::foundation::{ErrorCode, TenantId, Timestamp};
use crate::ports::TenantStore;

/// Request to validate one action.
#[derive(Debug, Clone)]
pub struct ValidateActionQuery {
    /// The authenticated principal, if any. None means the request
    /// arrived without a usable session.
    pub principal: Option<Principal>,
    /// The tenant the action targets. Falls back to the principal's own
    /// tenant when absent.
    pub tenant_id: Option<TenantId>,
    pub action: ActionKind,
}

/// Handler composing the validation pipeline.
pub struct ValidateActionHandler {
    store: Arc<dyn TenantStore>,
    resolver: EntitlementResolver,
}

impl ValidateActionHandler {
    pub fn new(store: Arc<dyn TenantStore>, resolver: EntitlementResolver) -> Self {
        Self { store, resolver }
    }

    /// Runs the pipeline. Infallible by design: infrastructure failures
    /// surface as system denials rather than errors, so a storage outage
    /// can never accidentally admit an action.
    pub async fn handle(&self, query: ValidateActionQuery) -> ValidationResult {
        let Some(principal) = query.principal.as_ref() else {
            return ValidationResult::denied_with_action(
                DenialKind::Authentication,
                "Sign in to continue.",
                SuggestedAction::LoginRequired,
            );
        };

        if !principal.is_active() {
            debug!(principal = %principal.id, "denied: principal account not active");
            return ValidationResult::denied_with_action(
                DenialKind::Authentication,
                "This account is not active.",
                SuggestedAction::LoginRequired,
            );
        }

        if let RoleDecision::Denied(reason) = check_role(principal, query.action) {
            debug!(
                principal = %principal.id,
                action = query.action.as_str(),
                "denied: insufficient role"
            );
            return ValidationResult::denied(DenialKind::Permission, reason);
        }

        // Superadmins operate across tenants and are never metered.
        if principal.role == Role::Superadmin {
            return ValidationResult::Allowed;
        }

        if !query.action.is_metered() {
            return ValidationResult::Allowed;
        }

        let Some(tenant_id) = query.tenant_id.or(principal.tenant_id) else {
            debug!(
                principal = %principal.id,
                action = query.action.as_str(),
                "denied: no tenant context for metered action"
            );
            return ValidationResult::denied(
                DenialKind::Permission,
                "This action requires a tenant context.",
            );
        };

        let tenant = match self.store.get(&tenant_id).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => {
                warn!(tenant_id = %tenant_id, "validation against unknown tenant");
                return ValidationResult::denied(
                    DenialKind::System,
                    "Could not verify subscription status. Please try again.",
                );
            }
            Err(e) => {
                // Fail closed: an unreachable store denies rather than admits.
                error!(tenant_id = %tenant_id, error = %e, "tenant lookup failed");
                return ValidationResult::denied(
                    DenialKind::System,
                    "Could not verify subscription status. Please try again.",
                );
            }
        };

        let now = Timestamp::now();
        let limits = match self.resolver.resolve(&tenant, now) {
            Ok(limits) => limits,
            Err(e) if e.code == ErrorCode::PlanNotConfigured => {
                warn!(tenant_id = %tenant_id, error = %e, "plan not configured");
                return ValidationResult::denied_with_action(
                    DenialKind::Configuration,
                    "Subscription configuration error. Support has been notified.",
                    SuggestedAction::ContactSupport,
                );
            }
            Err(e) => {
                error!(tenant_id = %tenant_id, error = %e, "entitlement resolution failed");
                return ValidationResult::denied(
                    DenialKind::System,
                    "Could not verify subscription status. Please try again.",
                );
            }
        };

        if limits.is_expired() {
            debug!(tenant_id = %tenant_id, plan = %limits.plan_name, "denied: period expired");
            let (message, suggested) = if limits.plan_name == "Trial" {
                (
                    "Your trial period has ended.",
                    SuggestedAction::ExtendTrial,
                )
            } else {
                (
                    "Your subscription has expired.",
                    SuggestedAction::ContactSupport,
                )
            };
            return ValidationResult::denied_with_action(
                DenialKind::SubscriptionExpired,
                message,
                suggested,
            );
        }

        match check_quota(&limits, query.action) {
            QuotaDecision::Allowed => ValidationResult::Allowed,
            QuotaDecision::Denied {
                reason,
                snapshot,
                suggested_action,
            } => {
                debug!(
                    tenant_id = %tenant_id,
                    action = query.action.as_str(),
                    current = snapshot.current,
                    "denied: over quota"
                );
                ValidationResult::Denied(crate::domain::access::Denial {
                    kind: DenialKind::QuotaExceeded,
                    message: reason,
                    details: Some(snapshot),
                    suggested_action: Some(suggested_action),
                })
            }
        }
    }
}
