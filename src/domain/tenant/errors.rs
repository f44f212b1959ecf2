//! Tenant-specific error types.
//!
//! Errors raised by lifecycle operations on the tenant aggregate. The
//! action-validation path never surfaces these directly; the orchestrator
//! folds failures into structured denial results.

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, TenantId};

/// Errors from tenant lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantError {
    /// Tenant was not found.
    NotFound(TenantId),

    /// Referenced plan is missing from the catalog.
    PlanNotConfigured(PlanId),

    /// Invalid lifecycle state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error (store unreachable, timeout).
    Infrastructure(String),
}

impl TenantError {
    pub fn not_found(id: TenantId) -> Self {
        TenantError::NotFound(id)
    }

    pub fn plan_not_configured(plan_id: PlanId) -> Self {
        TenantError::PlanNotConfigured(plan_id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        TenantError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TenantError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        TenantError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TenantError::NotFound(_) => ErrorCode::TenantNotFound,
            TenantError::PlanNotConfigured(_) => ErrorCode::PlanNotConfigured,
            TenantError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            TenantError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TenantError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            TenantError::NotFound(id) => format!("Tenant not found: {}", id),
            TenantError::PlanNotConfigured(plan_id) => {
                format!("Plan '{}' is not present in the catalog", plan_id)
            }
            TenantError::InvalidState { current, attempted } => {
                format!("Cannot {} tenant in {} state", attempted, current)
            }
            TenantError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            TenantError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TenantError::Infrastructure(_))
    }

    /// Returns true if this error must be alerted to operators.
    ///
    /// Missing plans and store failures are operational issues; the rest
    /// are routine caller mistakes.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            TenantError::PlanNotConfigured(_) | TenantError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for TenantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TenantError {}

impl From<DomainError> for TenantError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::TenantNotFound => TenantError::Infrastructure(err.to_string()),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => TenantError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => TenantError::InvalidState {
                current: "unknown".to_string(),
                attempted: err.message,
            },
            _ => TenantError::Infrastructure(err.to_string()),
        }
    }
}

impl From<TenantError> for DomainError {
    fn from(err: TenantError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanId;

    #[test]
    fn not_found_maps_to_tenant_not_found_code() {
        let id = TenantId::new();
        let err = TenantError::not_found(id);
        assert_eq!(err.code(), ErrorCode::TenantNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn plan_not_configured_is_operational() {
        let err = TenantError::plan_not_configured(PlanId::new("ghost").unwrap());
        assert!(err.is_operational());
        assert_eq!(err.code(), ErrorCode::PlanNotConfigured);
    }

    #[test]
    fn invalid_state_message_names_both_states() {
        let err = TenantError::invalid_state("active", "extend trial for");
        let msg = err.message();
        assert!(msg.contains("active"));
        assert!(msg.contains("extend trial"));
    }

    #[test]
    fn infrastructure_errors_are_retryable() {
        assert!(TenantError::infrastructure("connection reset").is_retryable());
        assert!(!TenantError::not_found(TenantId::new()).is_retryable());
    }

    #[test]
    fn converts_to_domain_error() {
        let err = TenantError::not_found(TenantId::new());
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, err.code());
    }

    #[test]
    fn converts_from_domain_error() {
        let domain = DomainError::new(ErrorCode::DatabaseError, "pool exhausted");
        let err: TenantError = domain.into();
        assert!(matches!(err, TenantError::Infrastructure(_)));
    }
}
