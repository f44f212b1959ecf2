//! Structured validation results.
//!
//! The orchestrator returns these instead of throwing: callers branch on
//! the denial kind, and the UI maps the suggested action to a
//! call-to-action. A tagged sum type keeps the shape honest - no bag of
//! optional fields that only make sense in some branches.

use serde::{Deserialize, Serialize};

use super::QuotaSnapshot;

/// Classification of a denial, mirroring the engine's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// No principal, or the account is not active.
    Authentication,
    /// The role gate refused the action.
    Permission,
    /// A usage ceiling was reached.
    QuotaExceeded,
    /// The trial or paid period has lapsed.
    SubscriptionExpired,
    /// Referenced plan missing from the catalog. Operational fault.
    Configuration,
    /// Store unreachable or timed out. Fail closed.
    System,
}

impl DenialKind {
    /// True for denials operators must be alerted about; the rest are
    /// routine.
    pub fn is_operational(&self) -> bool {
        matches!(self, DenialKind::Configuration | DenialKind::System)
    }
}

/// Call-to-action hint the UI layer maps to a button or link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    ContactSupport,
    UpgradePlan,
    ExtendTrial,
    LoginRequired,
}

/// A denial with everything the caller needs to react.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    pub kind: DenialKind,
    /// Human-readable, user-safe message. Never raw internal detail.
    pub message: String,
    /// Numeric snapshot for quota denials.
    pub details: Option<QuotaSnapshot>,
    pub suggested_action: Option<SuggestedAction>,
}

/// Outcome of validating an action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationResult {
    /// The action may proceed.
    Allowed,
    /// The action is denied.
    Denied(Denial),
}

impl ValidationResult {
    /// Builds a denial without quota details.
    pub fn denied(kind: DenialKind, message: impl Into<String>) -> Self {
        ValidationResult::Denied(Denial {
            kind,
            message: message.into(),
            details: None,
            suggested_action: None,
        })
    }

    /// Builds a denial carrying a suggested call-to-action.
    pub fn denied_with_action(
        kind: DenialKind,
        message: impl Into<String>,
        suggested_action: SuggestedAction,
    ) -> Self {
        ValidationResult::Denied(Denial {
            kind,
            message: message.into(),
            details: None,
            suggested_action: Some(suggested_action),
        })
    }

    /// True when the action may proceed.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Allowed)
    }

    /// Alias for [`Self::is_valid`], matching caller vocabulary.
    pub fn can_proceed(&self) -> bool {
        self.is_valid()
    }

    /// The denial, if any.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            ValidationResult::Allowed => None,
            ValidationResult::Denied(denial) => Some(denial),
        }
    }

    /// The denial kind, if any.
    pub fn error_kind(&self) -> Option<DenialKind> {
        self.denial().map(|d| d.kind)
    }
}
