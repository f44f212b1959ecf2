//! Action kinds subject to authorization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The kinds of actions the engine authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Register an oil-change service. Metered against the monthly quota.
    CreateService,
    /// Provision an employee account. Metered against the user quota.
    CreateUser,
    /// Edit or disable existing employee accounts.
    ManageUsers,
    /// View usage and revenue reports.
    ViewReports,
    /// Miscellaneous administrative operations.
    AdminAction,
}

impl ActionKind {
    /// Wire name used by form handlers and the permission table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateService => "create_service",
            ActionKind::CreateUser => "create_user",
            ActionKind::ManageUsers => "manage_users",
            ActionKind::ViewReports => "view_reports",
            ActionKind::AdminAction => "admin_action",
        }
    }

    /// True for actions counted against a tenant quota.
    ///
    /// Only these require fetching the tenant and resolving limits; the
    /// rest pass quota by definition.
    pub fn is_metered(&self) -> bool {
        matches!(self, ActionKind::CreateService | ActionKind::CreateUser)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_service" => Ok(ActionKind::CreateService),
            "create_user" => Ok(ActionKind::CreateUser),
            "manage_users" => Ok(ActionKind::ManageUsers),
            "view_reports" => Ok(ActionKind::ViewReports),
            "admin_action" => Ok(ActionKind::AdminAction),
            other => Err(ValidationError::invalid_format(
                "action_kind",
                format!("unrecognized action '{}'", other),
            )),
        }
    }
}
