//! Role permission gate.
//!
//! Decides whether a principal's role may attempt an action, independent
//! of any quota. The action→roles table is static; actions missing from
//! it are denied outright.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{ActionKind, Principal, Role};

/// Result of a role check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDecision {
    /// The role may attempt the action (quota still applies).
    Allowed,
    /// The role may not attempt the action.
    Denied(String),
}

impl RoleDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RoleDecision::Allowed)
    }
}

static PERMISSION_TABLE: Lazy<HashMap<ActionKind, &'static [Role]>> = Lazy::new(|| {
    let mut table: HashMap<ActionKind, &'static [Role]> = HashMap::new();
    table.insert(ActionKind::CreateService, &[Role::Admin, Role::User]);
    table.insert(ActionKind::ViewReports, &[Role::Admin, Role::User]);
    table.insert(ActionKind::CreateUser, &[Role::Admin]);
    table.insert(ActionKind::ManageUsers, &[Role::Admin]);
    table.insert(ActionKind::AdminAction, &[Role::Admin]);
    table
});

/// Checks whether the principal's role permits the action.
///
/// Superadmin passes unconditionally. The caller is responsible for the
/// authentication precondition (account active); this gate assumes it.
pub fn check_role(principal: &Principal, action: ActionKind) -> RoleDecision {
    if principal.role == Role::Superadmin {
        return RoleDecision::Allowed;
    }

    match PERMISSION_TABLE.get(&action) {
        Some(roles) if roles.contains(&principal.role) => RoleDecision::Allowed,
        Some(_) => RoleDecision::Denied(format!(
            "role '{:?}' may not perform '{}'",
            principal.role, action
        )),
        None => RoleDecision::Denied(format!("unrecognized action '{}'", action)),
    }
}
