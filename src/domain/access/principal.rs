//! The requesting principal, as supplied by the identity provider.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PrincipalId, TenantId};

/// Role of a principal within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator. Bypasses role and quota checks entirely.
    Superadmin,
    /// Shop owner/manager of one tenant.
    Admin,
    /// Shop employee of one tenant.
    User,
}

impl Role {
    /// True for roles allowed to administer tenant accounts.
    pub fn is_admin_or_above(&self) -> bool {
        matches!(self, Role::Superadmin | Role::Admin)
    }
}

/// Account standing of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Pending,
    Inactive,
}

/// The authenticated caller of a request.
///
/// Supplied per request by the external identity/session provider; this
/// crate never authenticates credentials itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    pub account_status: AccountStatus,
    /// The tenant this principal belongs to. None for superadmins.
    pub tenant_id: Option<TenantId>,
}

impl Principal {
    /// True when the account may act at all.
    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }
}
