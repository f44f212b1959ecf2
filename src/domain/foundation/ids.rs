//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a tenant (a subscribing lubricentro).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Creates a new random TenantId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TenantId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier for a plan in the catalog ("starter", "plus", "premium").
///
/// Plan identifiers are lowercase alphanumeric slugs, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Creates a PlanId, validating the slug format.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("plan_id"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "plan_id",
                "must be a lowercase slug",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the plan identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlanId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier for a requesting principal (an employee or superadmin account).
///
/// Issued by the external identity provider; opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Creates a PrincipalId from a non-empty identity-provider subject.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("principal_id"));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_id_new_generates_unique_ids() {
        let id1 = TenantId::new();
        let id2 = TenantId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn tenant_id_roundtrips_through_string() {
        let id = TenantId::new();
        let parsed: TenantId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn tenant_id_serializes_transparently() {
        let id = TenantId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn plan_id_accepts_lowercase_slug() {
        let id = PlanId::new("starter").unwrap();
        assert_eq!(id.as_str(), "starter");
    }

    #[test]
    fn plan_id_rejects_empty() {
        assert!(PlanId::new("").is_err());
    }

    #[test]
    fn plan_id_rejects_uppercase() {
        assert!(PlanId::new("Premium").is_err());
    }

    #[test]
    fn plan_id_rejects_spaces() {
        assert!(PlanId::new("my plan").is_err());
    }

    #[test]
    fn principal_id_accepts_provider_subject() {
        let id = PrincipalId::new("auth0|abc123").unwrap();
        assert_eq!(id.as_str(), "auth0|abc123");
    }

    #[test]
    fn principal_id_rejects_blank() {
        assert!(PrincipalId::new("   ").is_err());
    }
}
