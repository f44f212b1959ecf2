//! Trial policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::entitlement::TrialPolicy;

/// Trial entitlement configuration
///
/// Controls what new tenants get before choosing a plan. All values are
/// optional; the defaults match the standard onboarding offer.
#[derive(Debug, Clone, Deserialize)]
pub struct TrialConfig {
    /// Trial length in days
    #[serde(default = "default_days")]
    pub days: u32,

    /// Users a trial tenant may provision
    #[serde(default = "default_max_users")]
    pub max_users: u32,

    /// Services a trial tenant may create per month
    #[serde(default = "default_max_services")]
    pub max_services: u32,
}

impl TrialConfig {
    /// Validate trial configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.days == 0 {
            return Err(ValidationError::InvalidTrialDays);
        }
        if self.max_users == 0 {
            return Err(ValidationError::InvalidTrialLimits);
        }
        Ok(())
    }

    /// The domain policy this configuration describes.
    pub fn policy(&self) -> TrialPolicy {
        TrialPolicy {
            days: self.days,
            max_users: self.max_users,
            max_services: self.max_services,
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            max_users: default_max_users(),
            max_services: default_max_services(),
        }
    }
}

fn default_days() -> u32 {
    7
}

fn default_max_users() -> u32 {
    2
}

fn default_max_services() -> u32 {
    10
}
