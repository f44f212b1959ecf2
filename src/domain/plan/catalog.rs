//! Plan catalog - static table of subscription plans.
//!
//! Maps a plan identifier to its limits and pricing. Read-only at runtime;
//! constructed once at process start and injected wherever limits are
//! resolved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::PlanId;

/// A subscription plan and its limits.
///
/// # Standard Catalog
///
/// | Plan | Users | Services/Month |
/// |---------|-------|----------------|
/// | starter | 2 | 50 |
/// | plus | 5 | 150 |
/// | premium | 10 | Unlimited |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Catalog identifier.
    pub id: PlanId,
    /// Display name shown on dashboards and invoices.
    pub name: String,
    /// Maximum provisioned users.
    pub max_users: u32,
    /// Maximum services per calendar month. None = unlimited.
    pub max_monthly_services: Option<u32>,
    /// Monthly price in cents.
    pub monthly_price_cents: i64,
    /// Semiannual price in cents.
    pub semiannual_price_cents: i64,
}

impl Plan {
    /// True when the plan places no ceiling on monthly services.
    pub fn is_unlimited(&self) -> bool {
        self.max_monthly_services.is_none()
    }
}

/// Read-only catalog of available plans.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: HashMap<PlanId, Plan>,
}

impl PlanCatalog {
    /// Builds a catalog from an explicit plan list.
    pub fn new(plans: Vec<Plan>) -> Self {
        Self {
            plans: plans.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// The standard three-tier catalog.
    pub fn standard() -> Self {
        let starter = PlanId::new("starter").expect("static plan id");
        let plus = PlanId::new("plus").expect("static plan id");
        let premium = PlanId::new("premium").expect("static plan id");

        Self::new(vec![
            Plan {
                id: starter,
                name: "Starter".to_string(),
                max_users: 2,
                max_monthly_services: Some(50),
                monthly_price_cents: 29_900,
                semiannual_price_cents: 149_900,
            },
            Plan {
                id: plus,
                name: "Plus".to_string(),
                max_users: 5,
                max_monthly_services: Some(150),
                monthly_price_cents: 49_900,
                semiannual_price_cents: 249_900,
            },
            Plan {
                id: premium,
                name: "Premium".to_string(),
                max_users: 10,
                max_monthly_services: None,
                monthly_price_cents: 79_900,
                semiannual_price_cents: 399_900,
            },
        ])
    }

    /// Looks up a plan by id.
    ///
    /// Returns `None` for unknown ids; callers treat a missing plan for an
    /// active tenant as a configuration error, not a quota denial.
    pub fn get(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.get(id)
    }

    /// True when the catalog contains the given plan id.
    pub fn contains(&self, id: &PlanId) -> bool {
        self.plans.contains_key(id)
    }

    /// All plans, for catalog listings.
    pub fn plans(&self) -> impl Iterator<Item = &Plan> {
        self.plans.values()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_id(s: &str) -> PlanId {
        PlanId::new(s).unwrap()
    }

    #[test]
    fn standard_catalog_has_three_plans() {
        let catalog = PlanCatalog::standard();
        assert_eq!(catalog.plans().count(), 3);
    }

    #[test]
    fn starter_allows_2_users_and_50_services() {
        let catalog = PlanCatalog::standard();
        let starter = catalog.get(&plan_id("starter")).unwrap();
        assert_eq!(starter.max_users, 2);
        assert_eq!(starter.max_monthly_services, Some(50));
        assert!(!starter.is_unlimited());
    }

    #[test]
    fn plus_allows_5_users_and_150_services() {
        let catalog = PlanCatalog::standard();
        let plus = catalog.get(&plan_id("plus")).unwrap();
        assert_eq!(plus.max_users, 5);
        assert_eq!(plus.max_monthly_services, Some(150));
    }

    #[test]
    fn premium_has_unlimited_services() {
        let catalog = PlanCatalog::standard();
        let premium = catalog.get(&plan_id("premium")).unwrap();
        assert_eq!(premium.max_monthly_services, None);
        assert!(premium.is_unlimited());
    }

    #[test]
    fn unknown_plan_returns_none() {
        let catalog = PlanCatalog::standard();
        assert!(catalog.get(&plan_id("enterprise")).is_none());
        assert!(!catalog.contains(&plan_id("enterprise")));
    }

    #[test]
    fn custom_catalog_overrides_standard() {
        let catalog = PlanCatalog::new(vec![Plan {
            id: plan_id("pilot"),
            name: "Pilot".to_string(),
            max_users: 1,
            max_monthly_services: Some(5),
            monthly_price_cents: 0,
            semiannual_price_cents: 0,
        }]);

        assert!(catalog.contains(&plan_id("pilot")));
        assert!(!catalog.contains(&plan_id("starter")));
    }
}
