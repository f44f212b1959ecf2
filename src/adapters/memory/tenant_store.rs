//! In-memory implementation of TenantStore.
//!
//! Backs tests and local wiring. The conditional usage increment performs
//! its check and mutation under one mutex guard, mirroring the atomicity
//! the PostgreSQL adapter gets from a single conditional UPDATE.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, MonthKey, TenantId, Timestamp};
use crate::domain::tenant::Tenant;
use crate::ports::TenantStore;

/// In-memory TenantStore.
#[derive(Debug, Default)]
pub struct InMemoryTenantStore {
    tenants: Mutex<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor seeded with existing tenants.
    pub fn with_tenants(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        Self {
            tenants: Mutex::new(tenants.into_iter().map(|t| (t.id, t)).collect()),
        }
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn get(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError> {
        Ok(self.tenants.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut tenants = self.tenants.lock().unwrap();
        if tenants.contains_key(&tenant.id) {
            return Err(DomainError::validation(
                "tenant_id",
                "Tenant already exists",
            ));
        }
        tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    async fn update(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut tenants = self.tenants.lock().unwrap();
        match tenants.get_mut(&tenant.id) {
            Some(existing) => {
                *existing = tenant.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::TenantNotFound,
                "Tenant not found",
            )),
        }
    }

    async fn increment_usage(
        &self,
        id: &TenantId,
        month: MonthKey,
        max: Option<u32>,
    ) -> Result<bool, DomainError> {
        let mut tenants = self.tenants.lock().unwrap();
        let tenant = tenants.get_mut(id).ok_or_else(|| {
            DomainError::new(ErrorCode::TenantNotFound, "Tenant not found")
        })?;

        let used = tenant.services_used_in(month);
        if let Some(max) = max {
            if used >= max {
                return Ok(false);
            }
        }

        let admitted = used + 1;
        tenant.services_used_history.insert(month, admitted);
        tenant.services_used_this_month = admitted;
        tenant.updated_at = Timestamp::now();
        Ok(true)
    }

    async fn find_active_expiring_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Tenant>, DomainError> {
        let tenants = self.tenants.lock().unwrap();
        Ok(tenants
            .values()
            .filter(|t| t.subscription_lapsed(cutoff))
            .cloned()
            .collect())
    }
}
