//! TenantStore port - persistence contract for the Tenant aggregate.
//!
//! The tenant document is the only mutable shared resource in the engine.
//! Counter writes go through [`TenantStore::increment_usage`], the atomic
//! conditional update; everything else persists the whole aggregate.
//!
//! # Design
//!
//! The increment must be a single conditional operation at the storage
//! layer ("add 1 only while current < max"). Two stateless instances
//! racing on the same tenant must not both be admitted once the tenant is
//! at its limit; an in-process lock cannot give that guarantee, so the
//! condition lives in the store.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MonthKey, TenantId, Timestamp};
use crate::domain::tenant::Tenant;

/// Port for Tenant aggregate persistence.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Fetch a tenant by id. Returns `None` when it does not exist.
    async fn get(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError>;

    /// Persist a new tenant.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the id is already taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, tenant: &Tenant) -> Result<(), DomainError>;

    /// Persist lifecycle/billing changes to an existing tenant.
    ///
    /// # Errors
    ///
    /// - `TenantNotFound` if the tenant does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, tenant: &Tenant) -> Result<(), DomainError>;

    /// Atomically add one service usage for `month`, only while the
    /// month's recorded usage is below `max`.
    ///
    /// Returns `Ok(true)` when the increment was admitted, `Ok(false)`
    /// when the tenant was already at the limit (nothing mutated).
    /// `max = None` means unlimited and always admits.
    ///
    /// The check and the write are one storage-level operation; callers
    /// must not pre-read and then write separately.
    async fn increment_usage(
        &self,
        id: &TenantId,
        month: MonthKey,
        max: Option<u32>,
    ) -> Result<bool, DomainError>;

    /// All Active tenants whose paid period ends before `cutoff`.
    ///
    /// Feeds the expiration sweep.
    async fn find_active_expiring_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Tenant>, DomainError>;
}
