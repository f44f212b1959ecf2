//! PostgreSQL adapters.

mod tenant_store;

pub use tenant_store::PostgresTenantStore;
