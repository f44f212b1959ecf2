//! In-memory adapters for tests and local wiring.

mod tenant_store;

pub use tenant_store::InMemoryTenantStore;
