//! Ports - contracts between the engine and its collaborators.

mod tenant_store;

pub use tenant_store::TenantStore;
