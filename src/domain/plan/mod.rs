//! Plan module - the static plan catalog.

mod catalog;

pub use catalog::{Plan, PlanCatalog};
