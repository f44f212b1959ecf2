//! Domain layer - the entitlement engine's core types and logic.

pub mod access;
pub mod entitlement;
pub mod foundation;
pub mod plan;
pub mod tenant;
