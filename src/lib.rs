//! Lubricore - Tenant Entitlement & Usage-Quota Engine
//!
//! This crate decides, for a given lubricentro tenant and a requested action,
//! whether that action may proceed: role permissions, subscription lifecycle
//! state, and monthly usage counters composed into a single decision point.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
