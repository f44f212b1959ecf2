//! Payment and billing value objects for the tenant aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Payment standing of a tenant's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Current period is paid.
    Paid,
    /// A payment is due but not yet overdue.
    Pending,
    /// Payment missed; set on deactivation.
    Overdue,
}

/// Billing cadence chosen at activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalType {
    Monthly,
    Semiannual,
}

impl RenewalType {
    /// Length of one billing period in months.
    pub fn period_months(&self) -> i64 {
        match self {
            RenewalType::Monthly => 1,
            RenewalType::Semiannual => 6,
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    MercadoPago,
}

/// A recorded payment event, appended to the tenant's payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// When the payment was recorded.
    pub date: Timestamp,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Payment channel.
    pub method: PaymentMethod,
    /// External receipt or transaction reference.
    pub reference: String,
}

/// Why a tenant was deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationReason {
    /// Subscription period ended without renewal (expiration sweep).
    SubscriptionExpired,
    /// Manual cancellation from admin tooling.
    ManualCancellation,
    /// Payment could not be collected.
    PaymentFailure,
}
