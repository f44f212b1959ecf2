//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by adding the specified number of months.
    ///
    /// Note: Uses 30 days per month approximation, matching the billing
    /// cadence used for subscription periods.
    pub fn add_months(&self, months: i64) -> Self {
        Self(self.0 + Duration::days(months * 30))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Whole days remaining until `end`, never negative, rounding any
    /// partial day up.
    ///
    /// A deadline later today counts as 1 remaining day; a deadline in the
    /// past counts as 0.
    pub fn days_until(&self, end: &Timestamp) -> u32 {
        let remaining = end.0.signed_duration_since(self.0);
        if remaining <= Duration::zero() {
            return 0;
        }
        let seconds = remaining.num_seconds();
        let days = (seconds + 86_399) / 86_400;
        days as u32
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
