//! Calendar-month key for the per-month usage history.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Timestamp, ValidationError};

/// A calendar month in "YYYY-MM" form.
///
/// Used as the key of the tenant's per-month service usage history.
/// Orders chronologically, so the history map stays sorted by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a MonthKey, validating the month is 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range("month", 1, 12, month as i32));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given timestamp (UTC).
    pub fn from_timestamp(ts: &Timestamp) -> Self {
        let dt = ts.as_datetime();
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or_else(|| {
            ValidationError::invalid_format("month_key", "expected YYYY-MM")
        })?;
        let year: i32 = year
            .parse()
            .map_err(|_| ValidationError::invalid_format("month_key", "invalid year"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| ValidationError::invalid_format("month_key", "invalid month"))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn formats_as_yyyy_mm() {
        let key = MonthKey::new(2026, 3).unwrap();
        assert_eq!(key.to_string(), "2026-03");
    }

    #[test]
    fn parses_from_yyyy_mm() {
        let key: MonthKey = "2026-11".parse().unwrap();
        assert_eq!(key.year(), 2026);
        assert_eq!(key.month(), 11);
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(MonthKey::new(2026, 0).is_err());
        assert!(MonthKey::new(2026, 13).is_err());
        assert!("2026-13".parse::<MonthKey>().is_err());
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("202603".parse::<MonthKey>().is_err());
        assert!("march-2026".parse::<MonthKey>().is_err());
    }

    #[test]
    fn derives_from_timestamp() {
        let key = MonthKey::from_timestamp(&ts("2026-08-28T12:00:00Z"));
        assert_eq!(key.to_string(), "2026-08");
    }

    #[test]
    fn orders_chronologically() {
        let dec: MonthKey = "2025-12".parse().unwrap();
        let jan: MonthKey = "2026-01".parse().unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn serializes_as_string() {
        let key = MonthKey::new(2026, 8).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2026-08\"");

        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
