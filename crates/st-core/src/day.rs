//! Calendar-day keys for the per-day totals mapping.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used for keys in the persisted mapping.
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a day key string fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid day key (expected YYYY-MM-DD): {value}")]
pub struct DayKeyError {
    pub value: String,
}

/// A calendar date (local time zone) keying one daily total.
///
/// Serialized as `YYYY-MM-DD` so the persisted mapping stays stable and
/// lexicographic ordering matches chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl TryFrom<String> for DayKey {
    type Error = DayKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl std::str::FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_| DayKeyError {
                value: s.to_string(),
            })
    }
}

/// The per-day mapping from date to total active seconds.
///
/// Append-mostly: loaded wholesale from the stats store at startup and
/// persisted wholesale after each mutation batch.
pub type DayTotals = BTreeMap<DayKey, u64>;
