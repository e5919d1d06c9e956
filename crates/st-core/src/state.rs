//! Coarse session activity states.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The session state recorded by a transition event.
///
/// This enum encodes the valid log states, preventing invalid string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    /// The session became active.
    Active,
    /// The session became inactive.
    Inactive,
}

/// Error returned when parsing an unknown activity state string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid activity state: {value}")]
pub struct UnknownActivityState {
    pub value: String,
}

impl ActivityState {
    /// String representation for log and display use.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Returns true for [`Self::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityState {
    type Err = UnknownActivityState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UnknownActivityState {
                value: s.to_string(),
            }),
        }
    }
}
