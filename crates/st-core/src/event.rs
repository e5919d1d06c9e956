//! Transition events and log access.
//!
//! The transition log is an external, append-only JSON array of
//! `{ "timestamp": <unix seconds>, "state": "active" | "inactive" }`
//! records, ordered non-decreasing by timestamp. The engine only reads it;
//! ordering and deduplication are the producer's contract, not ours.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::ActivityState;

/// A timestamped record of the session becoming active or inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// When the transition occurred, in Unix epoch seconds.
    pub timestamp: i64,
    /// The state the session entered.
    pub state: ActivityState,
}

/// Failures while obtaining the transition log.
///
/// The variants carry distinct handling policies: [`LogError::Missing`] is
/// expected on first run and means zero activity; the other variants mean
/// the previously held data stays authoritative.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file does not exist yet.
    #[error("transition log not found")]
    Missing,
    /// The log file exists but its content is not the expected format.
    /// Plausibly a write-in-progress by the producer; transient.
    #[error("transition log is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The log file could not be read.
    #[error("failed to read transition log: {0}")]
    Io(#[from] io::Error),
}

impl LogError {
    /// Maps an I/O error, folding `NotFound` into the expected-absence arm.
    #[must_use]
    pub fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::Missing
        } else {
            Self::Io(err)
        }
    }
}

/// Parses the raw log content into events.
pub fn parse_transitions(content: &str) -> Result<Vec<TransitionEvent>, LogError> {
    let events: Vec<TransitionEvent> = serde_json::from_str(content)?;
    Ok(events)
}

/// Reads and parses the transition log synchronously.
///
/// Used by one-shot commands; the poll loop reads asynchronously and feeds
/// [`parse_transitions`] itself.
pub fn read_transition_log(path: &Path) -> Result<Vec<TransitionEvent>, LogError> {
    let content = std::fs::read_to_string(path).map_err(LogError::from_io)?;
    parse_transitions(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_log() {
        let content = r#"[
            {"timestamp": 1700000000, "state": "active"},
            {"timestamp": 1700003600, "state": "inactive"}
        ]"#;
        let events = parse_transitions(content).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 1_700_000_000);
        assert_eq!(events[0].state, ActivityState::Active);
        assert_eq!(events[1].state, ActivityState::Inactive);
    }

    #[test]
    fn parse_empty_array() {
        let events = parse_transitions("[]").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn parse_rejects_truncated_content() {
        let result = parse_transitions(r#"[{"timestamp": 1700000000, "sta"#);
        assert!(matches!(result, Err(LogError::Malformed(_))));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let result = parse_transitions(r#"{"timestamp": 1700000000}"#);
        assert!(matches!(result, Err(LogError::Malformed(_))));
    }

    #[test]
    fn read_missing_file_is_expected_absence() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_transition_log(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(LogError::Missing)));
    }

    #[test]
    fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transitions.json");
        std::fs::write(&path, r#"[{"timestamp": 42, "state": "active"}]"#).unwrap();
        let events = read_transition_log(&path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 42);
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = TransitionEvent {
            timestamp: 1_700_000_000,
            state: ActivityState::Inactive,
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: TransitionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
