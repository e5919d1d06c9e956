//! Activity-time accounting engine.
//!
//! This crate contains the fundamental types and logic for:
//! - Reconstruction: replaying activity transitions into per-day active seconds
//! - Aggregation: maintaining provisional and finalized daily totals
//! - Presentation support: duration formatting and a short-lived display cache

pub mod clock;
pub mod day;
mod engine;
pub mod event;
pub mod format;
mod reconstruct;
pub mod state;
pub mod uptime;

pub use clock::{Clock, LocalClock};
pub use day::{DayKey, DayKeyError, DayTotals};
pub use engine::{Engine, EngineConfig, EngineError, LogStatus, TickOutcome};
pub use event::{LogError, TransitionEvent, parse_transitions, read_transition_log};
pub use format::format_hours_minutes;
pub use reconstruct::{DayWindow, active_seconds};
pub use state::ActivityState;
