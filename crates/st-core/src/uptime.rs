//! Boot-time fallback estimate.
//!
//! When no transition log exists and no historical totals were ever
//! recorded, presentation code may show a best-effort approximation derived
//! from system uptime. The estimate is advisory, display-only data and is
//! never written into the persisted per-day mapping.

use std::path::Path;

use crate::clock::Clock;

const PROC_UPTIME: &str = "/proc/uptime";

/// Reads system uptime in whole seconds from `/proc/uptime`.
#[must_use]
pub fn uptime_seconds() -> Option<u64> {
    uptime_seconds_from(Path::new(PROC_UPTIME))
}

/// Reads uptime from a specific file, `/proc/uptime` format: the first
/// whitespace-separated field is seconds since boot as a decimal.
#[must_use]
pub fn uptime_seconds_from(path: &Path) -> Option<u64> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            tracing::debug!(path = ?path, error = %err, "uptime source unavailable");
            return None;
        }
    };
    parse_uptime(&content)
}

fn parse_uptime(content: &str) -> Option<u64> {
    let first = content.split_whitespace().next()?;
    let secs: f64 = first.parse().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "checked non-negative and finite above"
        )]
        Some(secs as u64)
    } else {
        None
    }
}

/// Estimates today's active seconds from uptime alone.
///
/// The machine cannot have been used today for longer than it has been up,
/// nor longer than the day has lasted so far.
#[must_use]
pub fn estimate_active_today<C: Clock>(clock: &C, uptime_secs: u64) -> u64 {
    let now = clock.now().timestamp();
    let (day_start, _) = clock.day_bounds(clock.today());
    let elapsed_today = (now - day_start).max(0).unsigned_abs();
    uptime_secs.min(elapsed_today)
}
