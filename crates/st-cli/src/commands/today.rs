//! One-shot "today" total.

use anyhow::Result;
use serde::Serialize;
use st_core::{LocalClock, LogStatus, format_hours_minutes, uptime};

use super::{build_engine, persist, tick_once};
use crate::Config;

#[derive(Debug, Serialize)]
struct TodayOutput {
    date: String,
    active_seconds: u64,
    formatted: String,
    /// Set when the value came from the uptime estimate, not the log.
    approximate: bool,
}

pub fn run(config: &Config, json: bool) -> Result<()> {
    let (store, mut engine) = build_engine(config);
    let outcome = tick_once(config, &mut engine)?;
    if outcome.changed {
        persist(&store, &engine);
    }

    // With no log and no history at all, fall back to a display-only
    // uptime-derived estimate. It is never persisted.
    let no_data =
        outcome.log_status == LogStatus::Missing && engine.totals().values().all(|&s| s == 0);
    let (seconds, approximate) = if no_data {
        match uptime::uptime_seconds() {
            Some(up) => (uptime::estimate_active_today(&LocalClock, up), true),
            None => (outcome.today_seconds, false),
        }
    } else {
        (outcome.today_seconds, false)
    };

    let output = TodayOutput {
        date: outcome.today.to_string(),
        active_seconds: seconds,
        formatted: format_hours_minutes(seconds),
        approximate,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if approximate {
        println!("{} ~{} (estimated from uptime)", output.date, output.formatted);
    } else {
        println!("{} {}", output.date, output.formatted);
    }
    Ok(())
}
