//! Trailing-days report.

use anyhow::Result;
use chrono::Days;
use serde::Serialize;
use st_core::{Clock, DayKey, Engine, LocalClock, format_hours_minutes};

use super::{build_engine, persist, tick_once};
use crate::Config;

#[derive(Debug, Serialize)]
struct ReportRow {
    date: String,
    active_seconds: u64,
    formatted: String,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    days: Vec<ReportRow>,
    total_seconds: u64,
    total_formatted: String,
}

pub fn run(config: &Config, days: u32, json: bool) -> Result<()> {
    let (store, mut engine) = build_engine(config);
    let outcome = tick_once(config, &mut engine)?;
    if outcome.changed {
        persist(&store, &engine);
    }

    let report = collect(&engine, days);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for row in &report.days {
            println!("{}  {:>8}", row.date, row.formatted);
        }
        println!("{:-<22}", "");
        println!("{:>12}  {:>8}", "total", report.total_formatted);
    }
    Ok(())
}

/// Collects the trailing `days` totals ending today, oldest first. Days
/// with no recorded total render as zero.
fn collect(engine: &Engine<LocalClock>, days: u32) -> ReportOutput {
    let today = LocalClock.today();
    let mut rows = Vec::new();
    let mut total_seconds: u64 = 0;

    for offset in (0..days.max(1)).rev() {
        let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            continue;
        };
        let key = DayKey::new(date);
        let seconds = engine.totals().get(&key).copied().unwrap_or(0);
        total_seconds += seconds;
        rows.push(ReportRow {
            date: key.to_string(),
            active_seconds: seconds,
            formatted: format_hours_minutes(seconds),
        });
    }

    ReportOutput {
        days: rows,
        total_seconds,
        total_formatted: format_hours_minutes(total_seconds),
    }
}
