//! Daily aggregation, finalization, and the display cache.
//!
//! The [`Engine`] owns all accounting state explicitly: the per-day totals
//! mapping, the finalized set, the last successfully parsed log snapshot,
//! and a short-lived cache of the formatted "today" total. Presentation
//! code holds an engine and calls [`Engine::tick`] on every poll and
//! [`Engine::formatted_today`] at arbitrary additional times.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::clock::Clock;
use crate::day::{DayKey, DayTotals};
use crate::event::{LogError, TransitionEvent};
use crate::format::format_hours_minutes;
use crate::reconstruct::{DayWindow, active_seconds};

/// Days a date must age past "today" before it is frozen. Yesterday stays
/// provisional for one full day so activity straddling midnight is absorbed.
const FINALIZE_AGE_DAYS: i64 = 2;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Trailing days swept on each tick in addition to today.
    pub history_days: u32,

    /// How long a formatted total is served from cache. Deliberately
    /// shorter than the poll interval so consecutive ticks never serve a
    /// stale miss.
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_days: 7,
            cache_ttl: Duration::from_secs(3),
        }
    }
}

/// Internal invariant violations surfaced at the tick boundary.
///
/// These are non-fatal: the caller reports a transient error state and the
/// next tick attempts again independently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A reconstructed total exceeded the day's length, which can only
    /// happen when the log violates its non-decreasing-timestamp contract.
    #[error("computed {seconds}s of activity for {day}, exceeding the {day_len}s day")]
    TotalExceedsDay {
        day: DayKey,
        seconds: u64,
        day_len: u64,
    },
}

/// How the transition log looked on the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    /// The log was read and parsed.
    Fresh,
    /// The log does not exist yet; treated as zero activity.
    Missing,
    /// The log was unreadable or malformed; previous data kept.
    Stale,
}

/// Result of one aggregation tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Today's date key.
    pub today: DayKey,
    /// Today's total active seconds after this tick.
    pub today_seconds: u64,
    /// Historical days recomputed by the sweep.
    pub recomputed: Vec<DayKey>,
    /// Day newly frozen by this tick, if a boundary crossing promoted one.
    pub promoted: Option<DayKey>,
    /// Whether any total changed; the trigger for persisting the mapping.
    pub changed: bool,
    /// Log read status, for presentation only.
    pub log_status: LogStatus,
}

#[derive(Debug, Clone)]
struct CachedDisplay {
    text: String,
    computed_at: DateTime<Utc>,
}

/// The activity-time accounting engine.
#[derive(Debug)]
pub struct Engine<C: Clock> {
    clock: C,
    config: EngineConfig,
    totals: DayTotals,
    finalized: BTreeSet<DayKey>,
    /// Last successfully parsed log content, kept so the display accessor
    /// can recompute between ticks without touching the file.
    snapshot: Vec<TransitionEvent>,
    last_tick_date: Option<NaiveDate>,
    cache: Option<CachedDisplay>,
}

impl<C: Clock> Engine<C> {
    /// Creates an engine with no recorded history.
    pub fn new(clock: C, config: EngineConfig) -> Self {
        Self::with_totals(clock, config, DayTotals::new())
    }

    /// Creates an engine from totals loaded out of the stats store.
    ///
    /// The finalized set is rebuilt empty on every start, so a restart
    /// within the grace window re-opens recent days to revision.
    pub fn with_totals(clock: C, config: EngineConfig, totals: DayTotals) -> Self {
        Self {
            clock,
            config,
            totals,
            finalized: BTreeSet::new(),
            snapshot: Vec::new(),
            last_tick_date: None,
            cache: None,
        }
    }

    /// The per-day mapping, for persistence and reporting.
    pub const fn totals(&self) -> &DayTotals {
        &self.totals
    }

    /// Whether a day has been frozen this process run.
    pub fn is_finalized(&self, day: DayKey) -> bool {
        self.finalized.contains(&day)
    }

    /// Today's recorded total, zero if never computed.
    pub fn today_seconds(&self) -> u64 {
        let key = DayKey::new(self.clock.today());
        self.totals.get(&key).copied().unwrap_or(0)
    }

    /// Runs one aggregation tick over a freshly attempted log read.
    ///
    /// Today is always recomputed. Each of the trailing `history_days` days
    /// is recomputed only while provisional: yesterday unconditionally, and
    /// older days only when no total exists for them yet. On a day-boundary
    /// crossing the day aged two days past the new today is frozen, after
    /// the sweep has written its final value.
    pub fn tick(
        &mut self,
        log: Result<Vec<TransitionEvent>, LogError>,
    ) -> Result<TickOutcome, EngineError> {
        let today = self.clock.today();
        let crossed = self.last_tick_date.is_some_and(|prev| prev != today);
        self.last_tick_date = Some(today);
        let today_key = DayKey::new(today);

        let pending_promotion = if crossed {
            today
                .checked_sub_days(chrono::Days::new(FINALIZE_AGE_DAYS.unsigned_abs()))
                .map(DayKey::new)
        } else {
            None
        };

        let log_status = match log {
            Ok(events) => {
                self.snapshot = events;
                LogStatus::Fresh
            }
            Err(LogError::Missing) => {
                self.snapshot.clear();
                LogStatus::Missing
            }
            Err(err @ (LogError::Malformed(_) | LogError::Io(_))) => {
                tracing::warn!(error = %err, "transition log unreadable, keeping previous totals");
                let promoted = pending_promotion.filter(|day| self.finalized.insert(*day));
                return Ok(TickOutcome {
                    today: today_key,
                    today_seconds: self.totals.get(&today_key).copied().unwrap_or(0),
                    recomputed: Vec::new(),
                    promoted,
                    changed: false,
                    log_status: LogStatus::Stale,
                });
            }
        };

        let now = self.clock.now().timestamp();
        let computed = self.recompute(today, today_key, now);

        // Promotion is membership only; it must stick even when the
        // recomputation failed, or the day would stay provisional for the
        // rest of the process lifetime.
        let promoted = pending_promotion.filter(|day| self.finalized.insert(*day));
        if let Some(day) = promoted {
            tracing::debug!(%day, "finalized daily total");
        }
        let (today_seconds, recomputed, changed) = computed?;

        Ok(TickOutcome {
            today: today_key,
            today_seconds,
            recomputed,
            promoted,
            changed,
            log_status,
        })
    }

    /// Recomputes today and sweeps the trailing provisional days.
    fn recompute(
        &mut self,
        today: NaiveDate,
        today_key: DayKey,
        now: i64,
    ) -> Result<(u64, Vec<DayKey>, bool), EngineError> {
        let mut changed = false;
        let mut recomputed = Vec::new();

        let today_seconds = self.compute_day(today, Some(now))?;
        changed |= self.totals.insert(today_key, today_seconds) != Some(today_seconds);

        for offset in 1..=i64::from(self.config.history_days) {
            let Some(date) = today.checked_sub_days(chrono::Days::new(offset.unsigned_abs()))
            else {
                break;
            };
            let key = DayKey::new(date);
            if self.finalized.contains(&key) {
                continue;
            }
            let is_yesterday = offset == 1;
            if !is_yesterday && self.totals.contains_key(&key) {
                continue;
            }
            let seconds = self.compute_day(date, None)?;
            changed |= self.totals.insert(key, seconds) != Some(seconds);
            recomputed.push(key);
        }

        Ok((today_seconds, recomputed, changed))
    }

    /// Returns today's formatted total, served from cache while fresh.
    ///
    /// A cache miss recomputes from the held snapshot with a fresh "now";
    /// it never touches the persisted totals, which only ticks mutate.
    pub fn formatted_today(&mut self) -> String {
        let now = self.clock.now();
        if let Some(cache) = &self.cache {
            let fresh = now
                .signed_duration_since(cache.computed_at)
                .to_std()
                .is_ok_and(|age| age < self.config.cache_ttl);
            if fresh {
                return cache.text.clone();
            }
        }

        let (start, end) = self.clock.day_bounds(self.clock.today());
        let seconds = active_seconds(
            &self.snapshot,
            &DayWindow { start, end },
            Some(now.timestamp()),
        );
        let text = format_hours_minutes(seconds);
        self.cache = Some(CachedDisplay {
            text: text.clone(),
            computed_at: now,
        });
        text
    }

    fn compute_day(&self, date: NaiveDate, now: Option<i64>) -> Result<u64, EngineError> {
        let (start, end) = self.clock.day_bounds(date);
        let window = DayWindow { start, end };
        let seconds = active_seconds(&self.snapshot, &window, now);
        let day_len = window.len_seconds();
        if seconds > day_len {
            return Err(EngineError::TotalExceedsDay {
                day: DayKey::new(date),
                seconds,
                day_len,
            });
        }
        Ok(seconds)
    }
}
