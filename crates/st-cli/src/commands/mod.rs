//! CLI command implementations.

pub mod report;
pub mod today;
pub mod watch;

use anyhow::Context;
use st_core::{DayTotals, Engine, LocalClock};
use st_store::StatsStore;

use crate::Config;

/// Opens the stats store and loads persisted totals.
///
/// Malformed content degrades to an empty mapping with a warning; the
/// broken file stays on disk until the next save replaces it.
pub(crate) fn open_store(config: &Config) -> (StatsStore, DayTotals) {
    let store = StatsStore::new(&config.stats_path);
    let totals = match store.load() {
        Ok(totals) => totals,
        Err(err) => {
            tracing::warn!(error = %err, "could not load stored totals, starting empty");
            DayTotals::new()
        }
    };
    (store, totals)
}

/// Builds an engine seeded with the persisted totals.
pub(crate) fn build_engine(config: &Config) -> (StatsStore, Engine<LocalClock>) {
    let (store, totals) = open_store(config);
    let engine = Engine::with_totals(LocalClock, config.engine_config(), totals);
    (store, engine)
}

/// Persists the engine's totals, degrading failures to a warning: the
/// in-memory mapping stays authoritative for the rest of the run.
pub(crate) fn persist(store: &StatsStore, engine: &Engine<LocalClock>) {
    if let Err(err) = store.save(engine.totals()) {
        tracing::warn!(error = %err, "failed to persist daily totals");
    }
}

/// One synchronous tick for the one-shot commands.
pub(crate) fn tick_once(
    config: &Config,
    engine: &mut Engine<LocalClock>,
) -> anyhow::Result<st_core::TickOutcome> {
    let log = st_core::read_transition_log(&config.log_path);
    engine
        .tick(log)
        .context("activity accounting failed for this tick")
}
