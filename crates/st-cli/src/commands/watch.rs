//! The recurring poll loop.
//!
//! A fixed-interval timer drives one aggregation tick at a time: the log is
//! read asynchronously, the engine replays it, and the totals are persisted
//! whenever they changed. No failure stops the loop; every error degrades
//! to stale or zero data and the next tick retries independently.

use std::future::Future;

use anyhow::Result;
use st_core::{LogError, LogStatus, parse_transitions};
use tokio::time::MissedTickBehavior;

use super::{build_engine, persist};
use crate::Config;

pub async fn run(config: &Config) -> Result<()> {
    run_until(config, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Runs the poll loop until `shutdown` completes.
///
/// The shutdown future is created once and polled by reference so a signal
/// arriving while a tick body runs is not lost.
async fn run_until(config: &Config, shutdown: impl Future<Output = ()>) -> Result<()> {
    let (store, mut engine) = build_engine(config);
    tracing::info!(
        log = ?config.log_path,
        stats = ?config.stats_path,
        interval_secs = config.poll_interval_secs,
        "watching transition log"
    );

    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut last_shown: Option<String> = None;
    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => {
                tracing::info!("stopping watch");
                break;
            }
            _ = ticker.tick() => {}
        }

        let log = read_log(&config.log_path).await;
        match engine.tick(log) {
            Ok(outcome) => {
                if outcome.changed {
                    persist(&store, &engine);
                }
                if outcome.log_status == LogStatus::Stale {
                    tracing::debug!(day = %outcome.today, "serving previous totals");
                }
                let shown = engine.formatted_today();
                if last_shown.as_deref() != Some(shown.as_str()) {
                    println!("{} {shown}", outcome.today);
                    last_shown = Some(shown);
                }
            }
            Err(err) => {
                // Transient: reported and retried on the next tick.
                tracing::error!(error = %err, "tick failed");
            }
        }
    }

    // Final save so a clean shutdown never loses the last mutation batch.
    persist(&store, &engine);
    Ok(())
}

/// Reads the transition log without blocking the scheduler.
async fn read_log(path: &std::path::Path) -> Result<Vec<st_core::TransitionEvent>, LogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(LogError::from_io)?;
    parse_transitions(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            log_path: dir.join("transitions.json"),
            stats_path: dir.join("stats.json"),
            poll_interval_secs: 1,
            cache_ttl_secs: 1,
            history_days: 7,
        }
    }

    #[tokio::test]
    async fn completed_shutdown_stops_loop_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        // An already-resolved shutdown future must win over the first tick
        // and still trigger the final save.
        run_until(&config, std::future::ready(())).await.unwrap();
        assert!(config.stats_path.exists());
    }

    #[tokio::test]
    async fn shutdown_after_first_tick_persists_totals() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::write(
            &config.log_path,
            r#"[{"timestamp": 0, "state": "active"}, {"timestamp": 600, "state": "inactive"}]"#,
        )
        .unwrap();

        // Let exactly one tick run, then stop.
        let grace = tokio::time::sleep(std::time::Duration::from_millis(200));
        run_until(&config, grace).await.unwrap();

        let stored = st_store::StatsStore::new(&config.stats_path).load().unwrap();
        assert!(!stored.is_empty());
    }
}
