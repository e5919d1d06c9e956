//! Interval reconstruction.
//!
//! Replays transition events restricted to a day window and produces the
//! total active seconds within that window.
//!
//! # Algorithm Summary
//!
//! 1. Find the carry-in state: the state of the last event before the window
//! 2. Walk in-window events, opening on `active` and closing on `inactive`
//! 3. Close a trailing open interval at `now` (current day) or window end

use crate::event::TransitionEvent;

/// A half-open window `[start, end)` in Unix epoch seconds, normally one
/// local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    /// Length of the window in seconds.
    #[must_use]
    pub const fn len_seconds(&self) -> u64 {
        (self.end - self.start).unsigned_abs()
    }
}

/// Computes total active seconds strictly within `window`.
///
/// Events must be ordered non-decreasing by timestamp; they are taken as
/// given, with no defensive sorting or deduplication. `now` is supplied when
/// the window is the current day and caps the trailing open interval; past
/// days close at the window end.
///
/// Redundant transitions (active-while-open, inactive-while-closed) are
/// ignored, so the result never double-counts and never goes negative.
#[must_use]
pub fn active_seconds(events: &[TransitionEvent], window: &DayWindow, now: Option<i64>) -> u64 {
    // Carry-in: some earlier, unlogged state persists until the first event,
    // so only an explicit pre-window event can open the day active.
    let carry_in_active = events
        .iter()
        .take_while(|e| e.timestamp < window.start)
        .last()
        .is_some_and(|e| e.state.is_active());

    let mut open_since: Option<i64> = carry_in_active.then_some(window.start);
    let mut total: u64 = 0;

    for event in events
        .iter()
        .filter(|e| e.timestamp >= window.start && e.timestamp < window.end)
    {
        if event.state.is_active() {
            if open_since.is_none() {
                open_since = Some(event.timestamp);
            }
        } else if let Some(opened) = open_since.take() {
            total += (event.timestamp - opened).max(0).unsigned_abs();
        }
    }

    if let Some(opened) = open_since {
        let close_at = now.map_or(window.end, |n| n.clamp(opened, window.end));
        total += (close_at - opened).max(0).unsigned_abs();
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ActivityState;

    /// Midnight of an arbitrary fixed day, epoch seconds.
    const DAY_START: i64 = 1_736_294_400;
    const DAY_END: i64 = DAY_START + 86_400;

    const WINDOW: DayWindow = DayWindow {
        start: DAY_START,
        end: DAY_END,
    };

    fn active(offset_secs: i64) -> TransitionEvent {
        TransitionEvent {
            timestamp: DAY_START + offset_secs,
            state: ActivityState::Active,
        }
    }

    fn inactive(offset_secs: i64) -> TransitionEvent {
        TransitionEvent {
            timestamp: DAY_START + offset_secs,
            state: ActivityState::Inactive,
        }
    }

    #[test]
    fn empty_log_yields_zero() {
        assert_eq!(active_seconds(&[], &WINDOW, None), 0);
        assert_eq!(active_seconds(&[], &WINDOW, Some(DAY_START + 3600)), 0);
    }

    #[test]
    fn closed_intervals_sum_exactly() {
        let events = [active(100), inactive(700), active(1000), inactive(1250)];
        // 600 + 250
        assert_eq!(active_seconds(&events, &WINDOW, None), 850);
    }

    #[test]
    fn two_intervals_second_open_at_now() {
        // active 00:00, inactive 01:30, active 02:00, now 03:00
        let events = [active(0), inactive(5400), active(7200)];
        let now = DAY_START + 10_800;
        assert_eq!(active_seconds(&events, &WINDOW, Some(now)), 9000);
    }

    #[test]
    fn open_interval_grows_with_now() {
        let events = [active(1000)];
        let at = active_seconds(&events, &WINDOW, Some(DAY_START + 2000));
        let later = active_seconds(&events, &WINDOW, Some(DAY_START + 2750));
        assert_eq!(at, 1000);
        assert_eq!(later, at + 750);
    }

    #[test]
    fn closed_state_unchanged_by_advancing_now() {
        let events = [active(1000), inactive(2000)];
        let at = active_seconds(&events, &WINDOW, Some(DAY_START + 3000));
        let later = active_seconds(&events, &WINDOW, Some(DAY_START + 9000));
        assert_eq!(at, 1000);
        assert_eq!(later, at);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let events = [active(0), inactive(5400), active(7200), inactive(8000)];
        let first = active_seconds(&events, &WINDOW, None);
        for _ in 0..10 {
            assert_eq!(active_seconds(&events, &WINDOW, None), first);
        }
    }

    #[test]
    fn carry_in_active_covers_whole_day() {
        // Single active event an hour before the day, nothing after.
        let events = [TransitionEvent {
            timestamp: DAY_START - 3600,
            state: ActivityState::Active,
        }];
        assert_eq!(active_seconds(&events, &WINDOW, None), WINDOW.len_seconds());
    }

    #[test]
    fn carry_in_inactive_contributes_nothing() {
        let events = [TransitionEvent {
            timestamp: DAY_START - 3600,
            state: ActivityState::Inactive,
        }];
        assert_eq!(active_seconds(&events, &WINDOW, None), 0);
    }

    #[test]
    fn carry_in_uses_last_pre_window_event() {
        let events = [
            TransitionEvent {
                timestamp: DAY_START - 7200,
                state: ActivityState::Active,
            },
            TransitionEvent {
                timestamp: DAY_START - 3600,
                state: ActivityState::Inactive,
            },
            active(1800),
            inactive(2800),
        ];
        assert_eq!(active_seconds(&events, &WINDOW, None), 1000);
    }

    #[test]
    fn events_entirely_after_window_yield_zero() {
        let events = [
            TransitionEvent {
                timestamp: DAY_END + 10,
                state: ActivityState::Active,
            },
            TransitionEvent {
                timestamp: DAY_END + 500,
                state: ActivityState::Inactive,
            },
        ];
        assert_eq!(active_seconds(&events, &WINDOW, None), 0);
    }

    #[test]
    fn redundant_transitions_ignored() {
        let events = [
            active(100),
            active(200),
            inactive(600),
            inactive(700),
            inactive(800),
        ];
        // First open at 100 wins; first close at 600 wins.
        assert_eq!(active_seconds(&events, &WINDOW, None), 500);
    }

    #[test]
    fn trailing_open_interval_closes_at_day_end_for_past_days() {
        let events = [active(86_000)];
        assert_eq!(active_seconds(&events, &WINDOW, None), 400);
    }

    #[test]
    fn now_clamped_to_window_end() {
        let events = [active(86_000)];
        let after_midnight = DAY_END + 600;
        assert_eq!(active_seconds(&events, &WINDOW, Some(after_midnight)), 400);
    }

    #[test]
    fn now_before_open_does_not_go_negative() {
        // A producer clock hiccup: now earlier than the open timestamp.
        let events = [active(5000)];
        assert_eq!(active_seconds(&events, &WINDOW, Some(DAY_START + 4000)), 0);
    }

    #[test]
    fn carry_in_active_then_inactive_mid_day() {
        let events = [
            TransitionEvent {
                timestamp: DAY_START - 100,
                state: ActivityState::Active,
            },
            inactive(3600),
        ];
        assert_eq!(active_seconds(&events, &WINDOW, None), 3600);
    }
}
