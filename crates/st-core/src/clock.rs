//! Injectable time source.
//!
//! Calendar-day boundaries are computed in local time. Keeping "now" and
//! the local-midnight mapping behind a trait lets tests simulate
//! day-boundary crossings and DST transitions deterministically.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Source of the current instant and local calendar mapping.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current local calendar date.
    fn today(&self) -> NaiveDate;

    /// The instant of local midnight at the start of `date`.
    fn day_start(&self, date: NaiveDate) -> DateTime<Utc>;

    /// Half-open `[start, end)` bounds of `date` in epoch seconds.
    fn day_bounds(&self, date: NaiveDate) -> (i64, i64) {
        let start = self.day_start(date).timestamp();
        let end = date
            .succ_opt()
            .map_or(i64::MAX, |next| self.day_start(next).timestamp());
        (start, end)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        (**self).day_start(date)
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        (**self).day_start(date)
    }
}

/// System clock using the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        local_midnight_to_utc(date)
    }
}

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    midnight_to_utc(&Local, local_date)
}

fn midnight_to_utc<Tz: TimeZone>(tz: &Tz, local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible
            // Use 1am local which is guaranteed to exist
            let one_am = local_date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            tz.from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| Utc.from_utc_datetime(&one_am), |dt| dt.with_timezone(&Utc))
        }
    }
}
