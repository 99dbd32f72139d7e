//! # Next-Prayer Resolution and Wait Intervals
//!
//! Pure scheduling core: decides which prayer comes next and how many seconds
//! to sleep until it.
//!
//! ## Interval arithmetic
//!
//! Intervals are computed on HHMM integers in two stages:
//!
//! 1. [`diff_minutes`] subtracts the two HHMM values and, when the raw
//!    difference exceeds 60, removes 40 to account for the hour carry
//!    (`1400 - 1320 = 80` is really 40 minutes).
//! 2. [`to_seconds`] converts that value to seconds. Values of 100 or more are
//!    read back as a pseudo-HHMM: the leading digit is hours and the remaining
//!    digits are minutes.
//!
//! ### Known defect
//! Both stages are only exact while the true gap stays within roughly two
//! hours; longer waits can be off by an hour or more (10:00 → 13:30 gives
//! 290, which sleeps 2h90m = 4h30m instead of 3h30m). The daemon's behaviour
//! depends on these exact values, so they are kept as-is. A correct version
//! would subtract [`ClockTime::minutes_since_midnight`] values instead.
//!
//! The midnight wait shares the defect: `2400 - 2359` is 41 as an integer,
//! so one minute before midnight the daemon sleeps 41 minutes.

use crate::{ClockTime, Prayer, PrayerTimeSet};
use std::time::Duration;

/// HHMM value of the end of the day.
pub const END_OF_DAY: u32 = 2400;

/// What the daemon should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `prayer` is the earliest prayer strictly after now.
    Upcoming { prayer: Prayer, minutes: u32 },
    /// Now is at or after Isha; sleep until midnight and fetch the next day.
    DayOver { minutes: u32 },
}

impl Outcome {
    pub fn minutes(&self) -> u32 {
        match *self {
            Outcome::Upcoming { minutes, .. } | Outcome::DayOver { minutes } => minutes,
        }
    }

    /// Seconds to sleep, via [`to_seconds`].
    pub fn wait_seconds(&self) -> u64 {
        to_seconds(self.minutes())
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_seconds())
    }

    /// The prayer to announce once the wait ends, if any.
    pub fn prayer(&self) -> Option<Prayer> {
        match *self {
            Outcome::Upcoming { prayer, .. } => Some(prayer),
            Outcome::DayOver { .. } => None,
        }
    }
}

/// Find the next event after `now`.
///
/// Prayers are checked as a waterfall in [`Prayer::ALL`] order: a later
/// prayer is only considered once every earlier one has failed the
/// `now < time` test. If none passes, the day is over and the wait runs to
/// 24:00.
///
/// # Example
/// ```
/// use adhan_lib::{ClockTime, Prayer, PrayerTimeSet};
/// use adhan_lib::schedule::{resolve, Outcome};
///
/// let t = |v| ClockTime::new(v).unwrap();
/// let day = PrayerTimeSet::new([t(530), t(650), t(1310), t(1645), t(1930), t(2100)]);
///
/// assert_eq!(
///     resolve(&day, t(1300)),
///     Outcome::Upcoming { prayer: Prayer::Dhuhr, minutes: 10 }
/// );
/// // 2400 - 2359 is 41 in HHMM integers
/// assert_eq!(resolve(&day, t(2359)), Outcome::DayOver { minutes: 41 });
/// ```
pub fn resolve(times: &PrayerTimeSet, now: ClockTime) -> Outcome {
    let now_hhmm = u32::from(now.hhmm());

    for (prayer, time) in times.iter() {
        let target = u32::from(time.hhmm());
        if now_hhmm < target {
            return Outcome::Upcoming {
                prayer,
                minutes: diff_minutes(target, now_hhmm),
            };
        }
    }

    Outcome::DayOver {
        minutes: diff_minutes(END_OF_DAY, now_hhmm),
    }
}

/// Stage A: HHMM difference with the hour-carry correction.
///
/// `target` is expected to be at or after `now`; an earlier target yields 0.
pub fn diff_minutes(target: u32, now: u32) -> u32 {
    let raw = target.saturating_sub(now);
    if raw > 60 {
        raw - 40
    } else {
        raw
    }
}

/// Stage B: minute value to seconds.
///
/// Below 100 the value is plain minutes. From 100 upwards its first decimal
/// digit is taken as hours and the remaining digits as minutes.
pub fn to_seconds(diff_minutes: u32) -> u64 {
    let diff = u64::from(diff_minutes);
    if diff >= 100 {
        let scale = 10_u64.pow(diff.ilog10());
        let hours = diff / scale;
        let minutes = diff % scale;
        hours * 3600 + minutes * 60
    } else {
        diff * 60
    }
}
