//! # Adhan Notifier Core Library
//!
//! This library provides the data structures and scheduling logic for the adhan
//! notifier daemon. Once a day the daemon downloads the prayer timetable for a
//! configured address, works out how long to sleep until the next prayer, and
//! raises a desktop notification when that moment arrives.
//!
//! ## Design Philosophy
//!
//! ### Wall-clock integers
//! Prayer times and "now" are carried as HHMM integers (`hours * 100 + minutes`),
//! e.g. 14:05 is `1405`. The interval arithmetic in [`schedule`] operates directly
//! on these integers and reproduces the long-standing behaviour of the daemon,
//! including its known approximation for waits longer than an hour.
//!
//! ### Pure core, thin I/O
//! - [`schedule`] is pure: no clock, no network, no sleeping
//! - [`clock`], [`api`] and [`notify`] are trait seams so the loop can run
//!   against fakes in tests
//! - [`scheduler`] owns the fetch → resolve → wait → notify cycle
//!
//! ### Data Flow
//! 1. **Fetch**: `GET timingsByAddress/{date}` with bounded retry
//! 2. **Format**: keep the six prayers, drop auxiliary fields, parse `HH:MM`
//! 3. **Resolve**: first prayer strictly after now, or "day over"
//! 4. **Wait**: sleep the computed number of seconds
//! 5. **Notify**: announce the prayer, then start again
//!
//! ## Core Types
//! - [`Prayer`]: one of the six daily events, in canonical order
//! - [`ClockTime`]: a validated HHMM wall-clock reading
//! - [`PrayerTimeSet`]: one day's timetable

use std::fmt;

pub mod api;
pub mod clock;
pub mod config;
pub mod notify;
pub mod report;
pub mod schedule;
pub mod scheduler;
pub mod timings;

/// The six daily events announced by the notifier.
///
/// The declaration order is the canonical order used by the resolver; the API
/// guarantees times are non-decreasing in this order within one day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// Canonical order: Fajr, Sunrise, Dhuhr, Asr, Maghrib, Isha.
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// Field name used by the timings API (`"Fajr"`, `"Dhuhr"`, ...).
    pub fn api_name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// A wall-clock reading encoded as HHMM.
///
/// Hours are 0-23 and minutes 0-59, so the value always lies in `0..=2359`.
///
/// # Example
/// ```
/// use adhan_lib::ClockTime;
///
/// let t = ClockTime::from_hm(14, 5).unwrap();
/// assert_eq!(t.hhmm(), 1405);
/// assert_eq!(ClockTime::new(1405), Some(t));
/// assert_eq!(ClockTime::new(1460), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Midnight, `0000`.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Validate an HHMM integer.
    pub fn new(hhmm: u16) -> Option<Self> {
        Self::from_hm(u32::from(hhmm / 100), u32::from(hhmm % 100))
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(ClockTime((hours * 100 + minutes) as u16))
        } else {
            None
        }
    }

    /// Truncates seconds, matching the minute resolution of the timetable.
    pub fn from_time(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        ClockTime((time.hour() * 100 + time.minute()) as u16)
    }

    pub fn hhmm(self) -> u16 {
        self.0
    }

    pub fn hours(self) -> u16 {
        self.0 / 100
    }

    pub fn minutes(self) -> u16 {
        self.0 % 100
    }

    /// True minutes elapsed since 00:00. Not used by the scheduling path,
    /// which keeps the HHMM arithmetic of [`schedule::diff_minutes`].
    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.hours()) * 60 + u32::from(self.minutes())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

/// One day's prayer timetable.
///
/// Built fresh from each API response by [`timings::format`] and never
/// mutated afterwards. Times are expected to be non-decreasing in
/// [`Prayer::ALL`] order; this is an API guarantee and is not checked here.
///
/// # Example
/// ```
/// use adhan_lib::{ClockTime, Prayer, PrayerTimeSet};
///
/// let t = |v| ClockTime::new(v).unwrap();
/// let day = PrayerTimeSet::new([t(530), t(650), t(1310), t(1645), t(1930), t(2100)]);
/// assert_eq!(day.get(Prayer::Asr).hhmm(), 1645);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrayerTimeSet {
    times: [ClockTime; 6],
}

impl PrayerTimeSet {
    /// Times given in canonical order (Fajr first, Isha last).
    pub fn new(times: [ClockTime; 6]) -> Self {
        PrayerTimeSet { times }
    }

    pub fn get(&self, prayer: Prayer) -> ClockTime {
        self.times[prayer.index()]
    }

    /// Pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, ClockTime)> + '_ {
        Prayer::ALL.iter().map(move |&p| (p, self.get(p)))
    }
}
