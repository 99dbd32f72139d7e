//! Local wall-clock access.
//!
//! The scheduler never calls `chrono::Local` directly; it asks a
//! [`TimeSource`] so tests can pin "now" to any instant.

use crate::ClockTime;
use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current local date and time.
pub trait TimeSource {
    fn now(&self) -> NaiveDateTime;

    /// Current time of day as HHMM.
    fn clock_time(&self) -> ClockTime {
        ClockTime::from_time(self.now().time())
    }

    /// Today's date, used to request the matching timetable.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The system's local clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl TimeSource for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
