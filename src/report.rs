//! # Plain-Text Schedule Report
//!
//! Renders one day's timetable for the `--once` development mode, so the
//! resolver can be checked from a terminal without waiting for a prayer.
//!
//! ```text
//! Prayer times (now 13:02)
//!     Fajr     05:12
//!     Sunrise  06:40
//!   > Dhuhr    13:10
//!     Asr      16:31
//!     Maghrib  19:15
//!     Isha     20:43
//! Next: Dhuhr in 8 min (sleep 480s)
//! ```

use crate::schedule::Outcome;
use crate::{ClockTime, PrayerTimeSet};
use std::fmt::Write;

/// Render the timetable with the next prayer marked.
pub fn render(day: &PrayerTimeSet, now: ClockTime, outcome: &Outcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prayer times (now {now})");

    for (prayer, time) in day.iter() {
        let marker = if outcome.prayer() == Some(prayer) { '>' } else { ' ' };
        let _ = writeln!(out, "  {marker} {:<8} {time}", prayer.api_name());
    }

    let _ = match outcome {
        Outcome::Upcoming { prayer, minutes } => writeln!(
            out,
            "Next: {prayer} in {minutes} min (sleep {}s)",
            outcome.wait_seconds()
        ),
        Outcome::DayOver { minutes } => writeln!(
            out,
            "Day over: refetch in {minutes} min (sleep {}s)",
            outcome.wait_seconds()
        ),
    };
    out
}

/// Print [`render`] to stdout.
pub fn print_schedule(day: &PrayerTimeSet, now: ClockTime, outcome: &Outcome) {
    print!("{}", render(day, now, outcome));
}
