//! # Prayer Timetable Formatting
//!
//! Turns the `data.timings` object returned by the API into a
//! [`PrayerTimeSet`].
//!
//! The API returns more than the six announced prayers:
//!
//! ```json
//! {
//!   "Fajr": "05:12", "Sunrise": "06:40", "Dhuhr": "12:58", "Asr": "16:31",
//!   "Sunset": "19:15", "Maghrib": "19:15", "Isha": "20:43", "Imsak": "05:02",
//!   "Midnight": "00:58", "Firstthird": "23:10", "Lastthird": "02:45"
//! }
//! ```
//!
//! Only the fields named by [`Prayer::ALL`] are kept; everything listed in
//! [`DROPPED_FIELDS`] is ignored. The raw map is never modified: a new
//! timetable is built from it.

use crate::{ClockTime, Prayer, PrayerTimeSet};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Auxiliary timings returned by the API that are never announced.
pub const DROPPED_FIELDS: [&str; 5] = ["Imsak", "Sunset", "Midnight", "Firstthird", "Lastthird"];

/// The `data.timings` object, exactly as received.
///
/// Values must be strings; a payload with numeric values fails to
/// deserialize rather than being silently accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTimings(pub BTreeMap<String, String>);

impl RawTimings {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawTimings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawTimings(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Errors raised while building a timetable from a raw payload.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// One of the six prayers is absent from the payload
    #[error("missing timing for {0}")]
    Missing(Prayer),

    /// A prayer time is not a valid `HH:MM` value
    #[error("invalid time {value:?} for {prayer}")]
    InvalidTime { prayer: Prayer, value: String },
}

/// Build a timetable from the raw payload.
///
/// # Example
/// ```
/// use adhan_lib::Prayer;
/// use adhan_lib::timings::{format, RawTimings};
///
/// let raw: RawTimings = [
///     ("Fajr", "05:12"), ("Sunrise", "06:40"), ("Dhuhr", "12:58"),
///     ("Asr", "16:31"), ("Maghrib", "19:15"), ("Isha", "20:43"),
///     ("Midnight", "00:58"),
/// ]
/// .into_iter()
/// .collect();
///
/// let day = format(&raw).unwrap();
/// assert_eq!(day.get(Prayer::Fajr).hhmm(), 512);
/// assert_eq!(day.get(Prayer::Isha).hhmm(), 2043);
/// ```
pub fn format(raw: &RawTimings) -> Result<PrayerTimeSet, FormatError> {
    for field in raw.0.keys() {
        if !Prayer::ALL.iter().any(|p| p.api_name() == field.as_str()) {
            log::trace!("Dropping non-prayer timing {}", field);
        }
    }

    let mut times = [ClockTime::MIDNIGHT; 6];
    for (slot, prayer) in times.iter_mut().zip(Prayer::ALL) {
        let value = raw
            .get(prayer.api_name())
            .ok_or(FormatError::Missing(prayer))?;
        *slot = parse_hhmm(value).ok_or_else(|| FormatError::InvalidTime {
            prayer,
            value: value.to_string(),
        })?;
    }

    Ok(PrayerTimeSet::new(times))
}

/// Parse `"HH:MM"` into a [`ClockTime`].
///
/// A trailing timezone annotation such as `"05:12 (BST)"` is ignored.
pub fn parse_hhmm(value: &str) -> Option<ClockTime> {
    let clock = value.split_whitespace().next()?;
    NaiveTime::parse_from_str(clock, "%H:%M")
        .ok()
        .map(ClockTime::from_time)
}
