//! # Scenario Tests for the Adhan Notifier
//!
//! End-to-end tests of the scheduler loop against in-memory collaborators.
//! Time is driven by Tokio's paused clock, so day-long sleeps finish
//! instantly while elapsed durations stay exact.

mod scheduler_tests;

use adhan_lib::api::{ApiError, TimingsApi};
use adhan_lib::clock::FixedClock;
use adhan_lib::notify::{NotificationSink, Notice};
use adhan_lib::timings::RawTimings;
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// Serves queued responses; once empty, every call fails with HTTP 500.
#[derive(Default)]
pub struct ScriptedApi {
    responses: RefCell<VecDeque<Result<RawTimings, ApiError>>>,
    requested: RefCell<Vec<NaiveDate>>,
}

impl ScriptedApi {
    pub fn new(responses: impl IntoIterator<Item = Result<RawTimings, ApiError>>) -> Self {
        ScriptedApi {
            responses: RefCell::new(responses.into_iter().collect()),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requested.borrow().len()
    }

    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        self.requested.borrow().clone()
    }
}

impl TimingsApi for ScriptedApi {
    async fn fetch_once(&self, date: NaiveDate) -> Result<RawTimings, ApiError> {
        self.requested.borrow_mut().push(date);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(ApiError::Status(500)))
    }
}

/// Keeps every notice it receives.
#[derive(Default)]
pub struct RecordingSink {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingSink {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

pub fn at(hour: u32, minute: u32) -> FixedClock {
    let now: NaiveDateTime = test_date().and_hms_opt(hour, minute, 0).unwrap();
    FixedClock(now)
}

/// Full API timetable with the auxiliary fields the formatter drops.
pub fn raw_day(fajr: &str, dhuhr: &str, isha: &str) -> RawTimings {
    [
        ("Imsak", "05:02"),
        ("Fajr", fajr),
        ("Sunrise", "06:40"),
        ("Dhuhr", dhuhr),
        ("Asr", "16:31"),
        ("Sunset", "19:15"),
        ("Maghrib", "19:15"),
        ("Isha", isha),
        ("Midnight", "00:58"),
        ("Firstthird", "23:10"),
        ("Lastthird", "02:45"),
    ]
    .into_iter()
    .collect()
}

pub fn network_down() -> ApiError {
    ApiError::Network {
        message: "connection refused".to_string(),
        source: None,
    }
}

/// Assert that between `secs` and `secs + 1` seconds of Tokio time passed.
#[track_caller]
pub fn assert_elapsed(start: tokio::time::Instant, secs: u64) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
        "expected {}s to elapse, got {:?}",
        secs,
        elapsed
    );
}
