use super::*;
use adhan_lib::api::fetch_with_retry;
use adhan_lib::config::RetryConfig;
use adhan_lib::schedule::Outcome;
use adhan_lib::scheduler::{SchedulerConfig, SchedulerLoop};
use adhan_lib::timings::FormatError;
use adhan_lib::Prayer;
use tokio::time::Instant;

fn scheduler<'a>(
    api: &'a ScriptedApi,
    clock: FixedClock,
    sink: &'a RecordingSink,
) -> SchedulerLoop<&'a ScriptedApi, FixedClock, &'a RecordingSink> {
    SchedulerLoop::new(SchedulerConfig::default(), api, clock, sink)
}

/// Before a prayer: sleep until it, then announce it.
#[tokio::test(start_paused = true)]
async fn upcoming_prayer_is_announced_after_wait() {
    let api = ScriptedApi::new([Ok(raw_day("05:12", "13:10", "20:43"))]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let outcome = scheduler(&api, at(13, 2), &sink).run_cycle().await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Upcoming {
            prayer: Prayer::Dhuhr,
            minutes: 8
        }
    );
    assert_elapsed(start, 480);
    assert_eq!(sink.notices(), vec![Notice::adhan(Prayer::Dhuhr)]);
}

/// Just after midnight: the Fajr wait goes through both interval stages.
#[tokio::test(start_paused = true)]
async fn midnight_to_fajr_sleeps_19800_seconds() {
    let api = ScriptedApi::new([Ok(raw_day("05:30", "12:58", "20:43"))]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let outcome = scheduler(&api, at(0, 0), &sink).run_cycle().await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Upcoming {
            prayer: Prayer::Fajr,
            minutes: 490
        }
    );
    assert_elapsed(start, 19800);
    assert_eq!(sink.notices(), vec![Notice::adhan(Prayer::Fajr)]);
}

/// After Isha: sleep to midnight silently.
#[tokio::test(start_paused = true)]
async fn day_over_sleeps_to_midnight_without_notice() {
    let api = ScriptedApi::new([Ok(raw_day("05:12", "12:58", "22:00"))]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let outcome = scheduler(&api, at(23, 59), &sink).run_cycle().await.unwrap();

    assert_eq!(outcome, Outcome::DayOver { minutes: 41 });
    assert_elapsed(start, 2460);
    assert!(sink.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn timetable_is_requested_for_clock_date() {
    let api = ScriptedApi::new([Ok(raw_day("05:12", "12:58", "20:43"))]);
    let sink = RecordingSink::default();

    scheduler(&api, at(23, 59), &sink).run_cycle().await.unwrap();

    assert_eq!(api.requested_dates(), vec![test_date()]);
}

/// The loop keeps cycling until a fatal status, which is announced once.
#[tokio::test(start_paused = true)]
async fn run_stops_on_bad_request() {
    let api = ScriptedApi::new([
        Ok(raw_day("05:12", "12:58", "20:43")),
        Ok(raw_day("05:13", "12:58", "20:42")),
        Err(ApiError::Status(400)),
    ]);
    let sink = RecordingSink::default();

    let err = scheduler(&api, at(23, 59), &sink)
        .run(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status(400)));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(api.calls(), 3);
    assert_eq!(sink.notices(), vec![Notice::status_code(400)]);
}

#[tokio::test(start_paused = true)]
async fn run_gives_up_after_three_network_failures() {
    let api = ScriptedApi::new([Err(network_down()), Err(network_down()), Err(network_down())]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let err = scheduler(&api, at(9, 0), &sink)
        .run(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RetriesExhausted { attempts: 3 }));
    assert_eq!(err.exit_code(), 0);
    assert_eq!(api.calls(), 3);
    // One notice per failure, none for exhaustion itself
    assert_eq!(sink.notices(), vec![Notice::network_error(30); 3]);
    // Two 30 second pauses between three attempts
    assert_elapsed(start, 60);
}

#[tokio::test(start_paused = true)]
async fn malformed_timetable_is_fatal() {
    let mut raw = raw_day("05:12", "12:58", "20:43");
    raw.0.remove("Isha");
    let api = ScriptedApi::new([Ok(raw)]);
    let sink = RecordingSink::default();

    let err = scheduler(&api, at(9, 0), &sink)
        .run(std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Format(FormatError::Missing(Prayer::Isha))
    ));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(sink.notices().len(), 1);
    assert_eq!(sink.notices()[0].title, "Invalid Response");
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_wait() {
    let api = ScriptedApi::new([Ok(raw_day("05:12", "13:10", "20:43"))]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let result = scheduler(&api, at(13, 2), &sink)
        .run(tokio::time::sleep(Duration::from_secs(10)))
        .await;

    assert!(result.is_ok());
    assert_elapsed(start, 10);
    assert!(sink.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn retry_recovers_after_one_failure() {
    let api = ScriptedApi::new([Err(network_down()), Ok(raw_day("05:12", "12:58", "20:43"))]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let raw = fetch_with_retry(&api, test_date(), &RetryConfig::default(), &sink)
        .await
        .unwrap();

    assert_eq!(raw.get("Fajr"), Some("05:12"));
    assert_eq!(api.calls(), 2);
    assert_eq!(sink.notices(), vec![Notice::network_error(30)]);
    assert_elapsed(start, 30);
}

#[tokio::test(start_paused = true)]
async fn status_errors_are_not_retried() {
    let api = ScriptedApi::new([Err(ApiError::Status(500))]);
    let sink = RecordingSink::default();

    let err = fetch_with_retry(&api, test_date(), &RetryConfig::default(), &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status(500)));
    assert_eq!(api.calls(), 1);
    assert!(sink.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn custom_retry_policy_is_honoured() {
    let api = ScriptedApi::new([]);
    let sink = RecordingSink::default();
    let policy = RetryConfig {
        max_attempts: 1,
        delay_secs: 5,
    };
    let start = Instant::now();

    // Queue is empty, so the single attempt fails with a 500
    let err = fetch_with_retry(&api, test_date(), &policy, &sink)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(500)));
    assert_elapsed(start, 0);

    let api = ScriptedApi::new([Err(network_down())]);
    let err = fetch_with_retry(&api, test_date(), &policy, &sink)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::RetriesExhausted { attempts: 1 }));
    assert_eq!(sink.notices(), vec![Notice::network_error(5)]);
}

/// `--once` path: the outcome and the printed "now" come from one clock read.
#[tokio::test(start_paused = true)]
async fn preview_resolves_without_waiting() {
    let api = ScriptedApi::new([Ok(raw_day("05:12", "13:10", "20:43"))]);
    let sink = RecordingSink::default();
    let start = Instant::now();

    let preview = scheduler(&api, at(13, 2), &sink).preview().await.unwrap();

    assert_eq!(preview.now.hhmm(), 1302);
    assert_eq!(
        preview.outcome,
        Outcome::Upcoming {
            prayer: Prayer::Dhuhr,
            minutes: 8
        }
    );
    assert_eq!(preview.day.get(Prayer::Dhuhr).hhmm(), 1310);
    assert_elapsed(start, 0);
    assert!(sink.notices().is_empty());
}

/// `--once` path: a bad status is announced just like in the daemon loop.
#[tokio::test(start_paused = true)]
async fn preview_announces_fatal_status() {
    let api = ScriptedApi::new([Err(ApiError::Status(500))]);
    let sink = RecordingSink::default();

    let err = scheduler(&api, at(9, 0), &sink).preview().await.unwrap_err();

    assert!(matches!(err, ApiError::Status(500)));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(sink.notices(), vec![Notice::status_code(500)]);
}

/// `--once` path: running out of retries still exits cleanly.
#[tokio::test(start_paused = true)]
async fn preview_exhausted_retries_exit_zero() {
    let api = ScriptedApi::new([Err(network_down()), Err(network_down()), Err(network_down())]);
    let sink = RecordingSink::default();

    let err = scheduler(&api, at(9, 0), &sink).preview().await.unwrap_err();

    assert!(matches!(err, ApiError::RetriesExhausted { attempts: 3 }));
    assert_eq!(err.exit_code(), 0);
    assert_eq!(sink.notices(), vec![Notice::network_error(30); 3]);
}
