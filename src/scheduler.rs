//! # Scheduler Loop
//!
//! Drives the daemon forever:
//!
//! ```text
//! Fetching -> Resolving -> Waiting -> Notifying -> Fetching ...
//!                             \
//!                              `-(day over)-------> Fetching
//! ```
//!
//! - **Fetching**: today's timetable with bounded retry; fatal errors end the loop
//! - **Resolving**: read "now" and pick the next prayer
//! - **Waiting**: sleep the computed seconds (up to a day)
//! - **Notifying**: announce the prayer; skipped after a midnight rollover
//!
//! The loop never exits the process itself. Fatal errors are notified and
//! returned to the caller, which owns the exit status.

use crate::api::{fetch_with_retry, ApiError, TimingsApi};
use crate::clock::TimeSource;
use crate::config::{Config, RetryConfig};
use crate::notify::{NotificationSink, Notice};
use crate::schedule::{resolve, Outcome};
use crate::{timings, ClockTime, PrayerTimeSet};
use std::future::Future;

/// Settings the loop needs, taken from [`Config`].
#[derive(Clone, Debug, Default)]
pub struct SchedulerConfig {
    pub retry: RetryConfig,
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        SchedulerConfig {
            retry: config.retry.clone(),
        }
    }
}

/// One resolved day, as shown by `--once`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preview {
    pub day: PrayerTimeSet,
    pub now: ClockTime,
    pub outcome: Outcome,
}

pub struct SchedulerLoop<A, C, N> {
    config: SchedulerConfig,
    api: A,
    clock: C,
    notifier: N,
}

impl<A, C, N> SchedulerLoop<A, C, N>
where
    A: TimingsApi,
    C: TimeSource,
    N: NotificationSink,
{
    pub fn new(config: SchedulerConfig, api: A, clock: C, notifier: N) -> Self {
        SchedulerLoop {
            config,
            api,
            clock,
            notifier,
        }
    }

    /// Fetch and format today's timetable.
    pub async fn fetch_day(&self) -> Result<PrayerTimeSet, ApiError> {
        let date = self.clock.today();
        log::debug!("Fetching timetable for {}", date);
        let raw = fetch_with_retry(&self.api, date, &self.config.retry, &self.notifier).await?;
        Ok(timings::format(&raw)?)
    }

    /// Resolve the next event against the current clock.
    ///
    /// Returns the clock reading the outcome was computed from.
    pub fn plan(&self, day: &PrayerTimeSet) -> (ClockTime, Outcome) {
        let now = self.clock.clock_time();
        let outcome = resolve(day, now);
        match outcome.prayer() {
            Some(prayer) => log::info!(
                "Now {}; next is {} at {}, sleeping {}s",
                now,
                prayer,
                day.get(prayer),
                outcome.wait_seconds()
            ),
            None => log::info!(
                "Now {}; no prayers left today, sleeping {}s until midnight",
                now,
                outcome.wait_seconds()
            ),
        }
        (now, outcome)
    }

    /// Announce a fatal error and hand it back for the exit status.
    pub fn fail(&self, e: ApiError) -> ApiError {
        log::error!("Scheduler stopping: {}", e);
        if let Some(notice) = e.notice() {
            self.notifier.notify(&notice);
        }
        e
    }

    /// Fetch and resolve once without waiting or announcing a prayer.
    pub async fn preview(&self) -> Result<Preview, ApiError> {
        let day = self.fetch_day().await.map_err(|e| self.fail(e))?;
        let (now, outcome) = self.plan(&day);
        Ok(Preview { day, now, outcome })
    }

    /// One full fetch → resolve → wait → notify pass.
    pub async fn run_cycle(&self) -> Result<Outcome, ApiError> {
        let day = self.fetch_day().await?;
        let (_, outcome) = self.plan(&day);

        tokio::time::sleep(outcome.wait()).await;

        if let Some(prayer) = outcome.prayer() {
            self.notifier.notify(&Notice::adhan(prayer));
        }
        Ok(outcome)
    }

    /// Run cycles until a fatal error or until `shutdown` completes.
    ///
    /// Shutdown interrupts any pending fetch or sleep and returns `Ok(())`.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), ApiError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.run_cycle() => {
                    if let Err(e) = result {
                        return Err(self.fail(e));
                    }
                }
                _ = &mut shutdown => {
                    log::info!("Shutdown requested, stopping scheduler");
                    return Ok(());
                }
            }
        }
    }
}
