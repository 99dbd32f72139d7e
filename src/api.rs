//! # Prayer Timings API Client
//!
//! Fetches the daily timetable from the aladhan.com `timingsByAddress`
//! endpoint and classifies the response.
//!
//! ## Request
//! `GET {base_url}/{DD-MM-YYYY}?address={address}&method={method}`
//!
//! ## Response handling
//! - **200**: body is JSON; the timetable lives at `data.timings`
//! - **anything else**: fatal [`ApiError::Status`], never retried
//!
//! ## Retry policy
//! Only network-level failures (connection refused, DNS, timeouts) are
//! retried. Each failure raises a "Network Error" notification; attempts are
//! spaced by the configured delay and capped by the configured count. Running
//! out of attempts yields [`ApiError::RetriesExhausted`].

use crate::config::{ApiConfig, RetryConfig};
use crate::notify::{NotificationSink, Notice};
use crate::timings::{FormatError, RawTimings};
use chrono::NaiveDate;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while obtaining a timetable.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection-level failure; the only retryable kind
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Every attempt failed with a network error
    #[error("giving up after {attempts} failed attempts")]
    RetriesExhausted { attempts: u32 },

    /// Server answered with something other than 200
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Body is not JSON or lacks `data.timings`
    #[error("malformed response: {0}")]
    Payload(#[from] serde_json::Error),

    /// Timings present but unusable
    #[error("unusable timetable: {0}")]
    Format(#[from] FormatError),
}

impl ApiError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Process exit status for a fatal error.
    ///
    /// Running out of retries exits cleanly with 0; every other failure
    /// exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            ApiError::RetriesExhausted { .. } => 0,
            _ => 1,
        }
    }

    /// Notification to show before exiting, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ApiError::Status(code) => Some(Notice::status_code(*code)),
            ApiError::Payload(_) | ApiError::Format(_) => {
                Some(Notice::new("Invalid Response", "Exiting program."))
            }
            ApiError::Network { .. } | ApiError::RetriesExhausted { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// A single-attempt source of raw timetables.
pub trait TimingsApi {
    fn fetch_once(&self, date: NaiveDate) -> impl Future<Output = Result<RawTimings, ApiError>>;
}

impl<T: TimingsApi> TimingsApi for &T {
    fn fetch_once(&self, date: NaiveDate) -> impl Future<Output = Result<RawTimings, ApiError>> {
        (**self).fetch_once(date)
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    timings: RawTimings,
}

/// Classify a response and extract `data.timings` from a 200 body.
pub fn parse_response(status: u16, body: &str) -> Result<RawTimings, ApiError> {
    if status != 200 {
        return Err(ApiError::Status(status));
    }
    let envelope: Envelope = serde_json::from_str(body)?;
    Ok(envelope.data.timings)
}

/// HTTP client for the aladhan.com timings endpoint.
#[derive(Clone, Debug)]
pub struct AladhanClient {
    http: reqwest::Client,
    base_url: String,
    address: String,
    method: u8,
}

impl AladhanClient {
    pub fn new(config: &ApiConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(AladhanClient {
            http,
            base_url: config.base_url.clone(),
            address: config.address.clone(),
            method: config.method,
        })
    }

    /// Endpoint URL for `date`, without the query string.
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            date.format("%d-%m-%Y")
        )
    }
}

impl TimingsApi for AladhanClient {
    async fn fetch_once(&self, date: NaiveDate) -> Result<RawTimings, ApiError> {
        let url = self.url_for(date);
        let method = self.method.to_string();
        log::debug!("GET {} address={:?} method={}", url, self.address, method);

        let response = self
            .http
            .get(&url)
            .query(&[("address", self.address.as_str()), ("method", method.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_response(status, &body)
    }
}

/// Fetch with the bounded retry policy described in the module docs.
pub async fn fetch_with_retry<A, N>(
    api: &A,
    date: NaiveDate,
    policy: &RetryConfig,
    notifier: &N,
) -> Result<RawTimings, ApiError>
where
    A: TimingsApi,
    N: NotificationSink,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        match api.fetch_once(date).await {
            Ok(timings) => return Ok(timings),
            Err(e) if e.is_transient() => {
                log::warn!("Fetch attempt {}/{} failed: {}", attempt, attempts, e);
                notifier.notify(&Notice::network_error(policy.delay_secs));
                if attempt < attempts {
                    tokio::time::sleep(policy.delay()).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    log::error!("Max retry attempts reached");
    Err(ApiError::RetriesExhausted { attempts })
}
