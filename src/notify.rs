//! Desktop notifications.
//!
//! Delivery is best effort: a failure to show a notification is logged and
//! otherwise ignored, so it can never stop the scheduler.

use crate::Prayer;
use notify_rust::{Notification, Timeout};

/// Application name shown by the notification server.
const APP_NAME: &str = "Adhan Notifier";

/// Title and body of one notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Fired when a prayer time arrives.
    pub fn adhan(prayer: Prayer) -> Self {
        Notice::new(
            format!("{prayer} Adhan"),
            format!("It is now {prayer} time."),
        )
    }

    /// Fired after each failed connection attempt.
    pub fn network_error(retry_in_secs: u64) -> Self {
        Notice::new(
            "Network Error",
            format!("Connect to the internet...retrying in {retry_in_secs} seconds."),
        )
    }

    /// Fired before exiting on a non-200 response.
    pub fn status_code(code: u16) -> Self {
        let title = match code {
            400 => "Bad Request (400)".to_string(),
            500 => "Internal Server Error (500)".to_string(),
            other => format!("Unknown Status Code {other}"),
        };
        Notice::new(title, "Exiting program.")
    }
}

/// Somewhere notices can be sent.
pub trait NotificationSink {
    fn notify(&self, notice: &Notice);
}

impl<T: NotificationSink> NotificationSink for &T {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// Sends notices to the desktop notification daemon.
#[derive(Clone, Debug)]
pub struct DesktopNotifier {
    timeout_secs: u32,
}

impl DesktopNotifier {
    pub fn new(timeout_secs: u32) -> Self {
        DesktopNotifier { timeout_secs }
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, notice: &Notice) {
        log::info!("Notify: {} - {}", notice.title, notice.message);
        let shown = Notification::new()
            .appname(APP_NAME)
            .summary(&notice.title)
            .body(&notice.message)
            .timeout(Timeout::Milliseconds(self.timeout_secs.saturating_mul(1000)))
            .show();
        if let Err(e) = shown {
            log::warn!("Desktop notification failed: {}", e);
        }
    }
}
