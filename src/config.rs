//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! adhan-config.toml file. It provides a centralized way to configure the
//! timings API location, retry behaviour and notification settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file, looked up in the working directory.
pub const DEFAULT_PATH: &str = "adhan-config.toml";

/// Application configuration loaded from adhan-config.toml
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Timings API configuration
    pub api: ApiConfig,
    /// Fetch retry policy
    pub retry: RetryConfig,
    /// Desktop notification settings
    pub notification: NotificationConfig,
}

/// Timings API configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint; the request date is appended as a path segment
    pub base_url: String,
    /// Free-form address the timetable is computed for
    pub address: String,
    /// Calculation method code understood by the API (1 = Karachi)
    pub method: u8,
    /// Overall HTTP timeout per attempt
    pub request_timeout_secs: u64,
}

/// Retry policy for network-level fetch failures
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay_secs: u64,
}

/// Desktop notification settings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a notification stays on screen
    pub timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://api.aladhan.com/v1/timingsByAddress".to_string(),
            address: "Your Address".to_string(),
            method: 1,
            request_timeout_secs: 30,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 3,
            delay_secs: 30,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig { timeout_secs: 10 }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Config {
    /// Load configuration from adhan-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration for address: {}", config.api.address);
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format: {}", e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using default configuration",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Write the configuration as TOML to `path`
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
