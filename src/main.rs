//! # Adhan Notifier Entry Point
//!
//! This binary wires configuration, logging and the real collaborators
//! (HTTP client, system clock, desktop notifications) into the scheduler
//! loop. It supports a daemon mode that runs until Ctrl-C and a `--once`
//! development mode that prints today's schedule and exits.

// Test modules
#[cfg(test)]
mod tests;

use adhan_lib::api::{AladhanClient, ApiError};
use adhan_lib::clock::SystemClock;
use adhan_lib::config::{self, Config};
use adhan_lib::notify::DesktopNotifier;
use adhan_lib::report;
use adhan_lib::scheduler::{SchedulerConfig, SchedulerLoop};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Desktop notifications at each of the five daily prayers and sunrise.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration file [default: adhan-config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to compute prayer times for (overrides the config file)
    #[arg(short, long)]
    address: Option<String>,

    /// Calculation method code (overrides the config file)
    #[arg(short, long)]
    method: Option<u8>,

    /// Print today's schedule and the next event, then exit
    #[arg(long)]
    once: bool,

    /// Write the effective configuration to --config and exit
    #[arg(long)]
    write_config: bool,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::default()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn config_path(cli: &Cli) -> &Path {
    cli.config
        .as_deref()
        .unwrap_or_else(|| Path::new(config::DEFAULT_PATH))
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if let Some(address) = &cli.address {
        config.api.address = address.clone();
    }
    if let Some(method) = cli.method {
        config.api.method = method;
    }
    config
}

/// Exit status for a fatal scheduler error.
fn exit_status(e: &ApiError) -> ExitCode {
    let code = e.exit_code();
    log::error!("Terminating with status {}: {}", code, e);
    ExitCode::from(code)
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli);

    if cli.write_config {
        let path = config_path(&cli);
        config
            .save_to_path(path)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))?;
        return Ok(ExitCode::SUCCESS);
    }

    let api = AladhanClient::new(&config.api)?;
    let notifier = DesktopNotifier::new(config.notification.timeout_secs);
    let scheduler = SchedulerLoop::new(SchedulerConfig::from(&config), api, SystemClock, notifier);

    // Development mode: show what the daemon would do and stop
    if cli.once {
        return match scheduler.preview().await {
            Ok(preview) => {
                report::print_schedule(&preview.day, preview.now, &preview.outcome);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(exit_status(&e)),
        };
    }

    log::info!(
        "Starting adhan notifier for {:?} (method {})",
        config.api.address,
        config.api.method
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match scheduler.run(shutdown).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(exit_status(&e)),
    }
}
