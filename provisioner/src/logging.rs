//! Log output setup.
//!
//! Logs go to stderr so stdout only ever carries command output.  The level
//! comes from `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "info";

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Log line format
    #[arg(long, value_enum, default_value = "text", env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Also send logs to the systemd journal
    #[arg(long)]
    pub journald: bool,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(args: &LogArgs) -> Result<()> {
    let fmt_layer = match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let journald_layer = if args.journald {
        Some(tracing_journald::layer().context("failed to connect to journald")?)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(journald_layer)
        .with(env_filter())
        .try_init()
        .context("failed to install tracing subscriber")
}
