//! Tracing subscriber set-up.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `onestep_ops=debug`.
pub const LOG_ENV: &str = "ONESTEP_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Headless commands log to stderr.
    Stderr,
    /// The TUI owns the terminal; log nothing unless a file is given.
    Silent,
}

/// Install the global subscriber.
///
/// `log_file` overrides `target`: lines are appended there without colour.
pub fn init(target: LogTarget, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Some(path) = log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Cannot open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .try_init()?;
        return Ok(());
    }

    match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time()
                    .with_target(false),
            )
            .with(filter)
            .try_init()?,
        LogTarget::Silent => {}
    }

    Ok(())
}
