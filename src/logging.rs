//! Diagnostic logging
//!
//! Console output goes to stderr. Warnings and errors are also appended
//! to the diagnostic log file, one timestamped line per event.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Open the diagnostic log for appending, creating it if needed
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    crate::config::ensure_db_dir(path)?;
    OpenOptions::new().create(true).append(true).open(path)
}

/// Layer that appends warnings and errors to `file`
pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::WARN)
}

/// Install the global subscriber. Call once, at process start.
pub fn init(log_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let file = open_log_file(log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer(file))
        .with(filter)
        .try_init()?;

    Ok(())
}
