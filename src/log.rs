use std::fs::{File, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

use crate::config;

/// Installs the global JSON file logger.
///
/// stdout carries the protocol, so logs only ever go to the file under the
/// data directory. The returned guard flushes the background writer on drop
/// and must be held until the server stops.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let log_file = open_log_file(&config::log_path())?;
    let (writer, guard) = tracing_appender::non_blocking(log_file);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .fmt_fields(JsonFields::default());

    // Use RUST_LOG if set, otherwise default to INFO
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()?;

    Ok(guard)
}

/// Opens the log file for appending, creating its parent directory first.
fn open_log_file(log_path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).inspect_err(|e| {
            eprintln!("Failed to create data directory {:?}: {}", parent, e);
        })?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .inspect_err(|e| {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
        })?;

    Ok(log_file)
}
