//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the default level of either mode.

use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log to `path`, truncating it first.
///
/// Used by the scan command: the terminal only shows the summary, the file
/// holds per-line diagnostics of the latest run.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        CliError::Config(format!("Cannot open log file {}: {}", path.display(), e))
    })?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter_or("info"))
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Log warnings and errors to stderr.
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_env_filter(filter_or("warn"))
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))
}

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
