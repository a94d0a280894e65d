//! Tracing setup. The terminal belongs to the UI, so log lines go to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::state::AppError;

/// Installs the global subscriber. `RUST_LOG` overrides `default_level` when set.
pub fn init(log_file: &Path, default_level: &str) -> Result<(), AppError> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
