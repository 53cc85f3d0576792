//! Logging configuration using the tracing ecosystem.
//!
//! Output goes to a daily rotated file so that log lines never land on the
//! terminal the form is drawn on. The level is controlled by `RUST_LOG`:
//!
//! - `RUST_LOG=formfield=debug` logs source syncs, value changes and
//!   discarded stale fetches
//! - `RUST_LOG=formfield=trace` additionally logs every dropdown state
//!   transition

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "formfield=info,warn";

/// File name prefix of the rotated log files.
const LOG_FILE_PREFIX: &str = "formfield.log";

/// Initialize logging in the platform's local data directory.
///
/// Logs are stored under `formfield/logs` in the local data directory,
/// e.g. `~/.local/share/formfield/logs/` on Linux.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created, or
/// if a global subscriber is already installed.
pub fn init() -> anyhow::Result<()> {
    init_in(&get_log_directory()?)
}

/// Initialize logging into a specific directory.
pub fn init_in(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(env_filter());

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "formfield starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

/// Filter from `RUST_LOG`, or the default.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("formfield").join("logs"))
}

/// Get the path where logs are stored, for display to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("formfield shutting down");
}
