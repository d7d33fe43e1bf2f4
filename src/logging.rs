/// File logging.
///
/// The terminal UI owns stdout and the alternate screen, so tracing output
/// goes only to `<log dir>/deepdelve.log`. `RUST_LOG` filters; the default
/// level is `info`.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{GameError, Result};

const APP_DIR: &str = "deepdelve";
const LOG_FILE: &str = "deepdelve.log";
const LOG_DIR_ENV: &str = "DEEPDELVE_LOG_DIR";

/// Install the global subscriber. Returns the log file path.
pub fn init() -> Result<PathBuf> {
    let dir = log_directory(std::env::var_os(LOG_DIR_ENV));
    std::fs::create_dir_all(&dir)
        .map_err(|source| GameError::LogDir { path: dir.clone(), source })?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // The writer thread must outlive main's stack frame.
    std::mem::forget(guard);

    let path = dir.join(LOG_FILE);
    tracing::info!("logging to {}", path.display());
    Ok(path)
}

/// Log directory: explicit override, then the platform cache dir
/// (`~/.cache/deepdelve/logs`, `~/Library/Caches/deepdelve/logs`,
/// `%LOCALAPPDATA%\deepdelve\cache\logs`), then `./logs`.
fn log_directory(override_dir: Option<OsString>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", APP_DIR)
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
