use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter directives for the log file, e.g. `STUDYTRACK_LOG=debug`
pub const LOG_ENV: &str = "STUDYTRACK_LOG";
pub const LOG_FILE_PREFIX: &str = "studytrack.log";

/// Install a subscriber writing to a daily rolling file under `log_dir`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout/stderr.
/// Keep the returned guard alive until exit or buffered lines are lost.
/// Returns `None` when the directory can't be created or a subscriber is
/// already installed.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    std::fs::create_dir_all(log_dir).ok()?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
