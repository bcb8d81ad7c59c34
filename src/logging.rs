//! File-based logging for the library browser
//!
//! Logs go to a daily rotating file rather than stdout so the CLI output
//! stays clean.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "library-browser";
const DEFAULT_FILTER: &str = "library_browser=debug,reqwest=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `<dir>/library-browser.YYYY-MM-DD.log`. The level is
/// taken from `RUST_LOG` when set, otherwise `library_browser` logs at DEBUG,
/// `reqwest` at INFO and everything else at WARN.
///
/// The returned guard flushes the writer on drop; keep it alive for the
/// lifetime of the program.
pub fn init_logging(dir: &Path) -> anyhow::Result<WorkerGuard> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", dir.display());

    Ok(guard)
}

/// Log the outcome of a backend request
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(operation = $operation, "API request successful"),
            Err(e) => tracing::warn!(operation = $operation, error = %e, "API request failed"),
        }
    };
}

/// Log a backend request with additional context
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "API request started");
    };
}
