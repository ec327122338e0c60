//! Logging Infrastructure
//!
//! Structured logging to stdout, optionally mirrored to a daily rolling file.

use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use super::AppError;

/// Initialize the logger at `info`
pub fn init_logger() -> Result<(), AppError> {
    init_logger_with_file(None, None, None)
}

/// Initialize the logger with optional JSON output and file output
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: Option<bool>,
    log_dir: Option<&str>,
) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level.unwrap_or("info"))));

    let stdout = if json.unwrap_or(false) {
        fmt::layer().json().with_target(false).boxed()
    } else {
        fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    };

    // Add file output if log_dir exists
    let file = log_dir
        .map(Path::new)
        .filter(|dir| dir.exists())
        .map(|dir| {
            let appender = tracing_appender::rolling::daily(dir, "storefront");
            fmt::layer().with_ansi(false).with_writer(appender)
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init()
        .map_err(|e| AppError::config(format!("logger already initialized: {e}")))
}

fn default_directives(level: &str) -> String {
    format!("warn,storefront={level},storefront_client={level},shared={level}")
}
