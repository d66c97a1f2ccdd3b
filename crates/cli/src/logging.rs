//! Logging setup
//!
//! Logs always go to stderr (stdout carries the scan report), optionally mirrored
//! to a daily rolling file.
//!
//! # Environment Variables
//!
//! - `ONIONSCAN_LOG_FORMAT`: `pretty` (default) or `json`
//! - `ONIONSCAN_LOG_DIR`: directory for `onionscan-adapter.log.<date>` files
//! - `RUST_LOG`: filter directives (default: `onionscan=info`)

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "onionscan=info";
const LOG_FILE_PREFIX: &str = "onionscan-adapter.log";

/// Initialize tracing
///
/// The returned guard flushes the file writer on drop and must outlive the program's work.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let log_format =
        std::env::var("ONIONSCAN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let (file_layer, guard) = match std::env::var("ONIONSCAN_LOG_DIR") {
        Ok(dir) => {
            let dir = shellexpand::tilde(&dir).into_owned();
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    let stderr_layer = match log_format.as_str() {
        // Production: JSON structured logging
        "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        // Development: Pretty formatting with colors
        _ => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
