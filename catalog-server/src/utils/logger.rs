//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production
//! environments. `RUST_LOG` overrides the configured level when set.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with stdout output only.
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with an optional daily-rolling file appender.
///
/// `log_dir` must already exist; when it does not, logging falls back to
/// stdout so a misconfigured path never silences the server.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        if Path::new(dir).exists() {
            let file_appender = tracing_appender::rolling::daily(dir, "catalog-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
