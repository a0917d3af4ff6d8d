//! Logging setup
//!
//! Console output by default; when `log_dir` points at an existing directory
//! the same events go to a daily-rolling file instead.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Log file prefix inside `log_dir`
const LOG_FILE_PREFIX: &str = "storefront";

/// Filter used when neither RUST_LOG nor an explicit level is usable
fn default_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("storefront={log_level},tower_http={log_level}"))
        .unwrap_or_else(|_| EnvFilter::new("storefront=info,tower_http=info"))
}

/// Initialize the logger with optional file output
///
/// RUST_LOG wins over `log_level`. Safe to call more than once: later calls
/// are ignored, which lets tests share a process.
pub fn init_logger(log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, LOG_FILE_PREFIX);
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}
