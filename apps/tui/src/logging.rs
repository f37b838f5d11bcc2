use crate::config::AppConfig;
use std::ffi::OsStr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs a file subscriber. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init(config: &AppConfig) -> color_eyre::eyre::Result<WorkerGuard> {
    let log_dir = config
        .log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("logs"));
    let log_file_name = config
        .log_file
        .file_name()
        .unwrap_or_else(|| OsStr::new("heatmap_tui.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking_file)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;

    Ok(guard)
}
