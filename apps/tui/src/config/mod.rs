#[allow(clippy::module_inception)]
mod config;

pub use config::{AppConfig, DEFAULT_DATA_PATH, DEFAULT_LOG_FILE, DEFAULT_STEP_DEBOUNCE_MS};
