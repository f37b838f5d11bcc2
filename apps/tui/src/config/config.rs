use color_eyre::eyre::eyre;
use dotenv::dotenv;
use heatmap_core::dataset::{DEFAULT_ATTRIBUTE_PREFIX, DEFAULT_NAME_PROPERTY};
use heatmap_core::scale::DEFAULT_MIN_RADIUS;
use heatmap_core::{LoaderOptions, RadiusScaler};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_PATH: &str = "data/time_series.geojson";
pub const DEFAULT_LOG_FILE: &str = "logs/heatmap_tui.log";
pub const DEFAULT_STEP_DEBOUNCE_MS: u64 = 60;

/// Runtime settings, read from the environment (and `.env`) after CLI
/// overrides have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub attribute_prefix: String,
    pub name_property: String,
    pub min_radius: f64,
    pub step_debounce: Duration,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            min_radius: DEFAULT_MIN_RADIUS,
            step_debounce: Duration::from_millis(DEFAULT_STEP_DEBOUNCE_MS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env` and reads every `HEATMAP_*` variable, falling back to the
    /// defaults for unset ones.
    pub fn from_env() -> color_eyre::eyre::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> color_eyre::eyre::Result<Self> {
        let defaults = Self::default();

        let min_radius = match lookup("HEATMAP_MIN_RADIUS") {
            Some(raw) => {
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| eyre!("HEATMAP_MIN_RADIUS={raw:?}: {e}"))?;
                if !(value.is_finite() && value > 0.0) {
                    return Err(eyre!("HEATMAP_MIN_RADIUS must be positive, got {value}"));
                }
                value
            }
            None => defaults.min_radius,
        };

        let step_debounce = match lookup("HEATMAP_STEP_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| eyre!("HEATMAP_STEP_DEBOUNCE_MS={raw:?}: {e}"))?,
            ),
            None => defaults.step_debounce,
        };

        Ok(Self {
            data_path: lookup("HEATMAP_DATA").map_or(defaults.data_path, PathBuf::from),
            attribute_prefix: lookup("HEATMAP_ATTRIBUTE_PREFIX")
                .unwrap_or(defaults.attribute_prefix),
            name_property: lookup("HEATMAP_NAME_PROPERTY").unwrap_or(defaults.name_property),
            min_radius,
            step_debounce,
            log_file: lookup("LOG_FILE_PATH").map_or(defaults.log_file, PathBuf::from),
            debug: lookup("DEBUG").is_some_and(|value| value != "0" && !value.is_empty()),
        })
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            attribute_prefix: self.attribute_prefix.clone(),
            name_property: self.name_property.clone(),
        }
    }

    pub fn scaler(&self) -> RadiusScaler {
        RadiusScaler::new(self.min_radius)
    }
}
