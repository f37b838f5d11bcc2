use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeatmapError>;

/// Failures raised by the loader, the statistics engine, the scaler and the
/// selection controller.
///
/// Load-time variants (`MalformedDataset`, `EmptyDataset`, `InvalidValue`,
/// `InvalidScale`) are fatal to initialization. `NoDataForYear` and
/// `IndexOutOfRange` are per-interaction and leave the last good render intact.
/// `NotInitialized` rejects transitions before the first successful render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeatmapError {
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("dataset contains no attribute values")]
    EmptyDataset,

    #[error("no rendered feature has a value for {year}")]
    NoDataForYear { year: String },

    #[error("invalid value for {attribute} on {feature}: {reason}")]
    InvalidValue {
        feature: String,
        attribute: String,
        reason: String,
    },

    #[error("invalid scale anchor {global_min}: the global minimum must be positive")]
    InvalidScale { global_min: f64 },

    #[error("selection index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the map has not been initialized")]
    NotInitialized,
}

impl HeatmapError {
    /// Whether the error only rejects a single interaction rather than
    /// invalidating the loaded dataset.
    pub const fn is_interaction_error(&self) -> bool {
        matches!(
            self,
            Self::NoDataForYear { .. } | Self::IndexOutOfRange { .. } | Self::NotInitialized
        )
    }
}

impl From<geojson::Error> for HeatmapError {
    fn from(error: geojson::Error) -> Self {
        Self::MalformedDataset(error.to_string())
    }
}
