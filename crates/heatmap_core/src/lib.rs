//! Proportional-symbol engine for time-series GeoJSON maps.
//!
//! Loads a feature collection with year-keyed attributes, summarises it,
//! sizes circles with Flannery compensation and keeps a year selection, its
//! symbols and its legend consistent through a [`ViewAdapter`].

pub mod dataset;
pub mod domain;
pub mod error;
pub mod popup;
pub mod scale;
pub mod selection;
pub mod stats;
pub mod view;

pub use dataset::{parse_dataset, LoaderOptions};
pub use domain::{AttributeKey, Dataset, Feature, FeatureId, Position};
pub use error::{HeatmapError, Result};
pub use popup::PopupFormatter;
pub use scale::{radius, RadiusScaler};
pub use selection::{MapContext, RedrawPlan, SelectionController, SelectionIndex};
pub use stats::{
    compute_global_stats, compute_selection_stats, year_summaries, GlobalStats, LegendRow,
    SelectionStats, YearSummary,
};
pub use view::{LegendLayout, SequenceControl, StepDirection, ViewAdapter};
