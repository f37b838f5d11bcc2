//! The rendering surface the selection controller drives.
//!
//! Front ends implement [`ViewAdapter`] once per toolkit. The controller only
//! calls these methods; it never reads state back from the view.

use crate::domain::{Feature, FeatureId};
use crate::stats::LegendRow;

/// Legend control as first added to the view.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    /// Title text shown before the year, e.g. "Average August temperature in".
    pub heading: String,
    pub year: String,
    /// Rows from top to bottom with their fixed centres.
    pub rows: Vec<(LegendRow, f64)>,
    pub width: f64,
    pub height: f64,
}

impl LegendLayout {
    pub fn new(heading: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            year: year.into(),
            rows: LegendRow::ALL.iter().map(|row| (*row, row.cy())).collect(),
            width: 180.0,
            height: 140.0,
        }
    }
}

/// Slider bounds plus the labels of each stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceControl {
    pub min: usize,
    pub max: usize,
    pub step: usize,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Reverse,
}

pub trait ViewAdapter {
    fn add_symbol(&mut self, feature: &Feature, radius: f64, popup: &str);

    fn update_symbol_radius(&mut self, id: FeatureId, radius: f64);

    fn update_symbol_popup(&mut self, id: FeatureId, text: &str);

    /// Symbols of features without a value for the selected year are hidden.
    fn set_symbol_visible(&mut self, id: FeatureId, visible: bool);

    fn add_legend_control(&mut self, layout: &LegendLayout);

    fn update_legend_circle(&mut self, row: LegendRow, radius: f64, cy: f64, label: &str);

    fn update_legend_year(&mut self, year: &str);

    fn add_sequence_control(&mut self, control: &SequenceControl);

    /// Moves the slider to mirror the controller's index.
    fn update_slider(&mut self, index: usize);
}

/// Every call a [`RecordingView`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    AddSymbol {
        id: FeatureId,
        radius: f64,
        popup: String,
    },
    SymbolRadius {
        id: FeatureId,
        radius: f64,
    },
    SymbolPopup {
        id: FeatureId,
        text: String,
    },
    SymbolVisible {
        id: FeatureId,
        visible: bool,
    },
    AddLegend(LegendLayout),
    LegendCircle {
        row: LegendRow,
        radius: f64,
        cy: f64,
        label: String,
    },
    LegendYear(String),
    AddSequence(SequenceControl),
    Slider(usize),
}

/// A view that only records calls, for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Latest radius reported for `id`.
    pub fn radius_of(&self, id: FeatureId) -> Option<f64> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewCall::SymbolRadius { id: seen, radius } | ViewCall::AddSymbol { id: seen, radius, .. }
                if *seen == id =>
            {
                Some(*radius)
            }
            _ => None,
        })
    }

    /// Latest visibility reported for `id`.
    pub fn visibility_of(&self, id: FeatureId) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewCall::SymbolVisible { id: seen, visible } if *seen == id => Some(*visible),
            _ => None,
        })
    }

    pub fn legend_year(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewCall::LegendYear(year) => Some(year.as_str()),
            _ => None,
        })
    }

    pub fn legend_label(&self, row: LegendRow) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewCall::LegendCircle { row: seen, label, .. } if *seen == row => Some(label.as_str()),
            _ => None,
        })
    }
}

impl ViewAdapter for RecordingView {
    fn add_symbol(&mut self, feature: &Feature, radius: f64, popup: &str) {
        self.calls.push(ViewCall::AddSymbol {
            id: feature.id(),
            radius,
            popup: popup.to_string(),
        });
    }

    fn update_symbol_radius(&mut self, id: FeatureId, radius: f64) {
        self.calls.push(ViewCall::SymbolRadius { id, radius });
    }

    fn update_symbol_popup(&mut self, id: FeatureId, text: &str) {
        self.calls.push(ViewCall::SymbolPopup {
            id,
            text: text.to_string(),
        });
    }

    fn set_symbol_visible(&mut self, id: FeatureId, visible: bool) {
        self.calls.push(ViewCall::SymbolVisible { id, visible });
    }

    fn add_legend_control(&mut self, layout: &LegendLayout) {
        self.calls.push(ViewCall::AddLegend(layout.clone()));
    }

    fn update_legend_circle(&mut self, row: LegendRow, radius: f64, cy: f64, label: &str) {
        self.calls.push(ViewCall::LegendCircle {
            row,
            radius,
            cy,
            label: label.to_string(),
        });
    }

    fn update_legend_year(&mut self, year: &str) {
        self.calls.push(ViewCall::LegendYear(year.to_string()));
    }

    fn add_sequence_control(&mut self, control: &SequenceControl) {
        self.calls.push(ViewCall::AddSequence(control.clone()));
    }

    fn update_slider(&mut self, index: usize) {
        self.calls.push(ViewCall::Slider(index));
    }
}
