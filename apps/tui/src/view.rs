//! Terminal implementation of the map view.
//!
//! `MapView` is a projection of the selection controller: it stores what the
//! controller told it and the renderer draws from it each frame.

use heatmap_core::view::{LegendLayout, SequenceControl, ViewAdapter};
use heatmap_core::{Feature, FeatureId, LegendRow, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: FeatureId,
    pub name: String,
    pub position: Position,
    pub radius: f64,
    pub popup: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendCircle {
    pub row: LegendRow,
    pub radius: f64,
    pub cy: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub layout: LegendLayout,
    pub year: String,
    pub circles: Vec<LegendCircle>,
}

impl Legend {
    pub fn title(&self) -> String {
        format!("{} {}", self.layout.heading, self.year)
    }

    pub fn circle(&self, row: LegendRow) -> Option<&LegendCircle> {
        self.circles.iter().find(|circle| circle.row == row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    pub control: SequenceControl,
    pub value: usize,
}

impl Slider {
    pub fn label(&self) -> &str {
        self.control
            .labels
            .get(self.value)
            .map_or("", String::as_str)
    }

    /// Position in `0.0..=1.0` for gauge rendering.
    pub fn ratio(&self) -> f64 {
        let span = self.control.max.saturating_sub(self.control.min);
        if span == 0 {
            return 1.0;
        }
        (self.value.saturating_sub(self.control.min) as f64 / span as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapView {
    symbols: Vec<Symbol>,
    legend: Option<Legend>,
    slider: Option<Slider>,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn visible_symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter().filter(|symbol| symbol.visible)
    }

    pub fn symbol(&self, id: FeatureId) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.id == id)
    }

    pub const fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub const fn slider(&self) -> Option<&Slider> {
        self.slider.as_ref()
    }

    fn symbol_mut(&mut self, id: FeatureId) -> Option<&mut Symbol> {
        self.symbols.iter_mut().find(|symbol| symbol.id == id)
    }
}

impl ViewAdapter for MapView {
    fn add_symbol(&mut self, feature: &Feature, radius: f64, popup: &str) {
        let Some(position) = feature.position() else {
            return;
        };
        self.symbols.push(Symbol {
            id: feature.id(),
            name: feature.name().to_string(),
            position,
            radius,
            popup: popup.to_string(),
            visible: true,
        });
    }

    fn update_symbol_radius(&mut self, id: FeatureId, radius: f64) {
        if let Some(symbol) = self.symbol_mut(id) {
            symbol.radius = radius;
        }
    }

    fn update_symbol_popup(&mut self, id: FeatureId, text: &str) {
        if let Some(symbol) = self.symbol_mut(id) {
            symbol.popup = text.to_string();
        }
    }

    fn set_symbol_visible(&mut self, id: FeatureId, visible: bool) {
        if let Some(symbol) = self.symbol_mut(id) {
            symbol.visible = visible;
        }
    }

    fn add_legend_control(&mut self, layout: &LegendLayout) {
        self.legend = Some(Legend {
            layout: layout.clone(),
            year: layout.year.clone(),
            circles: Vec::new(),
        });
    }

    fn update_legend_circle(&mut self, row: LegendRow, radius: f64, cy: f64, label: &str) {
        let Some(legend) = self.legend.as_mut() else {
            return;
        };
        let circle = LegendCircle {
            row,
            radius,
            cy,
            label: label.to_string(),
        };
        match legend.circles.iter_mut().find(|existing| existing.row == row) {
            Some(existing) => *existing = circle,
            None => legend.circles.push(circle),
        }
    }

    fn update_legend_year(&mut self, year: &str) {
        if let Some(legend) = self.legend.as_mut() {
            legend.year = year.to_string();
        }
    }

    fn add_sequence_control(&mut self, control: &SequenceControl) {
        self.slider = Some(Slider {
            control: control.clone(),
            value: control.min,
        });
    }

    fn update_slider(&mut self, index: usize) {
        if let Some(slider) = self.slider.as_mut() {
            slider.value = index;
        }
    }
}
