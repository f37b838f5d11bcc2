//! Year selection state machine.
//!
//! The [`SelectionController`] owns the authoritative year index. Every
//! transition first builds a complete [`RedrawPlan`] for the candidate index;
//! only when that succeeds is the index committed and the plan pushed to the
//! view, so a failed transition leaves both untouched.

use tracing::{debug, warn};

use crate::domain::{AttributeKey, Dataset, FeatureId};
use crate::error::{HeatmapError, Result};
use crate::popup::PopupFormatter;
use crate::scale::RadiusScaler;
use crate::stats::{compute_global_stats, compute_selection_stats, GlobalStats, LegendRow, SelectionStats};
use crate::view::{LegendLayout, SequenceControl, StepDirection, ViewAdapter};

/// Position in the ordered attribute keys, always inside `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionIndex {
    index: usize,
    len: usize,
}

impl SelectionIndex {
    pub const fn first(len: usize) -> Option<Self> {
        if len == 0 {
            None
        } else {
            Some(Self { index: 0, len })
        }
    }

    pub const fn get(self) -> usize {
        self.index
    }

    pub const fn len(self) -> usize {
        self.len
    }

    pub const fn last(self) -> usize {
        self.len - 1
    }

    /// Next index, wrapping from the last to 0.
    #[must_use]
    pub const fn advanced(self) -> Self {
        Self {
            index: (self.index + 1) % self.len,
            len: self.len,
        }
    }

    /// Previous index, wrapping from 0 to the last.
    #[must_use]
    pub const fn retreated(self) -> Self {
        Self {
            index: (self.index + self.len - 1) % self.len,
            len: self.len,
        }
    }

    #[must_use]
    pub const fn stepped(self, direction: StepDirection) -> Self {
        match direction {
            StepDirection::Forward => self.advanced(),
            StepDirection::Reverse => self.retreated(),
        }
    }

    pub fn checked(self, index: usize) -> Result<Self> {
        if index < self.len {
            Ok(Self {
                index,
                len: self.len,
            })
        } else {
            Err(HeatmapError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Clamps raw slider input into range.
    #[must_use]
    pub fn clamped(self, raw: i64) -> Self {
        let last = i64::try_from(self.last()).unwrap_or(i64::MAX);
        let index = usize::try_from(raw.clamp(0, last)).unwrap_or(0);
        Self {
            index,
            len: self.len,
        }
    }
}

/// Everything the controller needs, built once after loading.
#[derive(Debug, Clone)]
pub struct MapContext {
    dataset: Dataset,
    global: GlobalStats,
    scaler: RadiusScaler,
    formatter: PopupFormatter,
}

impl MapContext {
    /// Computes the global stats and checks that their minimum can anchor the
    /// radius scale.
    pub fn new(dataset: Dataset, scaler: RadiusScaler, formatter: PopupFormatter) -> Result<Self> {
        let global = compute_global_stats(dataset.features(), dataset.keys())?;
        scaler.radius(global.min, global.min)?;
        debug!(min = global.min, max = global.max, mean = global.mean, "global stats");

        Ok(Self {
            dataset,
            global,
            scaler,
            formatter,
        })
    }

    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub const fn global_stats(&self) -> GlobalStats {
        self.global
    }

    pub const fn scaler(&self) -> RadiusScaler {
        self.scaler
    }

    pub const fn formatter(&self) -> &PopupFormatter {
        &self.formatter
    }

    pub fn radius(&self, value: f64) -> Result<f64> {
        self.scaler.radius(value, self.global.min)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolUpdate {
    Show {
        id: FeatureId,
        radius: f64,
        popup: String,
    },
    Hide {
        id: FeatureId,
        popup: String,
    },
}

impl SymbolUpdate {
    pub const fn id(&self) -> FeatureId {
        match self {
            Self::Show { id, .. } | Self::Hide { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendUpdate {
    pub row: LegendRow,
    pub radius: f64,
    pub cy: f64,
    pub label: String,
}

/// The full set of view changes for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawPlan {
    pub index: usize,
    pub year: String,
    pub stats: SelectionStats,
    pub symbols: Vec<SymbolUpdate>,
    pub legend: Vec<LegendUpdate>,
}

impl RedrawPlan {
    fn apply<V: ViewAdapter + ?Sized>(&self, view: &mut V) {
        for update in &self.symbols {
            match update {
                SymbolUpdate::Show { id, radius, popup } => {
                    view.set_symbol_visible(*id, true);
                    view.update_symbol_radius(*id, *radius);
                    view.update_symbol_popup(*id, popup);
                }
                SymbolUpdate::Hide { id, popup } => {
                    view.set_symbol_visible(*id, false);
                    view.update_symbol_popup(*id, popup);
                }
            }
        }

        for row in &self.legend {
            view.update_legend_circle(row.row, row.radius, row.cy, &row.label);
        }
        view.update_legend_year(&self.year);
        view.update_slider(self.index);
    }
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    context: MapContext,
    selection: SelectionIndex,
    current: Option<SelectionStats>,
}

impl SelectionController {
    pub fn new(context: MapContext) -> Result<Self> {
        let selection = SelectionIndex::first(context.dataset().keys().len()).ok_or_else(|| {
            HeatmapError::MalformedDataset("no attribute keys".to_string())
        })?;

        Ok(Self {
            context,
            selection,
            current: None,
        })
    }

    pub const fn context(&self) -> &MapContext {
        &self.context
    }

    pub const fn index(&self) -> usize {
        self.selection.get()
    }

    pub const fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn current_key(&self) -> &AttributeKey {
        &self.context.dataset().keys()[self.selection.get()]
    }

    /// Stats of the last successful render, `None` before `initialize`.
    pub const fn current_stats(&self) -> Option<SelectionStats> {
        self.current
    }

    /// Adds symbols, legend and slider, then renders the first year that
    /// has data on a rendered feature. Fails only when no year has any.
    pub fn initialize<V: ViewAdapter + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        let (start, plan) = self.first_renderable()?;

        let dataset = self.context.dataset();
        for update in &plan.symbols {
            let Some(feature) = dataset.feature(update.id()) else {
                continue;
            };
            match update {
                SymbolUpdate::Show { radius, popup, .. } => view.add_symbol(feature, *radius, popup),
                SymbolUpdate::Hide { popup, .. } => {
                    view.add_symbol(feature, self.context.scaler().min_radius(), popup);
                }
            }
        }

        view.add_legend_control(&LegendLayout::new(
            self.context.formatter().legend_title.clone(),
            plan.year.clone(),
        ));
        view.add_sequence_control(&SequenceControl {
            min: 0,
            max: self.selection.last(),
            step: 1,
            labels: dataset.keys().iter().map(|key| key.label().to_string()).collect(),
        });

        self.selection = start;
        plan.apply(view);
        self.current = Some(plan.stats);
        debug!(year = %plan.year, symbols = plan.symbols.len(), "initial render");
        Ok(())
    }

    /// Earliest index whose plan succeeds. Years without data are skipped;
    /// any other planning error is returned as is.
    fn first_renderable(&self) -> Result<(SelectionIndex, RedrawPlan)> {
        let mut index = self.selection;
        for _ in 0..self.selection.len() {
            match self.plan(index.get()) {
                Ok(plan) => return Ok((index, plan)),
                Err(HeatmapError::NoDataForYear { year }) => {
                    warn!(%year, "no rendered feature has data, skipping at start");
                }
                Err(error) => return Err(error),
            }
            index = index.advanced();
        }
        Err(HeatmapError::EmptyDataset)
    }

    pub fn advance<V: ViewAdapter + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.transition(self.selection.advanced(), view)
    }

    pub fn retreat<V: ViewAdapter + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.transition(self.selection.retreated(), view)
    }

    /// Jumps to `index`, rejecting anything outside `0..len`.
    pub fn set_index<V: ViewAdapter + ?Sized>(&mut self, index: usize, view: &mut V) -> Result<()> {
        let target = self.selection.checked(index)?;
        self.transition(target, view)
    }

    pub fn on_step_button<V: ViewAdapter + ?Sized>(
        &mut self,
        direction: StepDirection,
        view: &mut V,
    ) -> Result<()> {
        self.transition(self.selection.stepped(direction), view)
    }

    /// Slider input is clamped into range before it reaches `set_index`.
    pub fn on_slider_input<V: ViewAdapter + ?Sized>(&mut self, raw: i64, view: &mut V) -> Result<()> {
        let target = self.selection.clamped(raw);
        self.set_index(target.get(), view)
    }

    /// Builds the redraw for `index` without touching any state.
    pub fn plan(&self, index: usize) -> Result<RedrawPlan> {
        let key = self
            .context
            .dataset()
            .key(index)
            .ok_or(HeatmapError::IndexOutOfRange {
                index,
                len: self.selection.len(),
            })?;
        let dataset = self.context.dataset();
        let formatter = self.context.formatter();
        let stats = compute_selection_stats(dataset.rendered_features(), key)?;

        let symbols = dataset
            .rendered_features()
            .map(|feature| match feature.value(key) {
                Some(value) => Ok(SymbolUpdate::Show {
                    id: feature.id(),
                    radius: self.context.radius(value)?,
                    popup: formatter.popup(feature.name(), key.label(), value),
                }),
                None => Ok(SymbolUpdate::Hide {
                    id: feature.id(),
                    popup: formatter.no_data_popup(feature.name(), key.label()),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        let legend = LegendRow::ALL
            .iter()
            .map(|row| {
                let value = row.value(&stats);
                Ok(LegendUpdate {
                    row: *row,
                    radius: self.context.radius(value)?,
                    cy: row.cy(),
                    label: formatter.legend_label(value),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RedrawPlan {
            index,
            year: key.label().to_string(),
            stats,
            symbols,
            legend,
        })
    }

    fn transition<V: ViewAdapter + ?Sized>(
        &mut self,
        target: SelectionIndex,
        view: &mut V,
    ) -> Result<()> {
        if self.current.is_none() {
            return Err(HeatmapError::NotInitialized);
        }
        let from = self.selection.get();
        let plan = match self.plan(target.get()) {
            Ok(plan) => plan,
            Err(error) => {
                warn!(from, to = target.get(), %error, "transition rejected");
                return Err(error);
            }
        };

        self.selection = target;
        plan.apply(view);
        self.current = Some(plan.stats);
        debug!(from, to = target.get(), year = %plan.year, "selection changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feature, Position};
    use crate::view::{RecordingView, ViewCall};

    const ORIGIN: Option<Position> = Some(Position { lon: 0.0, lat: 0.0 });

    fn controller(years: &[&str], rows: &[(&str, Vec<Option<f64>>)]) -> Result<SelectionController> {
        let keys = years
            .iter()
            .map(|year| AttributeKey::new(format!("Temp_{year}"), "Temp_"))
            .collect::<Vec<_>>();
        let mut features = Vec::new();
        for (index, (name, values)) in rows.iter().enumerate() {
            let mut feature = Feature::new(FeatureId(index), *name, ORIGIN);
            for (key, value) in keys.iter().zip(values.iter()) {
                if let Some(value) = value {
                    feature.insert_value(key, *value)?;
                }
            }
            features.push(feature);
        }
        let dataset = Dataset::new(keys, features)?;
        let context = MapContext::new(dataset, RadiusScaler::default(), PopupFormatter::default())?;
        SelectionController::new(context)
    }

    #[test]
    fn index_wraps_both_ways() {
        let Some(first) = SelectionIndex::first(4) else {
            panic!("non-empty");
        };
        assert_eq!(first.retreated().get(), 3);
        assert_eq!(first.retreated().advanced().get(), 0);

        let mut index = first;
        for _ in 0..4 {
            index = index.advanced();
        }
        assert_eq!(index, first);

        let mut index = first.checked(2).unwrap();
        for _ in 0..4 {
            index = index.advanced().retreated();
        }
        assert_eq!(index.get(), 2);
    }

    #[test]
    fn checked_rejects_out_of_range() {
        let Some(first) = SelectionIndex::first(3) else {
            panic!("non-empty");
        };
        assert_eq!(
            first.checked(3),
            Err(HeatmapError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(first.checked(2).is_ok());
        assert!(SelectionIndex::first(0).is_none());
    }

    #[test]
    fn clamped_keeps_input_in_range() {
        let Some(first) = SelectionIndex::first(8) else {
            panic!("non-empty");
        };
        assert_eq!(first.clamped(-4).get(), 0);
        assert_eq!(first.clamped(5).get(), 5);
        assert_eq!(first.clamped(99).get(), 7);
    }

    #[test]
    fn initialize_renders_first_year() -> Result<()> {
        let mut controller = controller(
            &["2018", "2019"],
            &[
                ("A", vec![Some(10.0), Some(20.0)]),
                ("B", vec![Some(30.0), Some(40.0)]),
            ],
        )?;
        let mut view = RecordingView::new();
        controller.initialize(&mut view)?;

        assert_eq!(controller.index(), 0);
        assert_eq!(view.legend_year(), Some("2018"));
        assert_eq!(view.legend_label(LegendRow::Max), Some("30° F"));
        assert_eq!(view.legend_label(LegendRow::Mean), Some("20° F"));
        assert_eq!(view.legend_label(LegendRow::Min), Some("10° F"));
        assert!(view
            .calls
            .iter()
            .any(|call| matches!(call, ViewCall::AddSequence(control) if control.max == 1)));
        assert_eq!(
            controller.current_stats(),
            Some(SelectionStats {
                min: 10.0,
                max: 30.0,
                mean: 20.0
            })
        );
        Ok(())
    }

    #[test]
    fn failed_transition_leaves_view_and_index() -> Result<()> {
        let mut controller = controller(
            &["2018", "2019", "2020"],
            &[
                ("A", vec![Some(10.0), None, Some(12.0)]),
                ("B", vec![Some(30.0), None, None]),
            ],
        )?;
        let mut view = RecordingView::new();
        controller.initialize(&mut view)?;
        view.clear();

        let error = controller.advance(&mut view).unwrap_err();
        assert_eq!(
            error,
            HeatmapError::NoDataForYear {
                year: "2019".to_string()
            }
        );
        assert_eq!(controller.index(), 0);
        assert!(view.calls.is_empty());

        controller.set_index(2, &mut view)?;
        assert_eq!(controller.index(), 2);
        assert_eq!(view.visibility_of(FeatureId(1)), Some(false));
        Ok(())
    }

    #[test]
    fn step_buttons_and_slider_drive_the_same_transitions() -> Result<()> {
        let mut controller = controller(
            &["2018", "2019", "2020"],
            &[("A", vec![Some(10.0), Some(11.0), Some(12.0)])],
        )?;
        let mut view = RecordingView::new();
        controller.initialize(&mut view)?;

        controller.on_step_button(StepDirection::Reverse, &mut view)?;
        assert_eq!(controller.index(), 2);
        controller.on_step_button(StepDirection::Forward, &mut view)?;
        assert_eq!(controller.index(), 0);

        controller.on_slider_input(40, &mut view)?;
        assert_eq!(controller.index(), 2);
        controller.on_slider_input(-1, &mut view)?;
        assert_eq!(controller.index(), 0);

        assert!(controller.set_index(3, &mut view).is_err());
        assert_eq!(controller.index(), 0);
        Ok(())
    }
}
