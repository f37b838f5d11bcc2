//! Page state behind the browser view. Nothing here touches the DOM.

use heatmap_core::view::{LegendLayout, SequenceControl, ViewAdapter};
use heatmap_core::{
    parse_dataset, Feature, FeatureId, HeatmapError, LegendRow, LoaderOptions, MapContext,
    PopupFormatter, Position, RadiusScaler, SelectionController, StepDirection,
};

pub struct WebSymbol {
    pub id: FeatureId,
    pub name: String,
    pub position: Position,
    pub radius: f64,
    pub popup: String,
    pub visible: bool,
}

/// Retained state the controller writes into and `draw_web` reads from.
#[derive(Default)]
pub struct WebView {
    pub symbols: Vec<WebSymbol>,
    pub legend_heading: String,
    pub legend_year: String,
    /// Rows kept in `LegendRow::ALL` order.
    pub legend: Vec<(LegendRow, f64, String)>,
    pub labels: Vec<String>,
    pub slider: usize,
}

impl WebView {
    fn symbol_mut(&mut self, id: FeatureId) -> Option<&mut WebSymbol> {
        self.symbols.iter_mut().find(|symbol| symbol.id == id)
    }
}

impl ViewAdapter for WebView {
    fn add_symbol(&mut self, feature: &Feature, radius: f64, popup: &str) {
        if let Some(position) = feature.position() {
            self.symbols.push(WebSymbol {
                id: feature.id(),
                name: feature.name().to_string(),
                position,
                radius,
                popup: popup.to_string(),
                visible: true,
            });
        }
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
        self.legend_heading.clone_from(&layout.heading);
        self.legend_year.clone_from(&layout.year);
        self.legend.clear();
    }

    fn update_legend_circle(&mut self, row: LegendRow, radius: f64, _cy: f64, label: &str) {
        self.legend.retain(|(existing, _, _)| *existing != row);
        self.legend.push((row, radius, label.to_string()));
        self.legend
            .sort_by_key(|(row, _, _)| LegendRow::ALL.iter().position(|r| r == row));
    }

    fn update_legend_year(&mut self, year: &str) {
        self.legend_year = year.to_string();
    }

    fn add_sequence_control(&mut self, control: &SequenceControl) {
        self.labels.clone_from(&control.labels);
        self.slider = control.min;
    }

    fn update_slider(&mut self, index: usize) {
        self.slider = index;
    }
}

pub enum PageState {
    Loading,
    Ready {
        controller: Box<SelectionController>,
        view: WebView,
        selected: usize,
        status: String,
    },
    Failed(String),
}

impl PageState {
    /// Step button or arrow key. A rejected step leaves the map as it was and
    /// puts the error on the status line.
    pub fn step(&mut self, direction: StepDirection) -> Result<(), HeatmapError> {
        if let Self::Ready {
            controller,
            view,
            status,
            ..
        } = self
        {
            let result = controller.on_step_button(direction, view);
            *status = status_line(controller, result.as_ref().err());
            return result;
        }
        Ok(())
    }

    /// Slider jump, clamped into range.
    pub fn slide_to(&mut self, raw: i64) -> Result<(), HeatmapError> {
        if let Self::Ready {
            controller,
            view,
            status,
            ..
        } = self
        {
            let result = controller.on_slider_input(raw, view);
            *status = status_line(controller, result.as_ref().err());
            return result;
        }
        Ok(())
    }

    pub fn select(&mut self, forward: bool) {
        if let Self::Ready { view, selected, .. } = self {
            let len = view.symbols.len();
            if len > 0 {
                *selected = if forward {
                    (*selected + 1) % len
                } else {
                    (*selected + len - 1) % len
                };
            }
        }
    }
}

fn status_line(controller: &SelectionController, error: Option<&HeatmapError>) -> String {
    match error {
        Some(error) => format!("Error: {error}"),
        None => format!(
            "Year {} ({}/{})",
            controller.current_key().label(),
            controller.index() + 1,
            controller.len()
        ),
    }
}

/// Parses the fetched body and draws the first year, or records why it
/// could not.
pub fn build_page(text: &str) -> PageState {
    let prepared = parse_dataset(text, &LoaderOptions::default())
        .and_then(|dataset| MapContext::new(dataset, RadiusScaler::default(), PopupFormatter::default()))
        .and_then(SelectionController::new);

    let mut controller = match prepared {
        Ok(controller) => controller,
        Err(error) => return PageState::Failed(error.to_string()),
    };

    let mut view = WebView::default();
    match controller.initialize(&mut view) {
        Ok(()) => {
            let status = status_line(&controller, None);
            PageState::Ready {
                controller: Box::new(controller),
                view,
                selected: 0,
                status,
            }
        }
        Err(error) => PageState::Failed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-3.7, 40.42] },
          "properties": { "City_Name": "Madrid", "Temp_2018": 91.0, "Temp_2019": null, "Temp_2020": 92.4 } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [12.5, 41.9] },
          "properties": { "City_Name": "Rome", "Temp_2018": 88.0, "Temp_2020": 89.1 } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [23.73, 37.98] },
          "properties": { "City_Name": "Athens", "Temp_2018": 92.5, "Temp_2020": 93.0 } }
    ] }"#;

    fn ready_page() -> PageState {
        let page = build_page(DATA);
        if let PageState::Failed(message) = &page {
            panic!("fixture failed: {message}");
        }
        page
    }

    fn status(page: &PageState) -> &str {
        match page {
            PageState::Ready { status, .. } => status,
            _ => "",
        }
    }

    #[test]
    fn valid_document_is_ready_on_the_first_year() {
        let page = ready_page();
        let PageState::Ready { view, selected, .. } = &page else {
            panic!("page should be ready");
        };
        assert_eq!(view.symbols.len(), 3);
        assert_eq!(view.legend_year, "2018");
        assert_eq!(view.labels, ["2018", "2019", "2020"]);
        assert_eq!(*selected, 0);
        assert_eq!(status(&page), "Year 2018 (1/3)");
    }

    #[test]
    fn malformed_text_is_a_visible_failure() {
        assert!(matches!(build_page("not geojson"), PageState::Failed(_)));

        let no_features = r#"{ "type": "FeatureCollection", "features": [] }"#;
        let PageState::Failed(message) = build_page(no_features) else {
            panic!("empty collection should fail");
        };
        assert!(message.contains("malformed dataset"));
    }

    #[test]
    fn legend_rows_stay_in_max_mean_min_order() {
        let mut view = WebView::default();
        view.add_legend_control(&LegendLayout::new("Average August temperature in", "2018"));
        view.update_legend_circle(LegendRow::Min, 6.0, 110.0, "88° F");
        view.update_legend_circle(LegendRow::Max, 7.0, 30.0, "92.5° F");
        view.update_legend_circle(LegendRow::Mean, 6.5, 70.0, "90.25° F");
        view.update_legend_circle(LegendRow::Max, 7.5, 30.0, "93° F");

        let rows: Vec<_> = view.legend.iter().map(|(row, _, label)| (*row, label.as_str())).collect();
        assert_eq!(
            rows,
            [
                (LegendRow::Max, "93° F"),
                (LegendRow::Mean, "90.25° F"),
                (LegendRow::Min, "88° F"),
            ]
        );
    }

    #[test]
    fn city_selection_wraps() {
        let mut page = ready_page();
        page.select(false);
        assert!(matches!(page, PageState::Ready { selected: 2, .. }));
        page.select(true);
        assert!(matches!(page, PageState::Ready { selected: 0, .. }));

        let mut loading = PageState::Loading;
        loading.select(true);
        assert!(matches!(loading, PageState::Loading));
    }

    #[test]
    fn rejected_step_reports_on_the_status_line() {
        let mut page = ready_page();

        let result = page.step(StepDirection::Forward);
        assert!(matches!(result, Err(HeatmapError::NoDataForYear { .. })));
        assert!(status(&page).starts_with("Error: no rendered feature has a value for 2019"));
        let PageState::Ready { view, controller, .. } = &page else {
            panic!("page should stay ready");
        };
        assert_eq!(controller.index(), 0);
        assert_eq!(view.legend_year, "2018");

        assert!(page.slide_to(99).is_ok());
        assert_eq!(status(&page), "Year 2020 (3/3)");
    }
}
