use heatmap_core::{HeatmapError, SelectionController, StepDirection};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::app::input::helpers::{wrap_decrement, wrap_increment, StepThrottle};
use crate::config::AppConfig;
use crate::view::{MapView, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppScreen {
    Loading,
    Map,
    LoadFailed(String),
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub config: AppConfig,
    pub controller: Option<SelectionController>,
    pub view: MapView,
    pub status_message: String,
    pub show_help: bool,
    pub selected_symbol: usize,
    pub animation_counter: f64,
    pub last_frame: Instant,
    step_throttle: StepThrottle,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let step_throttle = StepThrottle::new(config.step_debounce);
        Self {
            running: true,
            screen: AppScreen::Loading,
            config,
            controller: None,
            view: MapView::new(),
            status_message: String::new(),
            show_help: false,
            selected_symbol: 0,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            step_throttle,
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }
    }

    /// Draws the initial state of a freshly loaded controller and switches to
    /// the map. A failure leaves the app on the failure screen with no
    /// controller installed.
    pub fn install_controller(&mut self, mut controller: SelectionController) -> Result<(), HeatmapError> {
        let mut view = MapView::new();
        controller.initialize(&mut view)?;

        info!(
            features = controller.context().dataset().features().len(),
            attributes = controller.len(),
            "map initialized"
        );
        self.view = view;
        self.controller = Some(controller);
        self.selected_symbol = 0;
        self.screen = AppScreen::Map;
        self.status_message = self.year_status();
        Ok(())
    }

    pub fn fail_loading(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "dataset failed to load");
        self.controller = None;
        self.view = MapView::new();
        self.screen = AppScreen::LoadFailed(message);
    }

    /// Step button or arrow key. Repeats inside the debounce window are
    /// dropped.
    pub fn step(&mut self, direction: StepDirection) {
        if !self.step_throttle.allow(Instant::now()) {
            return;
        }
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let result = controller.on_step_button(direction, &mut self.view);
        self.report(result);
    }

    /// Slider drag: clamps into range.
    pub fn slide_to(&mut self, raw: i64) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let result = controller.on_slider_input(raw, &mut self.view);
        self.report(result);
    }

    pub fn first_year(&mut self) {
        self.slide_to(0);
    }

    pub fn last_year(&mut self) {
        self.slide_to(i64::MAX);
    }

    pub fn select_next_symbol(&mut self) {
        let len = self.view.symbols().len();
        self.selected_symbol = wrap_increment(self.selected_symbol, len);
    }

    pub fn select_previous_symbol(&mut self) {
        let len = self.view.symbols().len();
        self.selected_symbol = wrap_decrement(self.selected_symbol, len);
    }

    pub fn selected_symbol(&self) -> Option<&Symbol> {
        self.view.symbols().get(self.selected_symbol)
    }

    pub fn current_year(&self) -> Option<&str> {
        self.controller
            .as_ref()
            .map(|controller| controller.current_key().label())
    }

    fn year_status(&self) -> String {
        match (&self.controller, self.current_year()) {
            (Some(controller), Some(year)) => format!(
                "Year {year} ({}/{})",
                controller.index() + 1,
                controller.len()
            ),
            _ => String::new(),
        }
    }

    fn report(&mut self, result: Result<(), HeatmapError>) {
        match result {
            Ok(()) => self.status_message = self.year_status(),
            Err(error) => {
                if error.is_interaction_error() {
                    warn!(%error, "selection change rejected");
                } else {
                    error!(%error, "selection change failed");
                }
                self.status_message = format!("Error: {error}");
            }
        }
    }
}
