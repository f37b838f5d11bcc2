use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use heatmap_core::{year_summaries, Dataset, GlobalStats, SelectionController, YearSummary};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::app::actions::{build_controller, load_dataset};
use crate::app::{handle_input, App};
use crate::config::AppConfig;
use crate::ui;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug)]
enum LoadEvent {
    Start,
    Loaded(Box<SelectionController>),
    Failed(String),
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Loaded(controller) => write!(f, "Loaded({} attributes)", controller.len()),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid transition from {from} with event {event}")]
struct StateTransitionError {
    from: LoadState,
    event: String,
}

/// Tracks the one asynchronous load of the session. Once `Ready` or
/// `Failed` the machine accepts no further events.
struct LoadMachine {
    state: LoadState,
}

impl LoadMachine {
    const fn new(initial_state: LoadState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> LoadState {
        self.state
    }

    fn process_event(
        &mut self,
        event: LoadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        debug!(from = %self.state, to = %next_state.0, "load state transition");
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(LoadState);

impl TryFrom<(LoadState, LoadEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(value: (LoadState, LoadEvent, &mut App)) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (LoadState::Idle, LoadEvent::Start) => {
                app.status_message = format!("Loading {}...", app.config.data_path.display());
                Ok(Self(LoadState::Loading))
            }
            (LoadState::Loading, LoadEvent::Loaded(controller)) => {
                match app.install_controller(*controller) {
                    Ok(()) => Ok(Self(LoadState::Ready)),
                    Err(error) => {
                        app.fail_loading(error.to_string());
                        Ok(Self(LoadState::Failed))
                    }
                }
            }
            (LoadState::Loading, LoadEvent::Failed(message)) => {
                app.fail_loading(message);
                Ok(Self(LoadState::Failed))
            }
            (from, event) => Err(StateTransitionError {
                from,
                event: event.to_string(),
            }),
        }
    }
}

type LoadResult = std::result::Result<SelectionController, String>;

/// Loads and prepares the dataset off the render loop.
fn spawn_load(config: &AppConfig) -> oneshot::Receiver<LoadResult> {
    let (tx, rx) = oneshot::channel();
    let config = config.clone();

    tokio::spawn(async move {
        let result = match load_dataset(&config.data_path, &config.loader_options()).await {
            Ok(dataset) => build_controller(dataset, &config).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if tx.send(result).is_err() {
            debug!("load finished after the UI went away");
        }
    });

    rx
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let dataset = load_dataset(&config.data_path, &config.loader_options()).await?;
    let controller = build_controller(dataset, config)?;
    let stats = build_headless_stats(config, &controller);

    if json {
        let json = serde_json::to_string_pretty(&stats)?;
        println!("{json}");
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nSummer Heat Map Stats");
    println!("=====================");
    println!("Dataset: {}", stats.dataset);
    println!("Features: {} ({} with a point)", stats.features, stats.rendered);
    println!(
        "Global: min {:.2} | max {:.2} | mean {:.2}",
        stats.global.min, stats.global.max, stats.global.mean
    );
    println!("Minimum radius: {:.2}", stats.min_radius);
    let attributes: Vec<&str> = stats.years.iter().map(|y| y.attribute.as_str()).collect();
    println!("Attributes: {}", attributes.join(", "));

    println!("\nBy Year:");
    for summary in &stats.years {
        match summary.stats {
            Some(year) => println!(
                "- {}: min {:.2} | max {:.2} | mean {:.2}",
                summary.year, year.min, year.max, year.mean
            ),
            None => println!("- {}: no data", summary.year),
        }
    }
}

fn build_headless_stats(config: &AppConfig, controller: &SelectionController) -> HeadlessStats {
    let context = controller.context();
    let dataset: &Dataset = context.dataset();

    HeadlessStats {
        dataset: config.data_path.display().to_string(),
        features: dataset.features().len(),
        rendered: dataset.rendered_features().count(),
        global: context.global_stats(),
        min_radius: context.scaler().min_radius(),
        years: year_summaries(dataset),
    }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    dataset: String,
    features: usize,
    rendered: usize,
    global: GlobalStats,
    min_radius: f64,
    years: Vec<YearSummary>,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut load_machine = LoadMachine::new(LoadState::Idle);
    let mut pending: Option<oneshot::Receiver<LoadResult>> = None;

    loop {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if load_machine.state() == LoadState::Idle {
            pending = Some(spawn_load(&app.config));
            if let Err(e) = load_machine.process_event(LoadEvent::Start, app) {
                error!(%e, "could not start loading");
            }
        }

        if let Some(receiver) = pending.as_mut() {
            let event = match receiver.try_recv() {
                Ok(Ok(controller)) => Some(LoadEvent::Loaded(Box::new(controller))),
                Ok(Err(message)) => Some(LoadEvent::Failed(message)),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => {
                    Some(LoadEvent::Failed("Loader stopped before finishing".to_string()))
                }
            };
            if let Some(event) = event {
                pending = None;
                if let Err(e) = load_machine.process_event(event, app) {
                    error!(%e, "unexpected load event");
                }
                info!(state = %load_machine.state(), "load finished");
            }
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppScreen;
    use heatmap_core::{parse_dataset, LoaderOptions};

    const DATA: &str = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [151.2, -33.87] },
          "properties": { "City_Name": "Sydney", "Temp_2018": 63.0, "Temp_2019": 64.4 } }
    ] }"#;

    fn controller() -> SelectionController {
        let built = parse_dataset(DATA, &LoaderOptions::default())
            .and_then(|dataset| build_controller(dataset, &AppConfig::default()));
        match built {
            Ok(controller) => controller,
            Err(error) => panic!("fixture failed: {error}"),
        }
    }

    #[test]
    fn load_machine_reaches_ready() -> std::result::Result<(), StateTransitionError> {
        let mut app = App::new(AppConfig::default());
        let mut machine = LoadMachine::new(LoadState::Idle);

        machine.process_event(LoadEvent::Start, &mut app)?;
        assert_eq!(machine.state(), LoadState::Loading);
        assert!(app.status_message.starts_with("Loading"));

        machine.process_event(LoadEvent::Loaded(Box::new(controller())), &mut app)?;
        assert_eq!(machine.state(), LoadState::Ready);
        assert_eq!(app.screen, AppScreen::Map);
        Ok(())
    }

    #[test]
    fn load_machine_records_failure() -> std::result::Result<(), StateTransitionError> {
        let mut app = App::new(AppConfig::default());
        let mut machine = LoadMachine::new(LoadState::Idle);

        machine.process_event(LoadEvent::Start, &mut app)?;
        machine.process_event(LoadEvent::Failed("Dataset has no features".to_string()), &mut app)?;
        assert_eq!(machine.state(), LoadState::Failed);
        assert_eq!(
            app.screen,
            AppScreen::LoadFailed("Dataset has no features".to_string())
        );
        Ok(())
    }

    #[test]
    fn finished_machine_rejects_more_events() {
        let mut app = App::new(AppConfig::default());
        let mut machine = LoadMachine::new(LoadState::Failed);

        let result = machine.process_event(LoadEvent::Start, &mut app);
        let Err(error) = result else {
            panic!("transition should be rejected");
        };
        assert_eq!(error.to_string(), "Invalid transition from Failed with event Start");
        assert_eq!(machine.state(), LoadState::Failed);
    }

    #[test]
    fn headless_stats_cover_every_year() {
        let stats = build_headless_stats(&AppConfig::default(), &controller());
        assert_eq!(stats.features, 1);
        assert_eq!(stats.years.len(), 2);
        assert!((stats.global.min - 63.0).abs() < f64::EPSILON);

        let json = serde_json::to_value(&stats).unwrap_or_default();
        assert_eq!(json["years"][1]["year"], "2019");
    }
}
