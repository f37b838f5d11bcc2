mod app;
mod cli;
mod config;
mod event;
mod logging;
mod terminal;
mod ui;
mod view;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use config::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config)?;
    info!(data = %config.data_path.display(), "starting heatmap");

    // No terminal to draw on: print the statistics instead.
    if args.headless || args.json || !is_terminal() {
        return event::run_headless(&config, args.json).await;
    }

    let mut app = App::new(config);
    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup(true, true);

    if let Err(e) = &result {
        error!(%e, "event loop failed");
    }
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
