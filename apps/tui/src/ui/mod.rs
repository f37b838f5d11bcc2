// Rendering: one function per screen plus the shared widgets

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match &app.screen {
        AppScreen::Loading => screens::loading::render_loading(app, f),
        AppScreen::Map => screens::map::render_map_screen(app, f),
        AppScreen::LoadFailed(message) => screens::failed::render_load_failed(app, message, f),
    }

    if app.show_help {
        widgets::popup::render_help_popup(f);
    }
}
