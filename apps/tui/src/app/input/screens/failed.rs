use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_failed_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Esc | KeyCode::Enter) {
        app.running = false;
    }
}
