use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod failed;
mod help;
mod map;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if matches!(key, KeyCode::Char('q')) {
        app.running = false;
        return;
    }

    match app.screen {
        AppScreen::Loading => {
            if key == KeyCode::Esc {
                app.running = false;
            }
        }
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::LoadFailed(_) => failed::handle_failed_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn q_quits_from_any_screen() {
        let mut app = App::new(AppConfig::default());
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);

        let mut app = App::new(AppConfig::default());
        app.fail_loading("boom");
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = App::new(AppConfig::default());
        dispatch_input(&mut app, KeyCode::F(1));
        assert!(app.show_help);

        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(app.running);
    }
}
