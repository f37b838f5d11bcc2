use crate::app::state::App;
use crossterm::event::KeyCode;
use heatmap_core::StepDirection;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Right | KeyCode::Char('l') => app.step(StepDirection::Forward),
        KeyCode::Left | KeyCode::Char('h') => app.step(StepDirection::Reverse),
        KeyCode::Home => app.first_year(),
        KeyCode::End => app.last_year(),
        // Digits jump straight to a slider stop, 1 being the first year.
        KeyCode::Char(digit @ '1'..='9') => {
            let stop = digit.to_digit(10).map_or(0, |d| i64::from(d) - 1);
            app.slide_to(stop);
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.select_next_symbol(),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.select_previous_symbol(),
        KeyCode::Esc => app.running = false,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::build_controller;
    use crate::config::AppConfig;
    use heatmap_core::{parse_dataset, LoaderOptions};
    use std::time::Duration;

    fn app_with_years(years: usize) -> App {
        let properties = (0..years)
            .map(|i| format!("\"Temp_{}\": {}", 2018 + i, 70 + i))
            .collect::<Vec<_>>()
            .join(", ");
        let text = format!(
            r#"{{ "type": "FeatureCollection", "features": [
                {{ "type": "Feature", "geometry": {{ "type": "Point", "coordinates": [0.0, 0.0] }},
                   "properties": {{ "City_Name": "Null Island", {properties} }} }}
            ] }}"#
        );
        let config = AppConfig {
            step_debounce: Duration::ZERO,
            ..AppConfig::default()
        };
        let mut app = App::new(config.clone());
        let controller = parse_dataset(&text, &LoaderOptions::default())
            .and_then(|dataset| build_controller(dataset, &config));
        match controller {
            Ok(controller) => {
                if let Err(error) = app.install_controller(controller) {
                    panic!("install failed: {error}");
                }
            }
            Err(error) => panic!("fixture failed: {error}"),
        }
        app
    }

    #[test]
    fn arrows_and_vim_keys_step() {
        let mut app = app_with_years(4);
        handle_map_input(&mut app, KeyCode::Right);
        handle_map_input(&mut app, KeyCode::Char('l'));
        assert_eq!(app.current_year(), Some("2020"));
        handle_map_input(&mut app, KeyCode::Char('h'));
        assert_eq!(app.current_year(), Some("2019"));
    }

    #[test]
    fn digits_jump_and_clamp() {
        let mut app = app_with_years(4);
        handle_map_input(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_year(), Some("2020"));
        handle_map_input(&mut app, KeyCode::Char('9'));
        assert_eq!(app.current_year(), Some("2021"));
        handle_map_input(&mut app, KeyCode::Home);
        assert_eq!(app.current_year(), Some("2018"));
        handle_map_input(&mut app, KeyCode::End);
        assert_eq!(app.current_year(), Some("2021"));
    }
}
