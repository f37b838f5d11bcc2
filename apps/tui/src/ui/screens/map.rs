use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::legend::render_legend;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::render_symbol_popup;
use crate::ui::widgets::slider::render_slider;

pub fn render_map_screen(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Map and side panel
            Constraint::Length(3), // Slider
            Constraint::Length(1), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_body(app, f, layout[0]);
    render_slider(app.view.slider(), f, layout[1]);
    render_status(app, f, layout[2]);
    render_shortcuts(f, layout[3]);
}

fn render_body(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(36)])
        .split(area);

    let title = app
        .current_year()
        .map_or_else(|| "Summer Heat Map".to_string(), |year| format!("Summer Heat Map {year}"));
    render_map(&app.view, app.selected_symbol(), &title, f, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(5)])
        .split(columns[1]);

    render_legend(app.view.legend(), f, side[0]);
    render_symbol_popup(app.selected_symbol(), f, side[1]);
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    f.render_widget(
        Paragraph::new(Span::styled(app.status_message.clone(), style)),
        area,
    );
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("←/→", key),
        Span::raw(" year  "),
        Span::styled("Tab", key),
        Span::raw(" city  "),
        Span::styled("F1", key),
        Span::raw(" help  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
