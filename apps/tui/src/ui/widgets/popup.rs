use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::view::Symbol;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

/// Popup of the selected symbol, the terminal stand-in for a click popup.
pub fn render_symbol_popup(symbol: Option<&Symbol>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Selected City")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = match symbol {
        Some(symbol) => {
            let mut lines: Vec<Line<'_>> = symbol.popup.lines().map(Line::from).collect();
            if !symbol.visible {
                lines.push(Line::from(Span::styled(
                    "(hidden this year)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Text::from(lines)
        }
        None => Text::from("No cities on the map"),
    };

    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

const HELP_KEYS: [(&str, &str); 8] = [
    ("Right / l", "Next year (wraps)"),
    ("Left / h", "Previous year (wraps)"),
    ("Home / End", "First / last year"),
    ("1-9", "Jump to slider stop"),
    ("Tab / Down", "Select next city"),
    ("BackTab / Up", "Select previous city"),
    ("F1 / ?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

pub fn render_help_popup(f: &mut Frame<'_>) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(HELP_KEYS.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("{key:<14}"), Style::default().fg(Color::Yellow)),
            Span::raw(*action),
        ])
    }));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
