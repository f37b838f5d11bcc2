use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Gauge};
use ratatui::Frame;

use crate::view::Slider;

pub fn render_slider(slider: Option<&Slider>, f: &mut Frame<'_>, area: Rect) {
    let Some(slider) = slider else {
        return;
    };

    let first = slider.control.labels.first().map_or("", String::as_str);
    let last = slider.control.labels.last().map_or("", String::as_str);
    let block = Block::default()
        .title(format!("Year  {first} .. {last}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(Color::LightRed)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .ratio(slider.ratio())
        .label(format!(
            "{}  ({}/{})",
            slider.label(),
            slider.value + 1,
            slider.control.labels.len()
        ));

    f.render_widget(gauge, area);
}
