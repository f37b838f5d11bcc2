//! World map canvas with one proportional circle per visible city.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Map, MapResolution};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::view::{MapView, Symbol};

/// Braille dots per radius unit. Symbol radii are screen units; the canvas
/// works in degrees, so the conversion depends on the area's width.
const DOTS_PER_UNIT: f64 = 0.5;

pub fn degrees_per_unit(area: Rect) -> f64 {
    let dots = f64::from(area.width.max(1)) * 2.0;
    360.0 / dots * DOTS_PER_UNIT
}

pub fn render_map(view: &MapView, selected: Option<&Symbol>, title: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let scale = degrees_per_unit(block.inner(area));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            for symbol in view.visible_symbols() {
                let is_selected = selected.is_some_and(|s| s.id == symbol.id);
                ctx.draw(&Circle {
                    x: symbol.position.lon,
                    y: symbol.position.lat,
                    radius: symbol.radius * scale,
                    color: if is_selected { Color::Yellow } else { Color::LightRed },
                });
            }

            if let Some(symbol) = selected.filter(|s| s.visible) {
                ctx.print(symbol.position.lon, symbol.position.lat, symbol.name.clone());
            }
        })
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0]);

    f.render_widget(canvas, area);
}
