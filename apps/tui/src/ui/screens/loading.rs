use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::popup::centered_rect;

pub fn render_loading(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(60, 50, f.area());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    render_spinner(app.animation_counter, f, layout[0]);

    let text = format!("Loading {}...", app.config.data_path.display());
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        layout[1],
    );
}

/// A sweeping hand over a circle; `phase` is in radians.
fn render_spinner(phase: f64, f: &mut Frame<'_>, area: Rect) {
    let size = area.width.min(area.height * 2);
    if size < 4 {
        return;
    }
    let square = Rect {
        x: area.x + (area.width - size) / 2,
        y: area.y,
        width: size,
        height: area.height,
    };

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let radius = 0.8;
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius,
                    color: Color::DarkGray,
                });
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: phase.cos() * radius,
                    y2: phase.sin() * radius,
                    color: Color::Cyan,
                });
            })
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0]),
        square,
    );
}
