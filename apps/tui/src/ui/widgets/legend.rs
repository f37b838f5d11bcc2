//! Proportional legend: three nested reference circles (max, mean, min)
//! drawn with the same radii as the map symbols.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use heatmap_core::LegendRow;

use crate::view::Legend;

const CIRCLE_COLUMNS: u16 = 16;

pub fn render_legend(legend: Option<&Legend>, f: &mut Frame<'_>, area: Rect) {
    let Some(legend) = legend else {
        return;
    };

    let block = Block::default()
        .title(legend.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CIRCLE_COLUMNS), Constraint::Min(6)])
        .split(inner);

    let width = legend.layout.width;
    let height = legend.layout.height;
    // Circles share a centre column; a radius is never allowed past the box.
    let centre_x = width / 4.0;
    f.render_widget(
        Canvas::default()
            .marker(Marker::Braille)
            .paint(|ctx| {
                for circle in &legend.circles {
                    ctx.draw(&Circle {
                        x: centre_x,
                        y: height - circle.cy,
                        radius: circle.radius.min(centre_x),
                        color: Color::LightRed,
                    });
                }
            })
            .x_bounds([0.0, width / 2.0])
            .y_bounds([0.0, height]),
        columns[0],
    );

    f.render_widget(Paragraph::new(label_lines(legend, columns[1].height)), columns[1]);
}

/// One line per row of the legend, each placed at its circle's height.
fn label_lines(legend: &Legend, rows: u16) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""); usize::from(rows)];
    if rows == 0 {
        return lines;
    }
    for circle in LegendRow::ALL.iter().filter_map(|row| legend.circle(*row)) {
        let fraction = (circle.cy / legend.layout.height).clamp(0.0, 1.0);
        let row = ((fraction * f64::from(rows - 1)).round() as usize).min(lines.len() - 1);
        lines[row] = Line::from(format!("{} {}", circle.row.as_str(), circle.label));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::LegendCircle;
    use heatmap_core::LegendLayout;

    #[test]
    fn labels_follow_circle_heights() {
        let legend = Legend {
            layout: LegendLayout::new("Average August temperature in", "2018"),
            year: "2018".to_string(),
            circles: LegendRow::ALL
                .iter()
                .map(|row| LegendCircle {
                    row: *row,
                    radius: 6.0,
                    cy: row.cy(),
                    label: format!("{}° F", row.cy()),
                })
                .collect(),
        };

        let lines = label_lines(&legend, 15);
        let text: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert!(text[3].contains("30° F"));
        assert!(text[7].contains("70° F"));
        assert!(text[11].contains("110° F"));
    }
}
