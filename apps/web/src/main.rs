use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use heatmap_core::{HeatmapError, SelectionController, StepDirection};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution},
        Block, Borders, Gauge, Paragraph, Wrap,
    },
    Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Request, RequestInit, RequestMode, Response};

mod page;

use page::{build_page, PageState, WebSymbol, WebView};

const DATA_URL: &str = "time_series.geojson";

fn main() -> io::Result<()> {
    let state = Rc::new(RefCell::new(PageState::Loading));

    spawn_local(fetch_dataset(state.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| {
            let mut state = state.borrow_mut();
            let result = match event.code {
                ratzilla::event::KeyCode::Right => state.step(StepDirection::Forward),
                ratzilla::event::KeyCode::Left => state.step(StepDirection::Reverse),
                ratzilla::event::KeyCode::Home => state.slide_to(0),
                ratzilla::event::KeyCode::End => state.slide_to(i64::MAX),
                ratzilla::event::KeyCode::Down => {
                    state.select(true);
                    Ok(())
                }
                ratzilla::event::KeyCode::Up => {
                    state.select(false);
                    Ok(())
                }
                ratzilla::event::KeyCode::Char(digit @ '1'..='9') => {
                    let stop = digit.to_digit(10).map_or(0, |d| i64::from(d) - 1);
                    state.slide_to(stop)
                }
                _ => Ok(()),
            };
            if let Err(error) = result {
                log_interaction_error(&error);
            }
        }
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .title("Summer Heat Map")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        match &*state.borrow() {
            PageState::Ready {
                controller,
                view,
                selected,
                status,
            } => render_page(controller, view, *selected, status, f, inner),
            PageState::Loading => {
                let paragraph =
                    Paragraph::new(Text::from(TextLine::from(format!("Loading {DATA_URL}..."))))
                        .alignment(Alignment::Center);
                f.render_widget(paragraph, inner);
            }
            PageState::Failed(message) => {
                let paragraph = Paragraph::new(Text::from(vec![
                    TextLine::from(Span::styled(
                        format!("Could not load {DATA_URL}"),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    TextLine::from(message.clone()),
                ]))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
                f.render_widget(paragraph, inner);
            }
        }
    });

    Ok(())
}

fn log_interaction_error(error: &HeatmapError) {
    web_sys::console::error_1(&format!("{error}").into());
}

fn render_page(
    controller: &SelectionController,
    view: &WebView,
    selected: usize,
    status: &str,
    f: &mut ratzilla::ratatui::Frame<'_>,
    area: Rect,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(38)])
        .split(rows[0]);

    render_map(view, selected, f, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(4)])
        .split(columns[1]);
    render_legend(view, f, side[0]);
    render_popup(view.symbols.get(selected), f, side[1]);
    render_slider(controller, view, f, rows[1]);
    render_status(status, f, rows[2]);
}

fn render_map(view: &WebView, selected: usize, f: &mut ratzilla::ratatui::Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("Year {}", view.legend_year))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    // Half a braille dot per radius unit.
    let scale = 360.0 / (f64::from(inner.width.max(1)) * 2.0) * 0.5;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            for (index, symbol) in view.symbols.iter().enumerate() {
                if !symbol.visible {
                    continue;
                }
                ctx.draw(&Circle {
                    x: symbol.position.lon,
                    y: symbol.position.lat,
                    radius: symbol.radius * scale,
                    color: if index == selected {
                        Color::Yellow
                    } else {
                        Color::LightRed
                    },
                });
            }
        })
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0]);

    f.render_widget(canvas, area);
}

fn render_legend(view: &WebView, f: &mut ratzilla::ratatui::Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("{} {}", view.legend_heading, view.legend_year))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<TextLine<'_>> = view
        .legend
        .iter()
        .map(|(row, radius, label)| {
            TextLine::from(vec![
                Span::styled(format!("{:<5}", row.as_str()), Style::default().fg(Color::Gray)),
                Span::styled(format!("r={radius:>5.1}  "), Style::default().fg(Color::LightRed)),
                Span::raw(label.clone()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_popup(symbol: Option<&WebSymbol>, f: &mut ratzilla::ratatui::Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(symbol.map_or_else(|| "City".to_string(), |s| s.name.clone()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let text = symbol.map_or_else(String::new, |s| s.popup.clone());
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_slider(
    controller: &SelectionController,
    view: &WebView,
    f: &mut ratzilla::ratatui::Frame<'_>,
    area: Rect,
) {
    let last = controller.len().saturating_sub(1);
    let ratio = if last == 0 {
        1.0
    } else {
        (view.slider as f64 / last as f64).clamp(0.0, 1.0)
    };
    let label = view.labels.get(view.slider).cloned().unwrap_or_default();

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("←/→ year  Home/End  1-9 jump  ↑/↓ city")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .gauge_style(Style::default().fg(Color::LightRed).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, area);
}

fn render_status(status: &str, f: &mut ratzilla::ratatui::Frame<'_>, area: Rect) {
    let style = if status.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    f.render_widget(Paragraph::new(Span::styled(status.to_string(), style)), area);
}

async fn fetch_dataset(store: Rc<RefCell<PageState>>) {
    let page = match fetch_text(DATA_URL).await {
        Ok(text) => build_page(&text),
        Err(message) => PageState::Failed(message),
    };
    if let PageState::Failed(message) = &page {
        web_sys::console::error_1(&format!("Failed to load {DATA_URL}: {message}").into());
    }
    *store.borrow_mut() = page;
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| format!("bad request for {url}"))?;

    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| format!("fetch of {url} failed"))?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "Failed to read response".to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let body = response
        .text()
        .map_err(|_| format!("Failed to read {url} body"))?;
    let text = wasm_bindgen_futures::JsFuture::from(body)
        .await
        .map_err(|_| format!("Failed to read {url} body"))?;

    text.as_string()
        .ok_or_else(|| format!("{url} body is not text"))
}
