use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

const OUTLINE_COLOR: Color = Color::DarkGray;
const CITY_COLOR: Color = Color::Magenta;
const SHALLOW_COLOR: Color = Color::Yellow;
const INTERMEDIATE_COLOR: Color = Color::Blue;
const DEEP_COLOR: Color = Color::Red;
const THREAT_COLOR: Color = Color::White;

const LEGEND_WIDTH: u16 = 22;
const LEGEND_HEIGHT: u16 = 12;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Earthquakes & Cities ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        &app.store,
        &app.selection,
    );
    let tooltip = layers.tooltip.clone();

    frame.render_widget(MapWidget { layers }, inner);

    if app.map_renderer.settings.show_legend
        && inner.width > LEGEND_WIDTH + 2
        && inner.height > LEGEND_HEIGHT + 1
    {
        let legend_area = Rect::new(inner.x + 1, inner.y + 1, LEGEND_WIDTH, LEGEND_HEIGHT);
        frame.render_widget(Clear, legend_area);
        frame.render_widget(legend(), legend_area);
    }

    if let Some((px, py, lines)) = tooltip {
        if let Some(tooltip_area) = tooltip_rect(inner, px, py, &lines) {
            let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
            frame.render_widget(Clear, tooltip_area);
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::Black).bg(Color::White)),
                tooltip_area,
            );
        }
    }
}

/// Box just above-right of the marker, clamped inside the map
fn tooltip_rect(inner: Rect, px: i32, py: i32, lines: &[String]) -> Option<Rect> {
    if px < 0 || py < 0 || inner.width == 0 || inner.height == 0 {
        return None;
    }
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 1;
    let height = lines.len() as u16;
    let width = width.min(inner.width);
    let height = height.min(inner.height);

    let col = ((px / 2) as u16 + 1).min(inner.width - width);
    let row = ((py / 4) as u16).saturating_sub(height).min(inner.height - height);
    Some(Rect::new(inner.x + col, inner.y + row, width, height))
}

/// Key to marker shapes and colours
fn legend() -> Paragraph<'static> {
    let entry = |symbol: &'static str, color: Color, label: &'static str| {
        Line::from(vec![
            Span::styled(symbol, Style::default().fg(color)),
            Span::raw(" "),
            Span::raw(label),
        ])
    };
    let lines = vec![
        entry("▲", CITY_COLOR, "City Marker"),
        entry("●", Color::White, "Land Quake"),
        entry("■", Color::White, "Ocean Quake"),
        Line::from("Size ~ Magnitude"),
        Line::from(""),
        entry("●", SHALLOW_COLOR, "Shallow"),
        entry("●", INTERMEDIATE_COLOR, "Intermediate"),
        entry("●", DEEP_COLOR, "Deep"),
        entry("✕", THREAT_COLOR, "Past hour"),
        entry("○", THREAT_COLOR, "Threat radius"),
    ];
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Earthquake Key "),
    )
}

/// Widget that stacks the Braille layers back to front
struct MapWidget {
    layers: MapLayers,
}

fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for row in 0..area.height {
        for col in 0..area.width {
            if let Some(ch) = canvas.cell(col as usize, row as usize) {
                buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_layer(&self.layers.outlines, OUTLINE_COLOR, area, buf);
        render_layer(&self.layers.threat, THREAT_COLOR, area, buf);
        render_layer(&self.layers.shallow, SHALLOW_COLOR, area, buf);
        render_layer(&self.layers.intermediate, INTERMEDIATE_COLOR, area, buf);
        render_layer(&self.layers.deep, DEEP_COLOR, area, buf);
        render_layer(&self.layers.cities, CITY_COLOR, area, buf);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool, on_label: &'static str, off_label: &'static str| {
        Span::styled(
            if on { on_label } else { off_label },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", app.zoom_level()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(app.quake_summary(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        toggle(settings.show_outlines, "[O]utline ", "[o]utline "),
        toggle(settings.show_quakes, "[E]quakes ", "[e]quakes "),
        toggle(settings.show_cities, "[C]ities ", "[c]ities "),
        toggle(settings.show_legend, "[?]Key ", "[?]key "),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.selection_label(), Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | hjkl:pan +/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_clamped_inside_map() {
        let inner = Rect::new(1, 1, 40, 20);
        let lines = vec!["Somewhere Far Away".to_string(), "Pop: N/A".to_string()];

        let r = tooltip_rect(inner, 78, 79, &lines).unwrap();
        assert!(r.x + r.width <= inner.x + inner.width);
        assert!(r.y + r.height <= inner.y + inner.height);
        assert_eq!(r.height, 2);

        let r = tooltip_rect(inner, 0, 0, &lines).unwrap();
        assert_eq!(r.y, inner.y);
    }

    #[test]
    fn test_tooltip_offscreen_marker() {
        let inner = Rect::new(0, 0, 40, 20);
        assert!(tooltip_rect(inner, -4, 10, &["x".to_string()]).is_none());
    }

    #[test]
    fn test_map_widget_paints_layers() {
        let mut layers_canvas = BrailleCanvas::new(4, 2);
        layers_canvas.set_pixel(0, 0);
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        render_layer(&layers_canvas, DEEP_COLOR, area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "⠁");
        assert_eq!(buf[(0, 0)].fg, DEEP_COLOR);
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }
}
