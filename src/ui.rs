use crate::app::App;
use crate::map::ChoroplethFrame;
use crate::risk::{Annotation, RiskTier, BUCKETS};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

/// County stroke colour (#999)
const OUTLINE: Color = Color::Rgb(0x99, 0x99, 0x99);

/// Fill colour for a tier, straight from the bucket table
pub fn tier_color(tier: RiskTier) -> Color {
    let (r, g, b) = tier.bucket().rgb;
    Color::Rgb(r, g, b)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let inner = render_map(frame, app, chunks[0]);
    if app.layer.settings.show_legend {
        render_legend(frame, inner);
    }
    if let (Some(annotation), Some((col, row))) = (app.hovered(), app.mouse_pos) {
        render_tooltip(frame, annotation, col, row, inner);
    }
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Wildfire Risk by County ",
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layer = app.layer.render(inner.width as usize, inner.height as usize, &viewport);
    frame.render_widget(MapWidget { layer }, inner);
    inner
}

/// Cell fills as background, braille outlines on top
struct MapWidget {
    layer: ChoroplethFrame,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = (area.height as usize).min(self.layer.rows);
        let cols = (area.width as usize).min(self.layer.cols);

        for row in 0..rows {
            for col in 0..cols {
                let fill = self.layer.fill(col, row);
                let glyph = self.layer.outlines.glyph(col, row);
                if fill.is_none() && glyph.is_none() {
                    continue;
                }

                let cell = &mut buf[(area.x + col as u16, area.y + row as u16)];
                if let Some(tier) = fill {
                    cell.set_bg(tier_color(tier));
                }
                if let Some(ch) = glyph {
                    cell.set_char(ch).set_fg(OUTLINE);
                }
            }
        }
    }
}

/// Legend text rows, one per bucket
pub fn legend_lines() -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Wildfire Risk",
        Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
    ))];
    for bucket in &BUCKETS {
        lines.push(Line::from(vec![
            Span::styled("  ", Style::default().bg(tier_color(bucket.tier))),
            Span::styled(format!(" {}", bucket.label()), Style::default().fg(Color::Black)),
        ]));
    }
    lines
}

fn render_legend(frame: &mut Frame, map_area: Rect) {
    let lines = legend_lines();
    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    if map_area.width < width + 2 || map_area.height < height + 1 {
        return;
    }

    let area = Rect {
        x: map_area.x + 2,
        y: map_area.y + map_area.height - height - 1,
        width,
        height,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .style(Style::default().bg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Where to place a tooltip of `width` x `height` for the cursor at
/// (col, row): above the cursor, kept inside `bounds`.
pub fn tooltip_area(col: u16, row: u16, width: u16, height: u16, bounds: Rect) -> Option<Rect> {
    if bounds.width < width || bounds.height < height {
        return None;
    }
    let max_x = bounds.x + bounds.width - width;
    let x = col.saturating_sub(width / 2).clamp(bounds.x, max_x);

    // Prefer above the cursor, fall back to below it
    let y = if row >= bounds.y + height + 1 {
        row - height - 1
    } else {
        (row + 1).min(bounds.y + bounds.height - height)
    };
    Some(Rect { x, y, width, height })
}

fn render_tooltip(frame: &mut Frame, annotation: &Annotation, col: u16, row: u16, bounds: Rect) {
    let mut text = annotation.tooltip.lines();
    let lines: Vec<Line> = [
        text.next().map(|s| {
            Line::from(Span::styled(
                s.to_string(),
                Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            ))
        }),
        text.next().map(|s| Line::from(Span::styled(s.to_string(), Style::default().fg(Color::Black)))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let Some(area) = tooltip_area(col, row, width, height, bounds) else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tier_color(annotation.tier)))
        .style(Style::default().bg(Color::White));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.layer.settings;
    let toggle = |on: bool, on_text: &'static str, off_text: &'static str| {
        Span::styled(
            if on { on_text } else { off_text },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let hovered = match app.hovered() {
        Some(a) => Span::styled(
            format!("{} {}% ", a.key, a.risk),
            Style::default().fg(tier_color(a.tier)),
        ),
        None => Span::styled(format!("{} counties ", app.layer.len()), Style::default().fg(Color::DarkGray)),
    };

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        hovered,
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        toggle(settings.show_fill, "[F]ill ", "[f]ill "),
        toggle(settings.show_outlines, "[O]utline ", "[o]utline "),
        toggle(settings.show_legend, "[G]legend ", "[g]legend "),
        Span::styled(
            "| hjkl:pan +/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_mirrors_buckets() {
        let lines = legend_lines();
        assert_eq!(lines.len(), BUCKETS.len() + 1);
        for (line, bucket) in lines[1..].iter().zip(BUCKETS.iter()) {
            assert_eq!(line.spans[0].style.bg, Some(tier_color(bucket.tier)));
            assert!(line.spans[1].content.contains(&bucket.label()));
        }
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(tier_color(RiskTier::Low), Color::Rgb(0xFF, 0xED, 0xA0));
        assert_eq!(tier_color(RiskTier::Extreme), Color::Rgb(0x80, 0x00, 0x26));
    }

    #[test]
    fn test_tooltip_above_cursor() {
        let bounds = Rect::new(1, 1, 80, 30);
        let area = tooltip_area(40, 20, 24, 4, bounds).unwrap();
        assert_eq!(area, Rect::new(28, 15, 24, 4));
    }

    #[test]
    fn test_tooltip_clamped_to_bounds() {
        let bounds = Rect::new(1, 1, 80, 30);
        // Near the top: drops below the cursor
        let area = tooltip_area(2, 2, 24, 4, bounds).unwrap();
        assert_eq!((area.x, area.y), (1, 3));
        // Near the right edge
        let area = tooltip_area(80, 20, 24, 4, bounds).unwrap();
        assert_eq!(area.x + area.width, 81);
        // Too small to fit
        assert!(tooltip_area(5, 5, 24, 4, Rect::new(0, 0, 10, 3)).is_none());
    }
}
