use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::config::TrackConfig;
use crate::region::VisibleRange;
use crate::viewer::elements::{ElementStore, ReadElement};
use crate::viewer::geometry::x_extent;
use crate::viewer::scale::Scale;
use crate::viewer::track::EMPTY_TRACK_MESSAGE;

/// Rows above the reads: ruler, reference, separator.
pub const HEADER_LINES: u16 = 3;

/// Color a base by its nucleotide identity (IGV-style coloring).
pub fn base_color(base: u8) -> Color {
    match base.to_ascii_uppercase() {
        b'A' => Color::Green,
        b'C' => Color::Blue,
        b'G' => Color::Yellow,
        b'T' => Color::Red,
        b'N' => Color::DarkGray,
        _ => Color::White,
    }
}

/// Reference base under each column, when the zoom is high enough to show bases.
pub fn render_reference_line(
    reference: &[u8],
    range: &VisibleRange,
    scale: &Scale,
    width: usize,
) -> Line<'static> {
    if scale.px_per_base() < 1.0 {
        return Line::from(Span::styled(
            "·".repeat(width),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let spans: Vec<Span> = (0..width)
        .map(|col| {
            let pos = scale.invert(col as f64 + 0.5).floor();
            let base = if pos >= range.start as f64 {
                reference.get(pos as usize - range.start as usize).copied()
            } else {
                None
            };
            match base {
                Some(b) => Span::styled(
                    String::from(b as char),
                    Style::default().fg(base_color(b)).add_modifier(Modifier::BOLD),
                ),
                None => Span::raw(" "),
            }
        })
        .collect();
    Line::from(spans)
}

/// Tick spacing in bases that leaves roughly `min_cols` columns between labels.
fn tick_step(px_per_base: f64, min_cols: f64) -> u64 {
    let raw = (min_cols / px_per_base).max(1.0);
    let mut step = 1u64;
    loop {
        for mult in [1, 2, 5] {
            if (step * mult) as f64 >= raw {
                return step * mult;
            }
        }
        step *= 10;
    }
}

/// Coordinate ruler with 1-based labels.
pub fn render_ruler(scale: &Scale, width: usize) -> Line<'static> {
    let step = tick_step(scale.px_per_base(), 12.0);
    let mut ruler = vec!['·'; width];
    let mut col = 0usize;
    while col < width {
        let pos = scale.invert(col as f64 + 0.5).floor();
        let one_based = pos as i64 + 1;
        if pos >= 0.0 && one_based as u64 % step == 0 && scale.x_f(pos) >= col as f64 - 0.5 {
            let label = format!("|{one_based}");
            if col + label.len() <= width {
                for (i, c) in label.chars().enumerate() {
                    ruler[col + i] = c;
                }
                col += label.len();
                continue;
            }
        }
        col += 1;
    }

    Line::from(Span::styled(
        ruler.into_iter().collect::<String>(),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Paint one read element onto a line of the buffer.
fn paint_read(element: &ReadElement, area: Rect, y: u16, buf: &mut Buffer) {
    let Some((lo, hi)) = x_extent(&element.outline) else {
        return;
    };
    let width = area.width as f64;
    let first = lo.floor().max(0.0);
    let last = (hi.ceil() - 1.0).min(width - 1.0);
    if last < first {
        return;
    }
    let (first, last) = (first as u16, last as u16);
    let negative = element.class.ends_with("negative");
    let body = Style::default().bg(if negative {
        Color::Rgb(110, 70, 70)
    } else {
        Color::Rgb(70, 80, 110)
    });

    for col in first..=last {
        buf.set_string(area.x + col, y, " ", body);
    }
    // The tip only shows when the bar end is on screen.
    if negative && lo >= 0.0 {
        buf.set_string(area.x + first, y, "<", body.fg(Color::White));
    } else if !negative && hi <= width {
        buf.set_string(area.x + last, y, ">", body.fg(Color::White));
    }

    for marker in &element.mismatches {
        if marker.x < 0.0 || marker.x >= width {
            continue;
        }
        let col = marker.x.floor() as u16;
        buf.set_string(
            area.x + col,
            y,
            marker.base.to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(base_color(marker.base as u8))
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// A widget that renders the retained pileup elements under a ruler and reference line.
pub struct PileupWidget<'a> {
    pub store: &'a ElementStore,
    pub config: &'a TrackConfig,
    pub range: Option<&'a VisibleRange>,
    pub reference: &'a [u8],
    pub scroll_y: usize,
}

impl Widget for PileupWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.range {
            Some(range) => format!(" {range} "),
            None => " pileup ".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(range) = self.range else {
            Paragraph::new(EMPTY_TRACK_MESSAGE)
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
            return;
        };

        let width = inner.width as usize;
        let scale = Scale::for_range(range, inner.width as f64);
        let bottom = inner.y + inner.height;
        let mut y = inner.y;

        for line in [
            render_ruler(&scale, width),
            render_reference_line(self.reference, range, &scale, width),
            Line::from("─".repeat(width)),
        ] {
            if y >= bottom {
                return;
            }
            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }

        let pitch = self.config.read_height + self.config.read_spacing;
        for element in self.store.iter() {
            let line = (element.y / pitch).round() as usize;
            if line < self.scroll_y {
                continue;
            }
            let screen_y = y as usize + line - self.scroll_y;
            if screen_y >= bottom as usize {
                continue;
            }
            paint_read(element, inner, screen_y as u16, buf);
        }
    }
}

/// Render a status bar with summary information.
pub fn render_status_bar(
    region: &str,
    num_reads: usize,
    num_rows: usize,
    message: Option<&str>,
) -> Paragraph<'static> {
    let label = Style::default().fg(Color::White).bg(Color::DarkGray);
    let mut parts = vec![
        Span::styled(format!(" Region: {region} "), label),
        Span::styled(format!(" Reads: {num_reads} "), label),
        Span::styled(format!(" Rows: {num_rows} "), label),
    ];

    match message {
        Some(message) => parts.push(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Cyan).bg(Color::DarkGray),
        )),
        None => parts.push(Span::styled(
            " [q]uit [←→]pan [+-]zoom [↑↓]rows [click]read info ".to_string(),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )),
    }

    Paragraph::new(Line::from(parts))
}
