use std::io;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{debug, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Terminal;

use crate::alignment::{AlignedRead, RawRead};
use crate::config::TrackConfig;
use crate::reference::{ReferenceGenome, ReferenceSource};
use crate::region::VisibleRange;
use crate::viewer::elements::ElementStore;
use crate::viewer::render::{render_status_bar, PileupWidget, HEADER_LINES};
use crate::viewer::track::{PileupTrack, Size};

/// Widest window, in bases, that is still drawn read by read.
pub const DEFAULT_MAX_VISIBLE_BASES: u64 = 50_000;

/// Application state for the TUI viewer.
pub struct App {
    /// Current window on the reference.
    pub range: VisibleRange,
    /// Every read loaded for the session, in file order.
    pub reads: Vec<AlignedRead>,
    pub reference: ReferenceGenome,
    pub track: PileupTrack<AlignedRead>,
    pub store: ElementStore,
    /// Reference bases of the current window, for the reference line.
    pub window_bases: Vec<u8>,
    /// Vertical scroll offset, in pileup rows.
    pub scroll_y: usize,
    /// Debug description of the last clicked read.
    pub message: Option<String>,
    pub max_visible_bases: u64,
    /// Inner area of the pileup block at the last draw.
    pileup_area: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        source_id: &str,
        range: VisibleRange,
        reads: Vec<AlignedRead>,
        reference: ReferenceGenome,
        config: TrackConfig,
    ) -> Self {
        let mut track = PileupTrack::new(config);
        let mut store = ElementStore::new();
        track.set_source(source_id, &mut store);

        Self {
            range,
            reads,
            reference,
            track,
            store,
            window_bases: Vec::new(),
            scroll_y: 0,
            message: None,
            max_visible_bases: DEFAULT_MAX_VISIBLE_BASES,
            pileup_area: Rect::default(),
            should_quit: false,
        }
    }

    /// The range to lay out, or `None` when zoomed out too far to draw reads.
    pub fn visible_range(&self) -> Option<&VisibleRange> {
        (self.range.bases() <= self.max_visible_bases).then_some(&self.range)
    }

    /// Loaded reads overlapping the current window, in file order.
    pub fn reads_in_view(&self) -> Vec<AlignedRead> {
        self.reads
            .iter()
            .filter(|r| {
                r.chrom == self.range.contig
                    && r.pos <= self.range.stop
                    && r.pos + r.reference_length().max(1) > self.range.start
            })
            .cloned()
            .collect()
    }

    /// Run a layout cycle for a drawing area of `width` x `height` cells.
    pub fn refresh(&mut self, width: u16, height: u16) {
        let reads = self.reads_in_view();
        let range = self.visible_range().cloned();
        let size = Size::new(width as u32, height as u32);
        if let Some(plan) = self.track.update(
            &reads,
            range.as_ref(),
            size,
            &self.reference,
            &mut self.store,
        ) {
            debug!(
                "redrew {}: {} new, {} moved, {} removed",
                self.range,
                plan.enter.len(),
                plan.update.len(),
                plan.exit.len()
            );
            self.window_bases = self.fetch_window_bases();
        }
    }

    fn fetch_window_bases(&self) -> Vec<u8> {
        let config = self.track.config();
        let contig = config.lookup_contig(&self.range.contig);
        let (start, stop) = self
            .reference
            .convention()
            .bounds(self.range.start, self.range.stop + 1);
        match self.reference.range_as_string(&contig, start, stop) {
            Ok(bases) => bases.into_bytes(),
            Err(e) => {
                warn!("no reference for {}: {e:#}", self.range);
                Vec::new()
            }
        }
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, code: KeyCode) {
        let step = (self.range.bases() / 10).max(1) as i64;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left => self.range = self.range.pan(-step),
            KeyCode::Right => self.range = self.range.pan(step),
            KeyCode::Char('+') | KeyCode::Char('=') => self.range = self.range.zoom(0.5),
            KeyCode::Char('-') => self.range = self.range.zoom(2.0),
            KeyCode::Up => self.scroll_y = self.scroll_y.saturating_sub(1),
            KeyCode::Down => {
                let max = self.track.session().row_count().saturating_sub(1);
                self.scroll_y = (self.scroll_y + 1).min(max);
            }
            _ => {}
        }
        self.message = None;
    }

    /// Handle a left click at terminal cell `(column, row)`.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        let area = self.pileup_area;
        let reads_top = area.y + HEADER_LINES;
        if column < area.x || column >= area.x + area.width || row < reads_top {
            return;
        }
        let config = self.track.config();
        let pitch = config.read_height + config.read_spacing;
        let x = (column - area.x) as f64 + 0.5;
        let y = ((row - reads_top) as usize + self.scroll_y) as f64 * pitch;
        self.message = self.track.element_at(x, y);
    }

    /// Run the TUI event loop.
    pub fn run_tui(&mut self) -> Result<()> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        io::stdout().execute(EnableMouseCapture)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        io::stdout().execute(DisableMouseCapture)?;
        disable_raw_mode()?;
        io::stdout().execute(LeaveAlternateScreen)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            let area = terminal.size()?;
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(1)])
                .split(Rect::new(0, 0, area.width, area.height));
            self.pileup_area = Rect {
                x: chunks[0].x + 1,
                y: chunks[0].y + 1,
                width: chunks[0].width.saturating_sub(2),
                height: chunks[0].height.saturating_sub(2),
            };
            self.refresh(
                self.pileup_area.width,
                self.pileup_area.height.saturating_sub(HEADER_LINES),
            );

            terminal.draw(|frame| {
                let status = render_status_bar(
                    &self.range.to_string(),
                    self.track.displayed().len(),
                    self.track.session().row_count(),
                    self.message.as_deref(),
                );
                frame.render_widget(status, chunks[1]);

                let pileup = PileupWidget {
                    store: &self.store,
                    config: self.track.config(),
                    range: self.visible_range(),
                    reference: &self.window_bases,
                    scroll_y: self.scroll_y,
                };
                frame.render_widget(pileup, chunks[0]);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                        self.handle_click(mouse.column, mouse.row)
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
