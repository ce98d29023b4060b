use std::sync::Arc;

use log::{debug, info};

use crate::alignment::RawRead;
use crate::config::TrackConfig;
use crate::pileup::{LayoutSession, VisualAlignment};
use crate::reference::ReferenceSource;
use crate::region::VisibleRange;
use crate::viewer::reconcile::{ReconcilePlan, Reconciler, RenderBackend};
use crate::viewer::scale::Scale;

/// Placeholder shown instead of the pileup when no range is loaded.
pub const EMPTY_TRACK_MESSAGE: &str = "Zoom in to see alignments";

/// Measured size of the drawing area, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Inputs of the last cycle that ran, compared by value.
struct CycleInputs<R> {
    reads: Vec<R>,
    range: VisibleRange,
    size: Size,
}

/// The hosting view: owns the layout session and the reconciler, and decides
/// when a reconciliation cycle is worth running.
pub struct PileupTrack<R> {
    config: TrackConfig,
    session: LayoutSession<R>,
    reconciler: Reconciler,
    last: Option<CycleInputs<R>>,
    displayed: Vec<Arc<VisualAlignment<R>>>,
    source_id: Option<String>,
}

impl<R: RawRead + Clone + PartialEq> PileupTrack<R> {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            session: LayoutSession::new(config.clone()),
            reconciler: Reconciler::new(config.clone()),
            config,
            last: None,
            displayed: Vec::new(),
            source_id: None,
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn session(&self) -> &LayoutSession<R> {
        &self.session
    }

    /// Reads drawn by the last cycle, in read-list order.
    pub fn displayed(&self) -> &[Arc<VisualAlignment<R>>] {
        &self.displayed
    }

    /// Declare the identity of the read source. A different identity drops the
    /// layout session and removes every element from `backend`.
    pub fn set_source<B: RenderBackend + ?Sized>(&mut self, id: &str, backend: &mut B) {
        if self.source_id.as_deref() == Some(id) {
            return;
        }
        if self.source_id.is_some() {
            info!("read source changed to {id}, resetting pileup layout");
        }
        self.source_id = Some(id.to_string());
        self.session.reset();
        self.reconciler.clear().apply(backend);
        self.displayed.clear();
        self.last = None;
    }

    /// Run one enrichment and reconciliation cycle if anything it depends on
    /// changed since the last one.
    ///
    /// Returns the applied plan, or `None` when the cycle was skipped: no
    /// range, a zero-width container, or inputs equal to the previous cycle.
    pub fn update<S, B>(
        &mut self,
        reads: &[R],
        range: Option<&VisibleRange>,
        size: Size,
        reference: &S,
        backend: &mut B,
    ) -> Option<ReconcilePlan>
    where
        S: ReferenceSource + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let range = range?;
        // Hold off until the container has been measured.
        if size.width == 0 {
            return None;
        }
        if let Some(last) = &self.last
            && last.size == size
            && last.range == *range
            && last.reads.as_slice() == reads
        {
            return None;
        }

        let visuals = self.session.add_reads(reads, reference);
        let scale = Scale::for_range(range, size.width as f64);
        let plan = self.reconciler.reconcile(&visuals, &scale);
        plan.apply(backend);
        debug!(
            "cycle over {} with {} reads, {} rows",
            range,
            reads.len(),
            self.session.row_count()
        );

        self.displayed = visuals;
        self.last = Some(CycleInputs {
            reads: reads.to_vec(),
            range: range.clone(),
            size,
        });
        Some(plan)
    }

    /// Height in pixels needed to show every row of the session.
    pub fn content_height(&self) -> f64 {
        self.config.y_for_row(self.session.row_count())
    }

    /// Debug description of the read drawn at pixel `(x, y)` in the last cycle.
    pub fn element_at(&self, x: f64, y: f64) -> Option<String> {
        let last = self.last.as_ref()?;
        let row = self.config.row_at(y)?;
        let scale = Scale::for_range(&last.range, last.size.width as f64);
        let pos = scale.invert(x);
        self.displayed
            .iter()
            .find(|v| {
                let start = v.read.pos() as f64;
                let end = (v.read.pos() + v.ref_length.max(1)) as f64;
                v.row == row && pos >= start && pos < end
            })
            .map(|v| v.read.debug_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    use crate::alignment::AlignedRead;
    use crate::viewer::elements::ElementStore;

    struct Flat;

    impl ReferenceSource for Flat {
        fn range_as_string(&self, _: &str, start: u64, stop: u64) -> Result<String> {
            Ok("A".repeat((stop + 1).saturating_sub(start) as usize))
        }
    }

    fn reads() -> Vec<AlignedRead> {
        vec![
            AlignedRead::simple("a", "chr1", 10, &[b'A'; 10]),
            AlignedRead::simple("b", "chr1", 15, b"AAAATAAAAA"),
        ]
    }

    #[test]
    fn test_no_range_does_no_work() {
        let mut track = PileupTrack::new(TrackConfig::default());
        let mut store = ElementStore::new();
        let plan = track.update(&reads(), None, Size::new(100, 50), &Flat, &mut store);
        assert!(plan.is_none());
        assert!(track.session().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_width_waits_for_measurement() {
        let mut track = PileupTrack::new(TrackConfig::default());
        let mut store = ElementStore::new();
        let range = VisibleRange::new("chr1", 0, 99);
        assert!(track.update(&reads(), Some(&range), Size::new(0, 0), &Flat, &mut store).is_none());
        assert!(track.update(&reads(), Some(&range), Size::new(100, 50), &Flat, &mut store).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unchanged_inputs_skip_cycle() {
        let mut track = PileupTrack::new(TrackConfig::default());
        let mut store = ElementStore::new();
        let range = VisibleRange::new("chr1", 0, 99);
        let size = Size::new(100, 50);

        assert!(track.update(&reads(), Some(&range), size, &Flat, &mut store).is_some());
        // A fresh but equal read list and range is still "unchanged".
        assert!(track.update(&reads(), Some(&range.clone()), size, &Flat, &mut store).is_none());
        assert!(track.update(&reads(), Some(&range), Size::new(120, 50), &Flat, &mut store).is_some());
    }

    #[test]
    fn test_mismatch_and_rows_reach_backend() {
        let mut track = PileupTrack::new(TrackConfig::default());
        let mut store = ElementStore::new();
        let range = VisibleRange::new("chr1", 0, 99);
        track.update(&reads(), Some(&range), Size::new(100, 50), &Flat, &mut store);

        let b = store.get(&reads()[1].key()).unwrap();
        assert_eq!(b.row, 1);
        assert_eq!(b.y, 15.0);
        assert_eq!(b.mismatches.len(), 1);
        assert_eq!(b.mismatches[0].pos, 19);
        assert_eq!(track.content_height(), 30.0);
    }

    #[test]
    fn test_source_change_resets_everything() {
        let mut track = PileupTrack::new(TrackConfig::default());
        let mut store = ElementStore::new();
        let range = VisibleRange::new("chr1", 0, 99);
        let size = Size::new(100, 50);

        track.set_source("first.bam", &mut store);
        track.update(&reads(), Some(&range), size, &Flat, &mut store);
        assert_eq!(store.len(), 2);

        track.set_source("first.bam", &mut store);
        assert_eq!(store.len(), 2);

        track.set_source("second.bam", &mut store);
        assert!(store.is_empty());
        assert!(track.session().is_empty());

        let only_b = vec![reads()[1].clone()];
        track.update(&only_b, Some(&range), size, &Flat, &mut store);
        assert_eq!(store.get(&only_b[0].key()).unwrap().row, 0);
    }

    #[test]
    fn test_element_at() {
        let mut track = PileupTrack::new(TrackConfig::default());
        let mut store = ElementStore::new();
        let range = VisibleRange::new("chr1", 0, 99);
        track.update(&reads(), Some(&range), Size::new(100, 50), &Flat, &mut store);

        let hit = track.element_at(12.0, 3.0).unwrap();
        assert!(hit.starts_with("a "));
        let hit = track.element_at(22.0, 16.0).unwrap();
        assert!(hit.starts_with("b "));
        assert!(track.element_at(22.0, 14.0).is_none());
        assert!(track.element_at(50.0, 3.0).is_none());
    }
}
