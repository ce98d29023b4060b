use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::alignment::{RawRead, Strand};
use crate::config::TrackConfig;
use crate::pileup::interval::Interval;
use crate::pileup::mismatch::{differing_base_pairs, BasePair};
use crate::pileup::packer::PileupRows;
use crate::reference::ReferenceSource;

/// Everything intrinsic to a read that is needed to draw it, i.e. everything
/// that does not depend on the scale or viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualAlignment<R> {
    pub key: String,
    pub read: R,
    pub strand: Strand,
    /// Pileup row.
    pub row: usize,
    /// Span on the reference, accounting for indels.
    pub ref_length: u64,
    pub mismatches: Vec<BasePair>,
}

impl<R: RawRead> VisualAlignment<R> {
    /// Reference span `[pos, pos + ref_length)`.
    pub fn interval(&self) -> Interval {
        let pos = self.read.pos();
        Interval::new(pos, pos + self.ref_length)
    }
}

/// Element class used by the drawing backends.
pub fn read_class(strand: Strand) -> &'static str {
    match strand {
        Strand::Positive => "alignment positive",
        Strand::Negative => "alignment negative",
    }
}

/// Cache of enriched reads plus the row state they were packed into.
///
/// A read is enriched once per distinct key; later calls hand back the same
/// record. Entries are never evicted, the whole session is dropped or
/// [`reset`](Self::reset) instead when the read source changes.
pub struct LayoutSession<R> {
    config: TrackConfig,
    rows: PileupRows,
    cache: HashMap<String, Arc<VisualAlignment<R>>>,
}

/// A session shared between threads. The lock covers a whole enrichment so
/// row assignment never interleaves.
pub type SharedLayoutSession<R> = Arc<Mutex<LayoutSession<R>>>;

impl<R: RawRead + Clone> LayoutSession<R> {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            config,
            rows: PileupRows::new(),
            cache: HashMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedLayoutSession<R> {
        Arc::new(Mutex::new(self))
    }

    /// Enrich `read`, or return the record built the first time its key was seen.
    pub fn add_read<S: ReferenceSource + ?Sized>(
        &mut self,
        read: &R,
        reference: &S,
    ) -> Arc<VisualAlignment<R>> {
        let key = read.key();
        if let Some(existing) = self.cache.get(&key) {
            return Arc::clone(existing);
        }

        let ref_length = read.reference_length();
        let pos = read.pos();
        let (start, stop) = reference.convention().bounds(pos, pos + ref_length);
        let contig = self.config.lookup_contig(read.contig());

        let mismatches = match reference.range_as_string(&contig, start, stop) {
            Ok(bases) => {
                if (bases.len() as u64) < ref_length {
                    debug!(
                        "reference for {key} is short: {} of {ref_length} bases",
                        bases.len()
                    );
                }
                differing_base_pairs(read, &bases)
            }
            Err(e) => {
                warn!("reference lookup failed for {key} at {contig}:{start}-{stop}: {e:#}");
                Vec::new()
            }
        };

        let row = self.rows.add(Interval::new(pos, pos + ref_length));
        debug!(
            "placed {key} at row {row} with {} mismatches",
            mismatches.len()
        );

        let visual = Arc::new(VisualAlignment {
            key: key.clone(),
            read: read.clone(),
            strand: read.strand(),
            row,
            ref_length,
            mismatches,
        });
        self.cache.insert(key, Arc::clone(&visual));
        visual
    }

    /// Enrich every read in order. Order decides row assignment for new reads.
    pub fn add_reads<S: ReferenceSource + ?Sized>(
        &mut self,
        reads: &[R],
        reference: &S,
    ) -> Vec<Arc<VisualAlignment<R>>> {
        reads.iter().map(|r| self.add_read(r, reference)).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<VisualAlignment<R>>> {
        self.cache.get(key)
    }

    /// Number of distinct reads enriched so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of pileup rows in use.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Forget every enriched read and every row.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.rows = PileupRows::new();
    }
}
