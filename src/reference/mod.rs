pub mod fasta;

pub use fasta::ReferenceGenome;

use anyhow::Result;

/// Anything that can hand out a slice of reference sequence.
///
/// Each source declares how it reads `start` and `stop`; callers translate
/// read spans through [`convention`](Self::convention) rather than guessing.
pub trait ReferenceSource {
    fn range_as_string(&self, contig: &str, start: u64, stop: u64) -> Result<String>;

    /// Coordinate convention of `range_as_string`. 1-based inclusive unless overridden.
    fn convention(&self) -> LookupConvention {
        LookupConvention::default()
    }
}

impl<T: ReferenceSource + ?Sized> ReferenceSource for &T {
    fn range_as_string(&self, contig: &str, start: u64, stop: u64) -> Result<String> {
        (**self).range_as_string(contig, start, stop)
    }

    fn convention(&self) -> LookupConvention {
        (**self).convention()
    }
}

/// How a 0-based half-open read span is translated into lookup coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupConvention {
    /// `[pos, end)` becomes `start = pos + 1, stop = end`.
    #[default]
    OneBasedInclusive,
    /// `[pos, end)` is passed through unchanged.
    ZeroBasedHalfOpen,
}

impl LookupConvention {
    /// Lookup bounds for the 0-based half-open span `[start, end)`.
    pub fn bounds(&self, start: u64, end: u64) -> (u64, u64) {
        match self {
            LookupConvention::OneBasedInclusive => (start + 1, end),
            LookupConvention::ZeroBasedHalfOpen => (start, end),
        }
    }
}
