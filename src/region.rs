use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionError {
    #[error("invalid region format: expected 'chr:start-end', got '{0}'")]
    InvalidFormat(String),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] std::num::ParseIntError),
    #[error("start ({start}) must be less than end ({end})")]
    InvalidRange { start: u64, end: u64 },
    #[error("region coordinates are 1-based, got start 0")]
    ZeroStart,
}

/// A genomic region specified as chromosome:start-end (1-based, inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self, RegionError> {
        if start > end {
            return Err(RegionError::InvalidRange { start, end });
        }
        if start == 0 {
            return Err(RegionError::ZeroStart);
        }
        Ok(Self {
            chrom: chrom.into(),
            start,
            end,
        })
    }

    /// Length of the region in bases.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chrom, rest) = s
            .split_once(':')
            .ok_or_else(|| RegionError::InvalidFormat(s.to_string()))?;
        let (start_str, end_str) = rest
            .split_once('-')
            .ok_or_else(|| RegionError::InvalidFormat(s.to_string()))?;
        let start: u64 = start_str.replace(',', "").parse()?;
        let end: u64 = end_str.replace(',', "").parse()?;
        Region::new(chrom, start, end)
    }
}

/// The window of the reference currently on screen.
///
/// Coordinates are 0-based and `stop` is inclusive, so the window covers
/// `stop - start + 1` bases. `offset_px` is the horizontal pan in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    pub contig: String,
    pub start: u64,
    pub stop: u64,
    pub offset_px: i64,
}

impl VisibleRange {
    pub fn new(contig: impl Into<String>, start: u64, stop: u64) -> Self {
        Self {
            contig: contig.into(),
            start,
            stop: stop.max(start),
            offset_px: 0,
        }
    }

    /// Number of bases in the window. Never zero, `stop` is inclusive.
    pub fn bases(&self) -> u64 {
        self.stop - self.start + 1
    }

    /// Shift the window by `delta` bases, clamping at the start of the contig.
    pub fn pan(&self, delta: i64) -> Self {
        let len = self.bases();
        let start = if delta < 0 {
            self.start.saturating_sub(delta.unsigned_abs())
        } else {
            self.start + delta as u64
        };
        Self {
            contig: self.contig.clone(),
            start,
            stop: start + len - 1,
            offset_px: self.offset_px,
        }
    }

    /// Resize the window around its center. `factor < 1` zooms in.
    pub fn zoom(&self, factor: f64) -> Self {
        let len = self.bases() as f64;
        let new_len = ((len * factor).round() as u64).max(1);
        let center = self.start + self.bases() / 2;
        let start = center.saturating_sub(new_len / 2);
        Self {
            contig: self.contig.clone(),
            start,
            stop: start + new_len - 1,
            offset_px: self.offset_px,
        }
    }
}

impl From<&Region> for VisibleRange {
    fn from(region: &Region) -> Self {
        VisibleRange::new(region.chrom.clone(), region.start - 1, region.end - 1)
    }
}

impl fmt::Display for VisibleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start + 1, self.stop + 1)
    }
}
