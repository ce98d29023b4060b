use crate::region::VisibleRange;

/// Linear map from reference coordinates to horizontal pixels.
///
/// The domain is `[start, stop + 1)` so that one base is one unit wide, and
/// the range is `[-offset_px, width - offset_px)`. Build a new one whenever
/// the visible range, the width or the pan offset changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    start: f64,
    px_per_base: f64,
    offset_px: f64,
}

impl Scale {
    pub fn new(start: u64, stop: u64, width: f64, offset_px: f64) -> Self {
        let bases = (stop.max(start) + 1 - start) as f64;
        Self {
            start: start as f64,
            px_per_base: width / bases,
            offset_px,
        }
    }

    pub fn for_range(range: &VisibleRange, width: f64) -> Self {
        Self::new(range.start, range.stop, width, range.offset_px as f64)
    }

    /// Pixel offset of reference coordinate `pos`.
    pub fn x(&self, pos: u64) -> f64 {
        self.x_f(pos as f64)
    }

    pub fn x_f(&self, pos: f64) -> f64 {
        (pos - self.start) * self.px_per_base - self.offset_px
    }

    /// Reference coordinate under pixel `x`, possibly fractional or negative.
    pub fn invert(&self, x: f64) -> f64 {
        (x + self.offset_px) / self.px_per_base + self.start
    }

    pub fn px_per_base(&self) -> f64 {
        self.px_per_base
    }
}
