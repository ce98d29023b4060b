use std::fmt;

/// A half-open range `[start, stop)` on the reference axis.
///
/// A zero-length interval still occupies its start coordinate, so it
/// overlaps anything covering that base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: u64,
    pub stop: u64,
}

impl Interval {
    pub fn new(start: u64, stop: u64) -> Self {
        debug_assert!(start <= stop, "interval start {start} > stop {stop}");
        Self {
            start,
            stop: stop.max(start),
        }
    }

    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Exclusive end of the coordinates this interval occupies.
    pub fn occupied_stop(&self) -> u64 {
        self.stop.max(self.start + 1)
    }

    /// True iff the two intervals share at least one coordinate.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.occupied_stop() && other.start < self.occupied_stop()
    }

    /// True iff `point` lies inside the interval.
    pub fn intersects(&self, point: u64) -> bool {
        self.start <= point && point < self.occupied_stop()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}
