use crate::pileup::interval::Interval;

/// Row occupancy for a pileup: the exclusive stop of the last interval placed
/// in each row.
///
/// Rows are append-only and a row's stop never decreases, so a read that was
/// placed keeps its row for as long as this state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PileupRows {
    stops: Vec<u64>,
}

impl PileupRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `interval` in the first row that is free at its start, opening a
    /// new row if none is. Returns the row index.
    pub fn add(&mut self, interval: Interval) -> usize {
        let stop = interval.occupied_stop();
        for (row, last_stop) in self.stops.iter_mut().enumerate() {
            if *last_stop <= interval.start {
                *last_stop = stop;
                return row;
            }
        }
        self.stops.push(stop);
        self.stops.len() - 1
    }

    /// Number of rows in use.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Last occupied stop of every row, in row order.
    pub fn stops(&self) -> &[u64] {
        &self.stops
    }
}
