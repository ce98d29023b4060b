/// Height of one read bar in pixels.
pub const READ_HEIGHT: f64 = 13.0;
/// Vertical pixels between rows.
pub const READ_SPACING: f64 = 2.0;
/// Width of the strand arrow notch in pixels.
pub const READ_STRAND_ARROW_WIDTH: f64 = 6.0;
/// Pixels trimmed from the right end of each bar so neighbours stay apart.
pub const READ_END_GAP: f64 = 5.0;

/// Layout settings for a pileup track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackConfig {
    pub read_height: f64,
    pub read_spacing: f64,
    pub arrow_width: f64,
    pub end_gap: f64,
    /// Prepended to a read's contig name before the reference lookup,
    /// for BAMs that say `17` where the FASTA says `chr17`.
    pub contig_prefix: Option<String>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            read_height: READ_HEIGHT,
            read_spacing: READ_SPACING,
            arrow_width: READ_STRAND_ARROW_WIDTH,
            end_gap: READ_END_GAP,
            contig_prefix: None,
        }
    }
}

impl TrackConfig {
    /// Geometry for a character grid, where one pixel is one terminal cell.
    pub fn terminal() -> Self {
        Self {
            read_height: 1.0,
            read_spacing: 0.0,
            arrow_width: 1.0,
            end_gap: 0.0,
            ..Self::default()
        }
    }

    /// Vertical offset of a pileup row.
    pub fn y_for_row(&self, row: usize) -> f64 {
        row as f64 * (self.read_height + self.read_spacing)
    }

    /// Row drawn at vertical offset `y`, if `y` falls on a bar rather than in the spacing.
    pub fn row_at(&self, y: f64) -> Option<usize> {
        if y < 0.0 {
            return None;
        }
        let pitch = self.read_height + self.read_spacing;
        let row = (y / pitch).floor();
        (y - row * pitch < self.read_height).then_some(row as usize)
    }

    /// Contig name to hand to the reference source.
    pub fn lookup_contig(&self, contig: &str) -> String {
        match &self.contig_prefix {
            Some(prefix) if !contig.starts_with(prefix.as_str()) => format!("{prefix}{contig}"),
            _ => contig.to_string(),
        }
    }
}
