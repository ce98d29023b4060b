use std::fmt;

/// Simplified CIGAR operation for internal use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOp {
    /// Alignment match (can be sequence match or mismatch).
    Match(u32),
    /// Insertion to the reference.
    Insertion(u32),
    /// Deletion from the reference.
    Deletion(u32),
    /// Skipped region of the reference (spliced alignments).
    Skip(u32),
    /// Soft clip (bases present in read but not aligned).
    SoftClip(u32),
    /// Hard clip (bases not present in read).
    HardClip(u32),
}

impl CigarOp {
    /// Number of bases this operation consumes on the reference.
    pub fn ref_len(&self) -> u32 {
        match self {
            CigarOp::Match(n) | CigarOp::Deletion(n) | CigarOp::Skip(n) => *n,
            CigarOp::Insertion(_) | CigarOp::SoftClip(_) | CigarOp::HardClip(_) => 0,
        }
    }

    fn symbol(&self) -> (u32, char) {
        match self {
            CigarOp::Match(n) => (*n, 'M'),
            CigarOp::Insertion(n) => (*n, 'I'),
            CigarOp::Deletion(n) => (*n, 'D'),
            CigarOp::Skip(n) => (*n, 'N'),
            CigarOp::SoftClip(n) => (*n, 'S'),
            CigarOp::HardClip(n) => (*n, 'H'),
        }
    }
}

/// Render a CIGAR in its SAM text form, e.g. `5S10M2D3M`.
pub fn cigar_string(cigar: &[CigarOp]) -> String {
    if cigar.is_empty() {
        return "*".to_string();
    }
    cigar
        .iter()
        .map(|op| {
            let (n, c) = op.symbol();
            format!("{n}{c}")
        })
        .collect()
}

/// Direction of the sequenced molecule relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
}

impl Strand {
    /// Parse a SAM-style strand character. Anything but `+` is treated as reverse.
    pub fn from_char(c: char) -> Self {
        if c == '+' {
            Strand::Positive
        } else {
            Strand::Negative
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Positive => '+',
            Strand::Negative => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Positive => write!(f, "positive"),
            Strand::Negative => write!(f, "negative"),
        }
    }
}

/// The read-only view of an alignment record the pileup needs.
///
/// Coordinates are 0-based. Implementations are trusted: the layout does not
/// validate that `reference_length` agrees with `reference_aligned_bases`.
pub trait RawRead {
    /// Stable identity token, used as the cache and element key.
    fn key(&self) -> String;

    /// Reference sequence name the read is aligned to.
    fn contig(&self) -> &str;

    /// 0-based reference coordinate of the alignment start.
    fn pos(&self) -> u64;

    /// Strand character, `+` or `-`.
    fn strand_char(&self) -> char;

    /// Span on the reference, accounting for insertions and deletions.
    fn reference_length(&self) -> u64;

    /// `(reference position, read base)` for every reference-consuming
    /// position that has a read base, in reference order.
    fn reference_aligned_bases(&self) -> Vec<(u64, u8)>;

    /// Human readable description, shown when the read is clicked.
    fn debug_string(&self) -> String;

    fn strand(&self) -> Strand {
        Strand::from_char(self.strand_char())
    }
}

/// A single aligned read extracted from a BAM file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    /// Read name / query name.
    pub name: String,
    /// Chromosome / reference name the read is aligned to.
    pub chrom: String,
    /// 0-based start position on the reference.
    pub pos: u64,
    /// SAM flags, kept so that mates and supplementary records get distinct keys.
    pub flags: u16,
    /// Mapping quality.
    pub mapq: u8,
    /// CIGAR operations describing the alignment.
    pub cigar: Vec<CigarOp>,
    /// Read sequence (ASCII bases).
    pub sequence: Vec<u8>,
    /// Whether this read is on the reverse strand.
    pub is_reverse: bool,
    /// Position of the record within the load it came from. Tells apart
    /// otherwise identical records.
    pub record_index: usize,
}

impl AlignedRead {
    /// Build a forward-strand read with a single match operation, mostly for tests and demos.
    pub fn simple(name: &str, chrom: &str, pos: u64, sequence: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            chrom: chrom.to_string(),
            pos,
            flags: 0,
            mapq: 60,
            cigar: vec![CigarOp::Match(sequence.len() as u32)],
            sequence: sequence.to_vec(),
            is_reverse: false,
            record_index: 0,
        }
    }

    /// Alignment end on the reference (0-based, exclusive).
    pub fn end(&self) -> u64 {
        self.pos + self.reference_length()
    }
}

impl RawRead for AlignedRead {
    fn key(&self) -> String {
        format!(
            "{}/{}/{}:{}#{}",
            self.name, self.flags, self.chrom, self.pos, self.record_index
        )
    }

    fn contig(&self) -> &str {
        &self.chrom
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn strand_char(&self) -> char {
        if self.is_reverse { '-' } else { '+' }
    }

    fn reference_length(&self) -> u64 {
        self.cigar.iter().map(|op| op.ref_len() as u64).sum()
    }

    fn reference_aligned_bases(&self) -> Vec<(u64, u8)> {
        let mut result = Vec::new();
        let mut ref_pos = self.pos;
        let mut read_pos = 0usize;

        for op in &self.cigar {
            match op {
                CigarOp::Match(n) => {
                    for i in 0..*n as usize {
                        if read_pos + i < self.sequence.len() {
                            result.push((ref_pos + i as u64, self.sequence[read_pos + i]));
                        }
                    }
                    ref_pos += *n as u64;
                    read_pos += *n as usize;
                }
                CigarOp::Insertion(n) | CigarOp::SoftClip(n) => {
                    read_pos += *n as usize;
                }
                CigarOp::Deletion(n) | CigarOp::Skip(n) => {
                    ref_pos += *n as u64;
                }
                CigarOp::HardClip(_) => {}
            }
        }
        result
    }

    fn debug_string(&self) -> String {
        format!(
            "{} {}:{}-{} ({}) MAPQ={} CIGAR={} SEQ={}",
            self.name,
            self.chrom,
            self.pos + 1,
            self.end(),
            self.strand_char(),
            self.mapq,
            cigar_string(&self.cigar),
            String::from_utf8_lossy(&self.sequence),
        )
    }
}
