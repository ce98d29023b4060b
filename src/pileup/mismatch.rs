use crate::alignment::RawRead;

/// A reference position where the read disagrees with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasePair {
    /// 0-based reference coordinate.
    pub pos: u64,
    /// The read's base at `pos`.
    pub base: char,
}

/// Compare a read against the reference covering its span.
///
/// `reference[0]` must correspond to `read.pos()`. Inserted read bases and
/// deleted reference bases are never compared. The comparison ignores case,
/// and positions past the end of a short `reference` are skipped rather than
/// reported.
pub fn differing_base_pairs<R: RawRead + ?Sized>(read: &R, reference: &str) -> Vec<BasePair> {
    let reference = reference.as_bytes();
    let start = read.pos();

    read.reference_aligned_bases()
        .into_iter()
        .filter_map(|(pos, base)| {
            let idx = usize::try_from(pos.checked_sub(start)?).ok()?;
            let ref_base = *reference.get(idx)?;
            (!base.eq_ignore_ascii_case(&ref_base)).then(|| BasePair {
                pos,
                base: base as char,
            })
        })
        .collect()
}
