use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::alignment::read::{AlignedRead, CigarOp};
use crate::region::Region;

/// Reader for BAM alignment files.
pub struct AlignmentReader;

impl AlignmentReader {
    /// Read alignments from a BAM file overlapping `region`, in file order.
    ///
    /// The BAM file must be sorted and indexed (.bai). File order matters: it
    /// is the order in which the pileup assigns rows. Each read carries its
    /// index in the returned list, so duplicate records keep distinct keys.
    pub fn read_bam(path: &Path, region: &Region) -> Result<Vec<AlignedRead>> {
        let mut reader = noodles::bam::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .with_context(|| format!("failed to open BAM file: {}", path.display()))?;

        let header = reader.read_header().context("failed to read BAM header")?;

        let region_str = region.to_string();
        let query_region: noodles::core::Region = region_str
            .parse()
            .with_context(|| format!("failed to parse region: {region_str}"))?;

        let mut reads = Vec::new();
        let mut skipped = 0usize;
        let query = reader
            .query(&header, &query_region)
            .context("failed to query BAM region")?;

        for result in query {
            let record = result.context("failed to read BAM record")?;

            if record.flags().is_unmapped() {
                skipped += 1;
                continue;
            }

            match Self::convert_bam_record(&record, &header)? {
                Some(mut read) => {
                    read.record_index = reads.len();
                    reads.push(read);
                }
                None => skipped += 1,
            }
        }

        info!("loaded {} reads from {} in {}", reads.len(), path.display(), region);
        debug!("skipped {skipped} unmapped or unplaced records");
        Ok(reads)
    }

    /// Convert a noodles BAM record to our AlignedRead type.
    fn convert_bam_record(
        record: &noodles::bam::Record,
        header: &noodles::sam::Header,
    ) -> Result<Option<AlignedRead>> {
        let name = record
            .name()
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        let flags = record.flags();

        let ref_seq_id = match record.reference_sequence_id() {
            Some(Ok(id)) => id,
            Some(Err(e)) => return Err(e).context("failed to read reference sequence ID"),
            None => return Ok(None),
        };

        let chrom = header
            .reference_sequences()
            .get_index(ref_seq_id)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        // noodles positions are 1-based.
        let pos = match record.alignment_start() {
            Some(Ok(p)) => p.get() as u64 - 1,
            Some(Err(e)) => return Err(e).context("failed to read alignment start"),
            None => return Ok(None),
        };

        let mapq = record.mapping_quality().map(|q| q.get()).unwrap_or(0);
        let cigar = Self::convert_cigar(record)?;

        let sequence: Vec<u8> = (0..record.sequence().len())
            .filter_map(|i| record.sequence().get(i))
            .collect();

        Ok(Some(AlignedRead {
            name,
            chrom,
            pos,
            flags: u16::from(flags),
            mapq,
            cigar,
            sequence,
            is_reverse: flags.is_reverse_complemented(),
            record_index: 0,
        }))
    }

    /// Convert noodles CIGAR to our simplified CIGAR representation.
    fn convert_cigar(record: &noodles::bam::Record) -> Result<Vec<CigarOp>> {
        use noodles::sam::alignment::record::cigar::op::Kind;

        let mut ops = Vec::new();
        for result in record.cigar().iter() {
            let op = result.context("failed to read CIGAR operation")?;
            let len = op.len() as u32;
            let converted = match op.kind() {
                Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => CigarOp::Match(len),
                Kind::Insertion => CigarOp::Insertion(len),
                Kind::Deletion => CigarOp::Deletion(len),
                Kind::Skip => CigarOp::Skip(len),
                Kind::SoftClip => CigarOp::SoftClip(len),
                Kind::HardClip => CigarOp::HardClip(len),
                Kind::Pad => continue,
            };
            ops.push(converted);
        }
        Ok(ops)
    }
}
