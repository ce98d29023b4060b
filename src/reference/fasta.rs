use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::reference::{LookupConvention, ReferenceSource};
use crate::region::Region;

/// Metadata for a FASTA entry whose name encodes a genomic region (e.g. `chr17:100-200`).
#[derive(Debug, Clone)]
struct FragmentInfo {
    /// The base chromosome name (e.g. `chr17`).
    chrom: String,
    /// 1-based start position on the chromosome.
    start: u64,
    /// 1-based end position on the chromosome (inclusive).
    end: u64,
    /// Key into `sequences` for the actual data.
    seq_key: String,
}

/// A reference genome held in memory.
///
/// Supports fragment FASTA files where sequence names encode genomic regions
/// (e.g. `>chr17:10953130-11022414`). When fetching by chromosome name with
/// genomic coordinates, matching fragments are used automatically.
pub struct ReferenceGenome {
    sequences: HashMap<String, Vec<u8>>,
    fragments: Vec<FragmentInfo>,
}

impl ReferenceGenome {
    fn parse_fragment_name(name: &str) -> Option<(String, u64, u64)> {
        let region: Region = name.parse().ok()?;
        Some((region.chrom, region.start, region.end))
    }

    fn build_fragments(sequences: &HashMap<String, Vec<u8>>) -> Vec<FragmentInfo> {
        sequences
            .keys()
            .filter_map(|key| {
                Self::parse_fragment_name(key).map(|(chrom, start, end)| FragmentInfo {
                    chrom,
                    start,
                    end,
                    seq_key: key.clone(),
                })
            })
            .collect()
    }

    /// Load all sequences from a FASTA file into memory.
    pub fn from_file(path: &Path) -> Result<Self> {
        use noodles::fasta;
        use std::io::BufReader;

        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open FASTA file: {}", path.display()))?;
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        let mut sequences = HashMap::new();

        for result in reader.records() {
            let record = result.context("failed to read FASTA record")?;
            let name = String::from_utf8_lossy(record.name()).into_owned();
            let seq: Vec<u8> = record.sequence().as_ref().to_vec();
            sequences.insert(name, seq);
        }

        debug!("loaded {} reference sequences from {}", sequences.len(), path.display());
        let fragments = Self::build_fragments(&sequences);
        Ok(Self { sequences, fragments })
    }

    /// Create a reference genome from in-memory sequences (useful for testing).
    pub fn from_sequences(seqs: HashMap<String, Vec<u8>>) -> Self {
        let fragments = Self::build_fragments(&seqs);
        Self { sequences: seqs, fragments }
    }

    /// Fetch the reference sequence for the given region (1-based, inclusive).
    ///
    /// Returns uppercase ASCII. The result is truncated when the region runs
    /// past the end of the sequence, and is an error when it starts past it.
    pub fn fetch(&self, region: &Region) -> Result<Vec<u8>> {
        if let Some(seq) = self.sequences.get(&region.chrom) {
            return Self::slice(seq, region.start - 1, region.end, &region.chrom, region);
        }

        if let Some(frag) = self.fragments.iter().find(|f| {
            f.chrom == region.chrom && region.start >= f.start && region.start <= f.end
        }) && let Some(seq) = self.sequences.get(&frag.seq_key)
        {
            let offset_start = region.start - frag.start;
            let offset_end = region.end.min(frag.end) - frag.start + 1;
            return Self::slice(seq, offset_start, offset_end, &frag.seq_key, region);
        }

        anyhow::bail!("chromosome '{}' not found in reference", region.chrom)
    }

    fn slice(seq: &[u8], start: u64, end: u64, name: &str, region: &Region) -> Result<Vec<u8>> {
        let start = start as usize;
        if start >= seq.len() {
            anyhow::bail!(
                "region {} is beyond {} length {}",
                region,
                name,
                seq.len()
            );
        }
        let end = std::cmp::min(end as usize, seq.len());
        Ok(seq[start..end].iter().map(|b| b.to_ascii_uppercase()).collect())
    }

    /// Get the list of available chromosome names.
    ///
    /// Includes both raw FASTA entry names and base chromosome names from fragments.
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut chroms: Vec<&str> = Vec::new();
        for key in self.sequences.keys() {
            if seen.insert(key.as_str()) {
                chroms.push(key.as_str());
            }
        }
        for frag in &self.fragments {
            if seen.insert(frag.chrom.as_str()) {
                chroms.push(&frag.chrom);
            }
        }
        chroms
    }
}

impl ReferenceSource for ReferenceGenome {
    fn range_as_string(&self, contig: &str, start: u64, stop: u64) -> Result<String> {
        if stop < start {
            return Ok(String::new());
        }
        let region = Region::new(contig, start, stop)?;
        let bases = self.fetch(&region)?;
        Ok(String::from_utf8_lossy(&bases).into_owned())
    }

    /// Positions go through [`Region`], which is 1-based inclusive.
    fn convention(&self) -> LookupConvention {
        LookupConvention::OneBasedInclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_reference() -> ReferenceGenome {
        let mut seqs = HashMap::new();
        seqs.insert("chr1".to_string(), b"ACGTACGTACGTACGT".to_vec());
        seqs.insert("chr2".to_string(), b"ttttaaaaccccgggg".to_vec());
        ReferenceGenome::from_sequences(seqs)
    }

    #[test]
    fn test_fetch_region() {
        let reference = test_reference();
        let region = Region::new("chr1", 1, 4).unwrap();
        assert_eq!(reference.fetch(&region).unwrap(), b"ACGT");
    }

    #[test]
    fn test_fetch_uppercases() {
        let reference = test_reference();
        let region = Region::new("chr2", 1, 6).unwrap();
        assert_eq!(reference.fetch(&region).unwrap(), b"TTTTAA");
    }

    #[test]
    fn test_fetch_truncates_at_sequence_end() {
        let reference = test_reference();
        let region = Region::new("chr1", 13, 40).unwrap();
        assert_eq!(reference.fetch(&region).unwrap(), b"ACGT");
    }

    #[test]
    fn test_fetch_missing_chrom() {
        let reference = test_reference();
        let region = Region::new("chrX", 1, 100).unwrap();
        assert!(reference.fetch(&region).is_err());
    }

    #[test]
    fn test_fetch_beyond_length() {
        let reference = test_reference();
        let region = Region::new("chr1", 100, 200).unwrap();
        assert!(reference.fetch(&region).is_err());
    }

    #[test]
    fn test_range_as_string_is_one_based_inclusive() {
        let reference = test_reference();
        assert_eq!(reference.range_as_string("chr1", 2, 5).unwrap(), "CGTA");
        assert_eq!(reference.range_as_string("chr1", 5, 4).unwrap(), "");
    }

    #[test]
    fn test_chromosomes() {
        let reference = test_reference();
        let chroms = reference.chromosomes();
        assert!(chroms.contains(&"chr1"));
        assert!(chroms.contains(&"chr2"));
    }

    #[test]
    fn test_from_fasta_file() {
        let dir = tempfile::tempdir().unwrap();
        let fasta_path = dir.path().join("test.fa");
        std::fs::write(&fasta_path, b">chr1\nACGTACGT\n>chr2\nTTTTAAAA\n").unwrap();

        let reference = ReferenceGenome::from_file(&fasta_path).unwrap();
        let region = Region::new("chr1", 1, 4).unwrap();
        assert_eq!(reference.fetch(&region).unwrap(), b"ACGT");
    }

    #[test]
    fn test_fragment_fasta_fetch() {
        let mut seqs = HashMap::new();
        seqs.insert("chr1:100-115".to_string(), b"ACGTACGTACGTACGT".to_vec());
        let reference = ReferenceGenome::from_sequences(seqs);

        let region = Region::new("chr1", 100, 103).unwrap();
        assert_eq!(reference.fetch(&region).unwrap(), b"ACGT");

        let region = Region::new("chr1", 105, 107).unwrap();
        assert_eq!(reference.fetch(&region).unwrap(), b"CGT");

        let chroms = reference.chromosomes();
        assert!(chroms.contains(&"chr1"));
        assert!(chroms.contains(&"chr1:100-115"));
    }

    #[test]
    fn test_fragment_out_of_range() {
        let mut seqs = HashMap::new();
        seqs.insert("chr1:100-115".to_string(), b"ACGTACGTACGTACGT".to_vec());
        let reference = ReferenceGenome::from_sequences(seqs);

        let region = Region::new("chr1", 50, 60).unwrap();
        assert!(reference.fetch(&region).is_err());
    }
}
