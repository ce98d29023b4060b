pub mod read;
pub mod reader;

pub use read::{cigar_string, AlignedRead, CigarOp, RawRead, Strand};
pub use reader::AlignmentReader;
