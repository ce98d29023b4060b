//! Row layout and per-read enrichment for the pileup track.

pub mod interval;
pub mod layout;
pub mod mismatch;
pub mod packer;

pub use interval::Interval;
pub use layout::{read_class, LayoutSession, SharedLayoutSession, VisualAlignment};
pub use mismatch::{differing_base_pairs, BasePair};
pub use packer::PileupRows;
