//! # pileup-track
//!
//! Pileup viewer for aligned reads. Reads are enriched once into
//! [`pileup::VisualAlignment`] records (strand, reference span, pileup row,
//! mismatches) and then reconciled against whatever a drawing backend is
//! showing, so pan and zoom only move existing elements.
//!
//! - `alignment`: read model, BAM loading, the `RawRead` capability trait
//! - `reference`: FASTA reference and the `ReferenceSource` lookup trait
//! - `pileup`: intervals, row packing, mismatch detection, the layout session
//! - `viewer`: coordinate scale, keyed reconciler, terminal and SVG painters

pub mod alignment;
pub mod config;
pub mod pileup;
pub mod reference;
pub mod region;
pub mod viewer;
