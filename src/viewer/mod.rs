//! Everything that turns enriched reads into pixels: the scale, the keyed
//! reconciler, the hosting track, and the terminal and SVG painters.

pub mod app;
pub mod elements;
pub mod geometry;
pub mod reconcile;
pub mod render;
pub mod scale;
pub mod svg;
pub mod track;

pub use app::App;
pub use elements::{ElementStore, ReadElement};
pub use reconcile::{
    CreateElement, MismatchMarker, PatchElement, ReconcilePlan, Reconciler, RenderBackend,
};
pub use scale::Scale;
pub use track::{PileupTrack, Size, EMPTY_TRACK_MESSAGE};
