//! Keyed diff between the enriched reads of this cycle and the elements a
//! backend is currently showing.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::alignment::RawRead;
use crate::config::TrackConfig;
use crate::pileup::{read_class, VisualAlignment};
use crate::viewer::geometry::{read_outline, Point};
use crate::viewer::scale::Scale;

/// A mismatch label inside a read element.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchMarker {
    pub pos: u64,
    pub base: char,
    pub x: f64,
}

impl MismatchMarker {
    pub fn class(&self) -> String {
        format!("basepair {}", self.base)
    }
}

/// A new element to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateElement {
    pub key: String,
    pub class: &'static str,
    pub row: usize,
    /// Vertical offset of the row; fixed for the life of the element.
    pub y: f64,
    pub outline: Vec<Point>,
    pub mismatches: Vec<MismatchMarker>,
    /// Shown when the element is clicked.
    pub description: String,
}

/// New scale-dependent geometry for an element that stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchElement {
    pub key: String,
    pub outline: Vec<Point>,
    /// One x per mismatch marker, in the order the markers were created.
    pub mismatch_xs: Vec<f64>,
}

/// The three disjoint operation sets of one reconciliation cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub enter: Vec<CreateElement>,
    pub update: Vec<PatchElement>,
    pub exit: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }

    /// Replay the plan against a backend: removals, then patches, then creations.
    pub fn apply<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for key in &self.exit {
            backend.remove_element(key);
        }
        for patch in &self.update {
            backend.patch_element(patch);
        }
        for element in &self.enter {
            backend.create_element(element);
        }
    }
}

/// Something that paints keyed read elements.
pub trait RenderBackend {
    fn create_element(&mut self, element: &CreateElement);
    fn patch_element(&mut self, patch: &PatchElement);
    fn remove_element(&mut self, key: &str);
}

/// Tracks which keys are on screen and turns each new read list into a plan.
pub struct Reconciler {
    config: TrackConfig,
    shown: Vec<String>,
}

impl Reconciler {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            config,
            shown: Vec::new(),
        }
    }

    /// Keys currently on screen, in the order they were last listed.
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn reconcile<R: RawRead>(
        &mut self,
        alignments: &[Arc<VisualAlignment<R>>],
        scale: &Scale,
    ) -> ReconcilePlan {
        let previous: HashSet<&str> = self.shown.iter().map(String::as_str).collect();
        let mut current: HashSet<&str> = HashSet::with_capacity(alignments.len());
        let mut plan = ReconcilePlan::default();

        for visual in alignments {
            // A key listed twice is drawn once.
            if !current.insert(visual.key.as_str()) {
                continue;
            }
            if previous.contains(visual.key.as_str()) {
                plan.update.push(self.patch(visual, scale));
            } else {
                plan.enter.push(self.create(visual, scale));
            }
        }

        plan.exit = self
            .shown
            .iter()
            .filter(|k| !current.contains(k.as_str()))
            .cloned()
            .collect();

        let next: Vec<String> = current_order(alignments);
        debug!(
            "reconcile: {} enter, {} update, {} exit",
            plan.enter.len(),
            plan.update.len(),
            plan.exit.len()
        );
        self.shown = next;
        plan
    }

    /// Plan that removes every element on screen.
    pub fn clear(&mut self) -> ReconcilePlan {
        ReconcilePlan {
            exit: std::mem::take(&mut self.shown),
            ..ReconcilePlan::default()
        }
    }

    fn create<R: RawRead>(&self, visual: &VisualAlignment<R>, scale: &Scale) -> CreateElement {
        CreateElement {
            key: visual.key.clone(),
            class: read_class(visual.strand),
            row: visual.row,
            y: self.config.y_for_row(visual.row),
            outline: self.outline(visual, scale),
            mismatches: visual
                .mismatches
                .iter()
                .map(|m| MismatchMarker {
                    pos: m.pos,
                    base: m.base,
                    x: scale.x(m.pos),
                })
                .collect(),
            description: visual.read.debug_string(),
        }
    }

    fn patch<R: RawRead>(&self, visual: &VisualAlignment<R>, scale: &Scale) -> PatchElement {
        PatchElement {
            key: visual.key.clone(),
            outline: self.outline(visual, scale),
            mismatch_xs: visual.mismatches.iter().map(|m| scale.x(m.pos)).collect(),
        }
    }

    fn outline<R: RawRead>(&self, visual: &VisualAlignment<R>, scale: &Scale) -> Vec<Point> {
        read_outline(
            scale,
            visual.read.pos(),
            visual.ref_length,
            visual.strand,
            &self.config,
        )
    }
}

fn current_order<R>(alignments: &[Arc<VisualAlignment<R>>]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(alignments.len());
    alignments
        .iter()
        .filter(|v| seen.insert(v.key.as_str()))
        .map(|v| v.key.clone())
        .collect()
}
