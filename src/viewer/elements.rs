use std::collections::HashMap;

use log::trace;

use crate::viewer::geometry::Point;
use crate::viewer::reconcile::{CreateElement, MismatchMarker, PatchElement, RenderBackend};

/// A read element as a painter sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadElement {
    pub key: String,
    pub class: &'static str,
    pub row: usize,
    pub y: f64,
    pub outline: Vec<Point>,
    pub mismatches: Vec<MismatchMarker>,
    pub description: String,
}

/// Retained element set, kept in creation order.
///
/// This is the backend the terminal and SVG painters draw from: the
/// reconciler mutates it, the painters only read it.
#[derive(Debug, Default)]
pub struct ElementStore {
    order: Vec<String>,
    elements: HashMap<String, ReadElement>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ReadElement> {
        self.elements.get(key)
    }

    /// Elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ReadElement> {
        self.order.iter().filter_map(|k| self.elements.get(k))
    }
}

impl RenderBackend for ElementStore {
    fn create_element(&mut self, element: &CreateElement) {
        trace!("create {}", element.key);
        if self
            .elements
            .insert(
                element.key.clone(),
                ReadElement {
                    key: element.key.clone(),
                    class: element.class,
                    row: element.row,
                    y: element.y,
                    outline: element.outline.clone(),
                    mismatches: element.mismatches.clone(),
                    description: element.description.clone(),
                },
            )
            .is_none()
        {
            self.order.push(element.key.clone());
        }
    }

    fn patch_element(&mut self, patch: &PatchElement) {
        let Some(element) = self.elements.get_mut(&patch.key) else {
            return;
        };
        element.outline = patch.outline.clone();
        for (marker, x) in element.mismatches.iter_mut().zip(&patch.mismatch_xs) {
            marker.x = *x;
        }
    }

    fn remove_element(&mut self, key: &str) {
        trace!("remove {key}");
        if self.elements.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}
