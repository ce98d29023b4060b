use std::path::Path as FsPath;

use anyhow::{Context, Result};
use svg::node::element::{Group, Path, Rectangle, Text, Title};
use svg::Document;

use crate::config::TrackConfig;
use crate::viewer::elements::{ElementStore, ReadElement};
use crate::viewer::geometry::path_data;
use crate::viewer::track::EMPTY_TRACK_MESSAGE;

/// Fill color of a mismatch label (IGV palette).
pub fn base_hex(base: char) -> &'static str {
    match base.to_ascii_uppercase() {
        'A' => "#188712",
        'C' => "#0600f9",
        'G' => "#d5bb04",
        'T' => "#f70016",
        _ => "#7f7f7f",
    }
}

fn fill_for(class: &str) -> &'static str {
    if class.ends_with("negative") {
        "#e8c4c4"
    } else {
        "#c4cfe8"
    }
}

fn read_group(element: &ReadElement, config: &TrackConfig) -> Group {
    let mut group = Group::new()
        .set("class", element.class)
        .set("transform", format!("translate(0, {})", element.y))
        .add(Title::new(element.description.clone()))
        .add(
            Path::new()
                .set("d", path_data(&element.outline))
                .set("fill", fill_for(element.class))
                .set("stroke", "#8a8a8a")
                .set("stroke-width", 0.5),
        );

    for marker in &element.mismatches {
        group = group.add(
            Text::new(marker.base.to_string())
                .set("class", marker.class())
                .set("x", marker.x)
                .set("y", config.read_height - 2.0)
                .set("font-family", "monospace")
                .set("font-size", config.read_height - 2.0)
                .set("fill", base_hex(marker.base)),
        );
    }
    group
}

/// Paint every element of `store` into an SVG document.
pub fn document(store: &ElementStore, config: &TrackConfig, width: u32, height: u32) -> Document {
    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("width", width)
                .set("height", height)
                .set("fill", "#ffffff"),
        );
    for element in store.iter() {
        doc = doc.add(read_group(element, config));
    }
    doc
}

/// The placeholder shown when there is no range to draw.
pub fn empty_document(width: u32, height: u32) -> Document {
    Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Text::new(EMPTY_TRACK_MESSAGE)
                .set("class", "pileup empty")
                .set("x", width / 2)
                .set("y", height / 2)
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif"),
        )
}

pub fn write(path: &FsPath, doc: &Document) -> Result<()> {
    svg::save(path, doc).with_context(|| format!("failed to write SVG: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::reconcile::{CreateElement, MismatchMarker, RenderBackend};

    fn store_with_one_read() -> ElementStore {
        let mut store = ElementStore::new();
        store.create_element(&CreateElement {
            key: "r1".into(),
            class: "alignment negative",
            row: 2,
            y: 30.0,
            outline: vec![(20.0, 0.0), (6.0, 0.0), (0.0, 6.5), (6.0, 13.0), (20.0, 13.0)],
            mismatches: vec![MismatchMarker {
                pos: 3,
                base: 'G',
                x: 3.0,
            }],
            description: "r1 chr1:1-25 (-)".into(),
        });
        store
    }

    #[test]
    fn test_document_contains_read_and_marker() {
        let doc = document(&store_with_one_read(), &TrackConfig::default(), 200, 100);
        let text = doc.to_string();
        assert!(text.contains("alignment negative"));
        assert!(text.contains("translate(0, 30)"));
        assert!(text.contains("M20,0L6,0L0,6.5L6,13L20,13"));
        assert!(text.contains("basepair G"));
        assert!(text.contains("r1 chr1:1-25 (-)"));
    }

    #[test]
    fn test_empty_document_has_placeholder() {
        let text = empty_document(200, 100).to_string();
        assert!(text.contains(EMPTY_TRACK_MESSAGE));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pileup.svg");
        let doc = document(&store_with_one_read(), &TrackConfig::default(), 200, 100);
        write(&path, &doc).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
    }

    #[test]
    fn test_base_hex() {
        assert_eq!(base_hex('a'), "#188712");
        assert_eq!(base_hex('N'), "#7f7f7f");
    }
}
