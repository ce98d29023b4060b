use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use pileup_track::alignment::{AlignedRead, CigarOp, RawRead};
use pileup_track::config::TrackConfig;
use pileup_track::pileup::{BasePair, LayoutSession};
use pileup_track::reference::ReferenceGenome;
use pileup_track::region::VisibleRange;
use pileup_track::viewer::{
    svg, CreateElement, ElementStore, PatchElement, PileupTrack, RenderBackend, Scale, Size,
};

/// Element store that also counts the operations it receives, per key.
#[derive(Default)]
struct CountingStore {
    store: ElementStore,
    patches: HashMap<String, usize>,
    creates: usize,
    removes: usize,
}

impl RenderBackend for CountingStore {
    fn create_element(&mut self, element: &CreateElement) {
        self.creates += 1;
        self.store.create_element(element);
    }

    fn patch_element(&mut self, patch: &PatchElement) {
        *self.patches.entry(patch.key.clone()).or_default() += 1;
        self.store.patch_element(patch);
    }

    fn remove_element(&mut self, key: &str) {
        self.removes += 1;
        self.store.remove_element(key);
    }
}

fn poly_a_reference() -> ReferenceGenome {
    let mut seqs = HashMap::new();
    seqs.insert("chr1".to_string(), vec![b'A'; 200]);
    ReferenceGenome::from_sequences(seqs)
}

fn staggered_reads() -> Vec<AlignedRead> {
    vec![
        AlignedRead::simple("r1", "chr1", 10, &[b'A'; 10]),
        AlignedRead::simple("r2", "chr1", 15, b"AAAAACAAAA"),
        AlignedRead::simple("r3", "chr1", 21, &[b'A'; 9]),
    ]
}

#[test]
fn test_rows_are_packed_first_fit() {
    let reference = poly_a_reference();
    let reads = staggered_reads();
    let mut track = PileupTrack::new(TrackConfig::default());
    let mut store = ElementStore::new();
    let range = VisibleRange::new("chr1", 0, 99);

    let plan = track
        .update(&reads, Some(&range), Size::new(1000, 200), &reference, &mut store)
        .unwrap();
    assert_eq!(plan.enter.len(), 3);
    assert!(plan.update.is_empty());
    assert!(plan.exit.is_empty());

    let rows: Vec<usize> = reads
        .iter()
        .map(|r| store.get(&r.key()).unwrap().row)
        .collect();
    assert_eq!(rows, vec![0, 1, 0]);
    assert_eq!(track.session().row_count(), 2);

    let r2 = store.get(&reads[1].key()).unwrap();
    assert_eq!(r2.mismatches.len(), 1);
    assert_eq!(r2.mismatches[0].pos, 20);
    assert_eq!(r2.mismatches[0].base, 'C');
}

#[test]
fn test_range_shift_patches_in_place() {
    let reference = poly_a_reference();
    let reads = staggered_reads();
    let mut track = PileupTrack::new(TrackConfig::default());
    let mut backend = CountingStore::default();
    let size = Size::new(100, 50);

    track.update(&reads, Some(&VisibleRange::new("chr1", 0, 99)), size, &reference, &mut backend);
    let before: Vec<(usize, f64, f64)> = backend
        .store
        .iter()
        .map(|e| (e.row, e.y, e.outline[0].0))
        .collect();

    let plan = track
        .update(&reads, Some(&VisibleRange::new("chr1", 5, 104)), size, &reference, &mut backend)
        .unwrap();
    assert!(plan.enter.is_empty());
    assert!(plan.exit.is_empty());
    assert_eq!(plan.update.len(), 3);

    // Only patches reach the backend on a pure shift.
    assert_eq!(backend.creates, 3);
    assert_eq!(backend.removes, 0);
    for (element, (row, y, x)) in backend.store.iter().zip(before) {
        assert_eq!(element.row, row);
        assert_eq!(element.y, y);
        assert!((element.outline[0].0 - (x - 5.0)).abs() < 1e-9);
        assert_eq!(backend.patches[&element.key], 1);
    }
}

#[test]
fn test_reads_leaving_the_list_exit() {
    let reference = poly_a_reference();
    let reads = staggered_reads();
    let mut track = PileupTrack::new(TrackConfig::default());
    let mut store = ElementStore::new();
    let range = VisibleRange::new("chr1", 0, 99);
    let size = Size::new(100, 50);

    track.update(&reads, Some(&range), size, &reference, &mut store);
    let remaining = vec![reads[2].clone()];
    let plan = track
        .update(&remaining, Some(&range), size, &reference, &mut store)
        .unwrap();
    assert_eq!(plan.exit.len(), 2);
    assert_eq!(store.len(), 1);

    // Rows survive for the session, so a returning read keeps its row.
    track.update(&reads, Some(&range), size, &reference, &mut store);
    assert_eq!(store.get(&reads[1].key()).unwrap().row, 1);
}

#[test]
fn test_layout_session_is_memoized() {
    let reference = poly_a_reference();
    let mut session = LayoutSession::new(TrackConfig::default());
    let read = AlignedRead::simple("r1", "chr1", 10, b"AAGAA");

    let first = session.add_read(&read, &reference);
    let second = session.add_read(&read, &reference);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(session.len(), 1);
    assert_eq!(first.mismatches, vec![BasePair { pos: 12, base: 'G' }]);
}

#[test]
fn test_scale_is_linear() {
    let scale = Scale::new(100, 200, 1000.0, 0.0);
    assert_eq!(scale.x(100), 0.0);
    assert!((scale.x(201) - 1000.0).abs() < 1e-9);
    let step = scale.x(101) - scale.x(100);
    assert!((scale.x(151) - scale.x(150) - step).abs() < 1e-9);
    assert!((scale.invert(scale.x(150)) - 150.0).abs() < 1e-9);
}

#[test]
fn test_fasta_reference_feeds_track_and_svg() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = dir.path().join("ref.fa");
    let mut file = std::fs::File::create(&fasta).unwrap();
    writeln!(file, ">chr1").unwrap();
    writeln!(file, "acgtacgtacgtacgtacgt").unwrap();
    drop(file);

    let reference = ReferenceGenome::from_file(&fasta).unwrap();
    let mut read = AlignedRead::simple("r1", "chr1", 4, b"ACGAACGT");
    read.is_reverse = true;
    read.flags = 16;
    let deletion = AlignedRead {
        cigar: vec![CigarOp::Match(2), CigarOp::Deletion(2), CigarOp::Match(2)],
        sequence: b"ACAC".to_vec(),
        ..AlignedRead::simple("r2", "chr1", 8, b"ACAC")
    };
    let reads = vec![read, deletion];

    let mut track = PileupTrack::new(TrackConfig::default());
    let mut store = ElementStore::new();
    let range = VisibleRange::new("chr1", 0, 19);
    track.update(&reads, Some(&range), Size::new(200, 40), &reference, &mut store);

    let r1 = store.get(&reads[0].key()).unwrap();
    assert_eq!(r1.class, "alignment negative");
    assert_eq!(r1.mismatches.len(), 1);
    assert_eq!((r1.mismatches[0].pos, r1.mismatches[0].base), (7, 'A'));

    let r2 = store.get(&reads[1].key()).unwrap();
    assert_eq!(r2.row, 1);
    assert!(r2.mismatches.is_empty());

    let doc = svg::document(&store, track.config(), 200, track.content_height() as u32);
    let out = dir.path().join("pileup.svg");
    svg::write(&out, &doc).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("alignment negative"));
    assert!(text.contains("alignment positive"));
    assert!(text.contains("basepair A"));
}

#[test]
fn test_duplicate_records_get_their_own_rows() {
    let reference = poly_a_reference();
    let first = AlignedRead::simple("dup", "chr1", 10, &[b'A'; 10]);
    let second = AlignedRead {
        record_index: 1,
        ..first.clone()
    };
    let reads = vec![first, second];

    let mut track = PileupTrack::new(TrackConfig::default());
    let mut store = ElementStore::new();
    track.update(
        &reads,
        Some(&VisibleRange::new("chr1", 0, 99)),
        Size::new(100, 50),
        &reference,
        &mut store,
    );

    assert_eq!(store.len(), 2);
    let rows: Vec<usize> = reads
        .iter()
        .map(|r| store.get(&r.key()).unwrap().row)
        .collect();
    assert_eq!(rows, vec![0, 1]);
}
