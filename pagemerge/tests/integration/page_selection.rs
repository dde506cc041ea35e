//! Integration tests for page selections and orientation.

use pagemerge::merge::SourceSpec;
use pagemerge::{MergeSession, Metadata, Orientation};

use crate::common::{LETTER, LETTER_LANDSCAPE, Workspace, page_labels, page_sizes};

fn labels(pages: &[u32]) -> Vec<String> {
    pages.iter().map(|page| format!("Page {page}")).collect()
}

#[test]
fn test_range_expression_selects_pages_in_order() {
    let workspace = Workspace::new();
    let report = workspace.pdf("report.pdf", &[LETTER; 16]);

    let mut session = MergeSession::new();
    session
        .add_source_with(&report, "1,3,6,12-16", None)
        .unwrap();
    let stats = session.merge(None, &Metadata::default()).unwrap();

    assert_eq!(stats.total_pages, 8);
    assert_eq!(
        page_labels(session.document().unwrap()),
        labels(&[1, 3, 6, 12, 13, 14, 15, 16])
    );
}

#[test]
fn test_duplicates_and_reverse_order_are_kept() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 3]);

    let mut session = MergeSession::new();
    session.add_source_with(&a, "3,2,2,1", None).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    assert_eq!(
        page_labels(session.document().unwrap()),
        labels(&[3, 2, 2, 1])
    );
}

#[test]
fn test_sources_keep_registration_order() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);
    let b = workspace.pdf("b.pdf", &[LETTER; 2]);

    let mut session = MergeSession::new();
    session.add_source_with(&b, "2", None).unwrap();
    session.add_source_with(&a, "all", None).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    assert_eq!(
        page_labels(session.document().unwrap()),
        labels(&[2, 1, 2])
    );
}

#[test]
fn test_orientation_inferred_per_page() {
    let workspace = Workspace::new();
    let mixed = workspace.pdf("mixed.pdf", &[LETTER, LETTER_LANDSCAPE]);

    let mut session = MergeSession::new();
    session.add_source(&mixed).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    assert_eq!(
        page_sizes(session.document().unwrap()),
        vec![LETTER, LETTER_LANDSCAPE]
    );
}

#[test]
fn test_global_orientation_swaps_page_box() {
    let workspace = Workspace::new();
    let mixed = workspace.pdf("mixed.pdf", &[LETTER, LETTER_LANDSCAPE]);

    let mut session = MergeSession::new();
    session.add_source(&mixed).unwrap();
    session
        .merge(Some(Orientation::Portrait), &Metadata::default())
        .unwrap();

    assert_eq!(
        page_sizes(session.document().unwrap()),
        vec![LETTER, LETTER]
    );
}

#[test]
fn test_source_override_beats_global_orientation() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);
    let b = workspace.pdf("b.pdf", &[LETTER]);

    let mut session = MergeSession::new();
    session
        .add_source_with(&a, "all", Some(Orientation::Landscape))
        .unwrap()
        .add_source(&b)
        .unwrap();
    session
        .merge(Some(Orientation::Portrait), &Metadata::default())
        .unwrap();

    assert_eq!(
        page_sizes(session.document().unwrap()),
        vec![LETTER_LANDSCAPE, LETTER]
    );
}

#[test]
fn test_source_spec_syntax() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 4]);

    let spec: SourceSpec = format!("{}@2-3@l", a.display()).parse().unwrap();
    let mut session = MergeSession::new();
    session.add_spec(spec).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    let doc = session.document().unwrap();
    assert_eq!(page_labels(doc), labels(&[2, 3]));
    assert_eq!(page_sizes(doc), vec![LETTER_LANDSCAPE; 2]);
}
