//! Integration tests for duplex padding.

use pagemerge::{MergeSession, Metadata};

use crate::common::{LETTER, LETTER_LANDSCAPE, Workspace, blank_pages, page_sizes};

#[test]
fn test_two_single_page_sources() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);
    let b = workspace.pdf("b.pdf", &[LETTER]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap().add_source(&b).unwrap();
    let stats = session.duplex_merge(None, &Metadata::default()).unwrap();

    assert_eq!(stats.total_pages, 4);
    assert_eq!(stats.blank_pages_added, 2);
    assert!(stats.duplex);
    assert_eq!(
        blank_pages(session.document().unwrap()),
        vec![false, true, false, true]
    );
}

#[test]
fn test_even_sources_are_not_padded() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);
    let b = workspace.pdf("b.pdf", &[LETTER; 4]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap().add_source(&b).unwrap();
    let stats = session.duplex_merge(None, &Metadata::default()).unwrap();

    assert_eq!(stats.total_pages, 6);
    assert_eq!(stats.blank_pages_added, 0);
}

#[test]
fn test_padding_counts_selected_pages() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 4]);

    let mut session = MergeSession::new();
    session.add_source_with(&a, "1-3", None).unwrap();
    session.add_source_with(&a, "2,2", None).unwrap();
    let stats = session.duplex_merge(None, &Metadata::default()).unwrap();

    assert_eq!(stats.pages_imported, 5);
    assert_eq!(stats.total_pages, 6);
    assert_eq!(
        blank_pages(session.document().unwrap()),
        vec![false, false, false, true, false, false]
    );
}

#[test]
fn test_blank_page_matches_last_page_of_source() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER, LETTER, LETTER_LANDSCAPE]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.duplex_merge(None, &Metadata::default()).unwrap();

    let sizes = page_sizes(session.document().unwrap());
    assert_eq!(sizes.len(), 4);
    assert_eq!(sizes[3], LETTER_LANDSCAPE);
}

#[test]
fn test_plain_merge_never_pads() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap().add_source(&a).unwrap();
    let stats = session.merge(None, &Metadata::default()).unwrap();

    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.blank_pages_added, 0);
}
