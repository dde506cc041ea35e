//! Integration tests for error handling and edge cases.

use pagemerge::{MergeSession, Metadata, OutputMode, PageMergeError};
use std::fs;

use crate::common::{LETTER, Workspace};

#[test]
fn test_nonexistent_source_is_rejected() {
    let workspace = Workspace::new();
    let mut session = MergeSession::new();

    let err = session
        .add_source(workspace.path().join("missing.pdf"))
        .err()
        .unwrap();

    assert!(matches!(err, PageMergeError::SourceNotFound { .. }));
    assert!(err.is_registration_error());
    assert_eq!(err.exit_code(), 2);
    assert!(session.sources().is_empty());
}

#[test]
fn test_directory_source_is_rejected() {
    let workspace = Workspace::new();
    let mut session = MergeSession::new();

    let err = session.add_source(workspace.path()).err().unwrap();
    assert!(matches!(err, PageMergeError::NotAFile { .. }));
}

#[test]
fn test_invalid_ranges_are_rejected() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 5]);
    let mut session = MergeSession::new();

    let err = session.add_source_with(&a, "5-3", None).err().unwrap();
    assert!(matches!(err, PageMergeError::InvalidRange { start: 5, end: 3 }));

    let err = session.add_source_with(&a, "1,x", None).err().unwrap();
    assert!(matches!(
        err,
        PageMergeError::InvalidPageNumber { ref token, .. } if token == "x"
    ));

    assert!(session.sources().is_empty());
}

#[test]
fn test_empty_session() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);
    let output = workspace.output("out.pdf");
    let mut session = MergeSession::new();

    let err = session.merge(None, &Metadata::default()).err().unwrap();
    assert!(matches!(err, PageMergeError::EmptySession));
    assert!(matches!(
        session.save(&output, OutputMode::File),
        Err(PageMergeError::NotMerged)
    ));
    assert!(!output.exists());

    // The session is still usable.
    session.add_source(&a).unwrap();
    assert!(session.merge(None, &Metadata::default()).is_ok());
}

#[test]
fn test_missing_page_aborts_merge() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);
    let b = workspace.pdf("b.pdf", &[LETTER; 2]);
    let output = workspace.output("out.pdf");

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.add_source_with(&b, "1,3", None).unwrap();

    let err = session.merge(None, &Metadata::default()).err().unwrap();
    assert!(matches!(
        err,
        PageMergeError::PageNotFound {
            page: 3,
            page_count: 2,
            ..
        }
    ));

    assert!(session.document().is_none());
    assert!(matches!(
        session.save(&output, OutputMode::File),
        Err(PageMergeError::SessionFailed)
    ));
    assert!(!output.exists());
}

#[test]
fn test_corrupt_source_fails_to_load() {
    let workspace = Workspace::new();
    let corrupt = workspace.path().join("corrupt.pdf");
    fs::write(&corrupt, b"this is not a pdf").unwrap();

    let mut session = MergeSession::new();
    session.add_source(&corrupt).unwrap();

    let err = session.merge(None, &Metadata::default()).err().unwrap();
    assert!(matches!(err, PageMergeError::FailedToLoadPdf { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_output_directory_missing() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);
    let output = workspace.path().join("no-such-dir").join("out.pdf");

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    let err = session.save(&output, OutputMode::File).unwrap_err();
    assert!(err.is_output_error());
    assert!(!output.exists());
}

#[test]
fn test_atomic_write_leaves_no_temp_file() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);
    let output = workspace.output("out.pdf");

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.merge(None, &Metadata::default()).unwrap();
    session.save(&output, OutputMode::File).unwrap();

    let names: Vec<_> = fs::read_dir(workspace.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|name| !name.ends_with(".tmp")), "{names:?}");
}
