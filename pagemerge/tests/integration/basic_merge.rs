//! Integration tests for basic merging and saving.

use lopdf::Document;
use pagemerge::config::CompressionLevel;
use pagemerge::io::PdfWriter;
use pagemerge::merge::MetadataManager;
use pagemerge::{MergeSession, Metadata, OutputMode, SaveOutput};

use crate::common::{LETTER, LETTER_LANDSCAPE, Workspace, page_sizes};

#[test]
fn test_merge_two_documents_to_file() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);
    let b = workspace.pdf("b.pdf", &[LETTER; 3]);
    let output = workspace.output("merged.pdf");

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap().add_source(&b).unwrap();

    let stats = session.merge(None, &Metadata::default()).unwrap();
    assert_eq!(stats.files_merged, 2);
    assert_eq!(stats.pages_imported, 5);
    assert_eq!(stats.blank_pages_added, 0);
    assert_eq!(stats.total_pages, 5);

    let saved = session.save(&output, OutputMode::File).unwrap();
    assert!(matches!(saved, SaveOutput::Written { ref path, size } if path == &output && size > 0));

    let merged = Document::load(&output).unwrap();
    assert_eq!(merged.get_pages().len(), 5);
}

#[test]
fn test_save_string_does_not_touch_disk() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);
    let output = workspace.output("never.pdf");

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    let SaveOutput::Bytes(bytes) = session.save(&output, OutputMode::String).unwrap() else {
        panic!("string mode should return bytes");
    };
    assert!(!output.exists());

    let merged = Document::load_mem(&bytes).unwrap();
    assert_eq!(merged.get_pages().len(), 1);
}

#[test]
fn test_download_stream_carries_attachment_disposition() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    let mut sink = Vec::new();
    let saved = session
        .save_to_writer(&mut sink, "reports/q3.pdf", OutputMode::Download)
        .unwrap();

    assert!(sink.starts_with(b"%PDF-"));
    assert_eq!(
        saved,
        SaveOutput::Streamed {
            disposition: "attachment; filename=\"q3.pdf\"".to_string(),
            size: sink.len() as u64,
        }
    );
}

#[test]
fn test_metadata_reaches_info_dictionary() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER]);

    let metadata = Metadata::from_pairs([
        ("title", "Annual Report"),
        ("AUTHOR", "Finance Team"),
        ("keywords", "report, 2024"),
        ("colour", "blue"),
    ]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.merge(None, &metadata).unwrap();

    let SaveOutput::Bytes(bytes) = session.save("out.pdf", OutputMode::String).unwrap() else {
        panic!("string mode should return bytes");
    };
    let merged = Document::load_mem(&bytes).unwrap();

    let manager = MetadataManager::new();
    let info = manager.get_metadata(&merged);
    assert_eq!(info.title.as_deref(), Some("Annual Report"));
    assert_eq!(info.author.as_deref(), Some("Finance Team"));
    assert_eq!(info.keywords.as_deref(), Some("report, 2024"));
    assert_eq!(info.subject, None);
    assert!(manager.get_producer(&merged).is_some());
}

#[test]
fn test_rotated_source_keeps_display_orientation() {
    let workspace = Workspace::new();
    let rotated = workspace.pdf_with_rotation("rotated.pdf", &[LETTER], 90);

    let mut session = MergeSession::new();
    session.add_source(&rotated).unwrap();
    session.merge(None, &Metadata::default()).unwrap();

    let sizes = page_sizes(session.document().unwrap());
    assert_eq!(sizes, vec![LETTER_LANDSCAPE]);
}

#[test]
fn test_compression_levels_produce_valid_documents() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);

    for level in [
        CompressionLevel::None,
        CompressionLevel::Standard,
        CompressionLevel::Maximum,
    ] {
        let mut session = MergeSession::new().with_writer(PdfWriter::with_compression(level));
        session.add_source(&a).unwrap();
        session.merge(None, &Metadata::default()).unwrap();

        let SaveOutput::Bytes(bytes) = session.save("out.pdf", OutputMode::String).unwrap() else {
            panic!("string mode should return bytes");
        };
        let merged = Document::load_mem(&bytes).unwrap();
        assert_eq!(merged.get_pages().len(), 2, "level {level:?}");
    }
}
