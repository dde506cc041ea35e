//! Integration tests for merge planning.

use pagemerge::io::PdfReader;
use pagemerge::merge::{MergeOptions, SourceSpec};
use pagemerge::range::PageSelection;
use pagemerge::{MergePlan, MergeSession, Metadata, Orientation, PageMergeError};

use crate::common::{LETTER, Workspace};

#[test]
fn test_plan_predicts_merge() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 3]);
    let b = workspace.pdf("b.pdf", &[LETTER; 5]);

    let mut session = MergeSession::new();
    session.add_source(&a).unwrap();
    session.add_source_with(&b, "2-4,1", None).unwrap();
    session.add_source_with(&a, "3", None).unwrap();

    let options = MergeOptions {
        orientation: None,
        duplex: true,
    };
    let plan = session.plan(options).unwrap();

    assert_eq!(plan.sources.len(), 3);
    assert_eq!(plan.sources[1].pages, vec![2, 3, 4, 1]);
    assert_eq!(plan.sources[1].first_output_page, 5);
    assert_eq!(plan.sources[2].first_output_page, 9);
    assert_eq!(plan.blank_pages, 2);
    assert_eq!(plan.total_pages, 10);

    let stats = session.merge_with(options, &Metadata::default()).unwrap();
    assert_eq!(stats.total_pages, plan.total_pages);
    assert_eq!(stats.blank_pages_added, plan.blank_pages);
    assert_eq!(stats.pages_imported, plan.imported_pages);
}

#[test]
fn test_plan_json_uses_camel_case() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);

    let sources = vec![
        SourceSpec::new(&a)
            .with_selection(PageSelection::from_pages([2]))
            .with_orientation(Some(Orientation::Landscape)),
    ];
    let plan = MergePlan::build(&sources, &PdfReader::new(), false, None).unwrap();
    let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["blankPages"], 0);
    assert_eq!(json["sources"][0]["pageCount"], 2);
    assert_eq!(json["sources"][0]["firstOutputPage"], 1);
    assert_eq!(json["sources"][0]["orientation"], "landscape");
}

#[test]
fn test_plan_reports_missing_page() {
    let workspace = Workspace::new();
    let a = workspace.pdf("a.pdf", &[LETTER; 2]);

    let selection = PageSelection::from_pages([1, 7]);
    let sources = vec![SourceSpec::new(&a).with_selection(selection)];
    let err = MergePlan::build(&sources, &PdfReader::new(), false, None).unwrap_err();

    assert!(matches!(
        err,
        PageMergeError::PageNotFound {
            page: 7,
            page_count: 2,
            ..
        }
    ));
}

#[test]
fn test_plan_without_sources() {
    let err = MergePlan::build(&[], &PdfReader::new(), false, None).unwrap_err();
    assert!(matches!(err, PageMergeError::EmptySession));
}
