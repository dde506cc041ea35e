#![no_main]

use libfuzzer_sys::fuzz_target;
use pagemerge::{PageMergeError, PageSelection, SourceSpec, parse_page_range};

fuzz_target!(|data: &[u8]| {
    let Ok(expression) = std::str::from_utf8(data) else {
        return;
    };

    match parse_page_range(expression) {
        Ok(pages) => {
            assert!(pages.iter().all(|&page| page >= 1));
            // The token form expands to the same pages and survives a
            // display round trip.
            let selection: PageSelection = expression.parse().unwrap();
            assert_eq!(selection.resolve(u32::MAX), pages);
            let reparsed: PageSelection = selection.to_string().parse().unwrap();
            assert_eq!(reparsed, selection);
        }
        Err(PageMergeError::InvalidRange { start, end }) => assert!(start > end),
        Err(PageMergeError::InvalidPageNumber { .. }) => {}
        Err(PageMergeError::RangeTooLarge { pages, limit, .. }) => assert!(pages > limit),
        Err(other) => panic!("unexpected error: {other}"),
    }

    // Resolving against a small document stays bounded for any selection.
    if let Ok(selection) = expression.parse::<PageSelection>() {
        assert!(selection.resolve(10).len() <= expression.len() * 11);
    }

    // Source specs never panic, whatever the path looks like.
    let _ = expression.parse::<SourceSpec>();
});
