//! Merge execution.
//!
//! Drives a [`PdfBackend`] over the registered sources: every selected page
//! is imported, given an output page of the right orientation and painted on
//! it; in duplex mode each source is padded to an even output page count.

use std::time::{Duration, Instant};

use crate::backend::PdfBackend;
use crate::config::{Metadata, Orientation, PageSize};
use crate::merge::planner::{SourceSpec, effective_orientation, needs_duplex_padding};
use crate::{PageMergeError, Result};

/// Options for a merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Orientation for sources without an override.
    pub orientation: Option<Orientation>,
    /// Pad each source to an even output page count.
    pub duplex: bool,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatistics {
    /// Number of source documents merged.
    pub files_merged: usize,
    /// Pages imported from sources.
    pub pages_imported: u32,
    /// Blank pages inserted for duplex printing.
    pub blank_pages_added: u32,
    /// Pages in the output document.
    pub total_pages: u32,
    /// Whether duplex padding was enabled.
    pub duplex: bool,
    /// Time taken to merge.
    pub merge_time: Duration,
}

/// An output page as decided by the executor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPage {
    /// Index of the source in merge order.
    pub source_index: usize,
    /// 1-based page number in the source.
    pub page_number: u32,
    /// Orientation of the output page.
    pub orientation: Orientation,
    /// Display size of the source page.
    pub size: PageSize,
}

/// Merge `sources` into `backend`.
///
/// Metadata fields are applied first, then sources in order. Any failure
/// aborts the whole merge; nothing is retried.
///
/// # Errors
///
/// - [`PageMergeError::EmptySession`] if `sources` is empty
/// - [`PageMergeError::EmptySource`] if a source resolves to no pages
/// - [`PageMergeError::PageNotFound`] if a selected page does not exist
/// - load and backend failures as reported by the backend
pub fn execute<B: PdfBackend>(
    backend: &mut B,
    sources: &[SourceSpec],
    options: &MergeOptions,
    metadata: &Metadata,
) -> Result<MergeStatistics> {
    if sources.is_empty() {
        return Err(PageMergeError::EmptySession);
    }

    let start = Instant::now();

    for (field, value) in metadata.fields() {
        backend.set_metadata_field(field, value)?;
        tracing::debug!(%field, value, "applied metadata field");
    }

    let mut pages_imported = 0u32;
    let mut blank_pages_added = 0u32;

    for (source_index, spec) in sources.iter().enumerate() {
        let page_count = backend.open_document(&spec.path)?;
        let pages = spec.resolve_pages(page_count);

        if pages.is_empty() {
            return Err(PageMergeError::EmptySource {
                path: spec.path.clone(),
            });
        }

        let selected = pages.len();
        let mut last_page = None;
        for page_number in pages {
            let imported = backend.import_page(page_number)?;
            let size = imported.size();
            let orientation = effective_orientation(spec.orientation, options.orientation, size);

            let resolved = ResolvedPage {
                source_index,
                page_number,
                orientation,
                size,
            };
            tracing::trace!(?resolved, "resolved page");

            backend.append_page(orientation, size)?;
            backend.render_imported_page(&imported)?;
            pages_imported += 1;
            last_page = Some((orientation, size));

            tracing::debug!(
                source = %spec.path.display(),
                page = page_number,
                output_page = backend.page_count(),
                %orientation,
                "appended page"
            );
        }

        if let Some((orientation, size)) = last_page
            && needs_duplex_padding(options.duplex, backend.page_count())
        {
            backend.append_page(orientation, size)?;
            blank_pages_added += 1;
            tracing::debug!(
                source = %spec.path.display(),
                output_page = backend.page_count(),
                "inserted blank page for duplex printing"
            );
        }

        tracing::info!(
            source = %spec.path.display(),
            pages = selected,
            page_count,
            "merged source"
        );
    }

    Ok(MergeStatistics {
        files_merged: sources.len(),
        pages_imported,
        blank_pages_added,
        total_pages: backend.page_count(),
        duplex: options.duplex,
        merge_time: start.elapsed(),
    })
}
