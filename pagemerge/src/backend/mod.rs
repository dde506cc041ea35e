//! PDF backends.
//!
//! The merge executor only talks to a [`PdfBackend`]: it opens sources,
//! imports pages as reusable templates, appends output pages and paints
//! templates on them. [`LopdfBackend`] is the production implementation.

mod import;
pub mod lopdf_backend;

use std::path::Path;

use crate::Result;
use crate::config::{MetadataField, Orientation, PageSize};

pub use self::import::ObjectImporter;
pub use self::lopdf_backend::LopdfBackend;

/// A page imported from the currently open source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportedPage {
    /// 1-based page number in the source.
    pub page_number: u32,
    /// Display size, with the page's rotation applied.
    pub size: PageSize,
    /// Backend-specific template handle.
    pub handle: usize,
}

impl ImportedPage {
    /// Display size of the page.
    pub fn size(&self) -> PageSize {
        self.size
    }
}

/// Operations the merge executor needs from a PDF library.
pub trait PdfBackend {
    /// Open a source document, making it the current source.
    ///
    /// Returns its page count.
    fn open_document(&mut self, path: &Path) -> Result<u32>;

    /// Import a page of the current source.
    ///
    /// Fails with [`PageNotFound`](crate::PageMergeError::PageNotFound) when
    /// `page_number` is outside the document.
    fn import_page(&mut self, page_number: u32) -> Result<ImportedPage>;

    /// Append an empty page to the output.
    fn append_page(&mut self, orientation: Orientation, size: PageSize) -> Result<()>;

    /// Paint an imported page on the most recently appended output page.
    fn render_imported_page(&mut self, page: &ImportedPage) -> Result<()>;

    /// Set a document information field on the output.
    fn set_metadata_field(&mut self, field: MetadataField, value: &str) -> Result<()>;

    /// Number of pages appended to the output so far.
    fn page_count(&self) -> u32;
}
