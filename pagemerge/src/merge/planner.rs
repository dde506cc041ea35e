//! Source specifications and merge planning.
//!
//! A [`SourceSpec`] names one input document, which of its pages to take and
//! an optional orientation override. [`MergePlan`] resolves a list of them
//! against the actual documents without producing any output, predicting the
//! page stream the executor will emit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{Orientation, PageSize};
use crate::io::reader::PdfReader;
use crate::range::PageSelection;
use crate::{PageMergeError, Result};

/// One input of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    /// Path to the source PDF.
    pub path: PathBuf,
    /// Pages to take, in output order.
    pub selection: PageSelection,
    /// Orientation forced on every page of this source.
    pub orientation: Option<Orientation>,
}

impl SourceSpec {
    /// All pages of `path`, orientation decided per page.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            selection: PageSelection::All,
            orientation: None,
        }
    }

    /// Replace the page selection.
    pub fn with_selection(mut self, selection: PageSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the orientation override.
    pub fn with_orientation(mut self, orientation: Option<Orientation>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Check that the source exists and is a regular file.
    pub fn check_path(&self) -> Result<()> {
        check_source_path(&self.path)
    }

    /// Page numbers to import from a document with `page_count` pages.
    pub fn resolve_pages(&self, page_count: u32) -> Vec<u32> {
        self.selection.resolve(page_count)
    }
}

/// Check that `path` exists and is a regular file.
pub fn check_source_path(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(PageMergeError::not_a_file(path)),
        Err(_) => Err(PageMergeError::source_not_found(path)),
    }
}

impl FromStr for SourceSpec {
    type Err = PageMergeError;

    /// Parse `PATH[@PAGES[@ORIENTATION]]`.
    ///
    /// `PATH@ORIENTATION` selects every page. Paths may themselves contain
    /// `@`; only the trailing segments are interpreted.
    fn from_str(s: &str) -> Result<Self> {
        let Some((head, last)) = s.rsplit_once('@') else {
            return Ok(Self::new(s));
        };

        if let Ok(orientation) = last.parse::<Orientation>() {
            let (path, selection) = match head.rsplit_once('@') {
                Some((path, pages)) => (path, parse_selection(pages)?),
                None => (head, PageSelection::All),
            };
            return Ok(Self::new(path)
                .with_selection(selection)
                .with_orientation(Some(orientation)));
        }

        match parse_selection(last) {
            Ok(selection) => Ok(Self::new(head).with_selection(selection)),
            // `report@2x.pdf` is a file name, not a page selection.
            Err(_) if Path::new(s).is_file() => Ok(Self::new(s)),
            Err(err) => Err(err),
        }
    }
}

fn parse_selection(pages: &str) -> Result<PageSelection> {
    if pages.trim().is_empty() {
        Ok(PageSelection::All)
    } else {
        pages.parse()
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path.display(), self.selection)?;
        if let Some(orientation) = self.orientation {
            write!(f, "@{orientation}")?;
        }
        Ok(())
    }
}

/// Orientation of an output page.
///
/// A per-source override wins, then the global orientation; without either
/// the orientation follows the page's own geometry.
pub fn effective_orientation(
    source: Option<Orientation>,
    global: Option<Orientation>,
    size: PageSize,
) -> Orientation {
    source
        .or(global)
        .unwrap_or_else(|| Orientation::from_size(size))
}

/// Whether a blank page is needed after a source, given the output page
/// count so far.
pub fn needs_duplex_padding(duplex: bool, output_pages: u32) -> bool {
    duplex && output_pages % 2 == 1
}

/// Planned handling of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSource {
    /// Path to the source PDF.
    pub path: PathBuf,
    /// Pages in the source document.
    pub page_count: u32,
    /// Pages imported, in order.
    pub pages: Vec<u32>,
    /// Orientation override, if any.
    pub orientation: Option<Orientation>,
    /// First output page (1-based) taken by this source.
    pub first_output_page: u32,
    /// Blank pages appended after this source.
    pub blank_pages_after: u32,
}

/// A dry-run prediction of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Per-source plan, in merge order.
    pub sources: Vec<PlannedSource>,
    /// Whether duplex padding is applied.
    pub duplex: bool,
    /// Global orientation, if any.
    pub orientation: Option<Orientation>,
    /// Pages imported from sources.
    pub imported_pages: u32,
    /// Blank pages inserted for duplex printing.
    pub blank_pages: u32,
    /// Pages in the output document.
    pub total_pages: u32,
}

impl MergePlan {
    /// Open every source and work out the output page stream.
    ///
    /// Fails exactly where the merge itself would fail: on unloadable
    /// sources, empty selections and pages that do not exist.
    pub fn build(
        sources: &[SourceSpec],
        reader: &PdfReader,
        duplex: bool,
        orientation: Option<Orientation>,
    ) -> Result<Self> {
        if sources.is_empty() {
            return Err(PageMergeError::EmptySession);
        }

        let mut planned = Vec::with_capacity(sources.len());
        let mut output_pages = 0u32;
        let mut blank_pages = 0u32;

        for spec in sources {
            let loaded = reader.load(&spec.path)?;
            let page_count = loaded.page_count;
            let pages = spec.resolve_pages(page_count);

            if pages.is_empty() {
                return Err(PageMergeError::EmptySource {
                    path: spec.path.clone(),
                });
            }

            if let Some(&missing) = pages.iter().find(|&&p| p == 0 || p > page_count) {
                return Err(PageMergeError::page_not_found(
                    missing, &spec.path, page_count,
                ));
            }

            let first_output_page = output_pages + 1;
            output_pages += pages.len() as u32;

            let blank_pages_after = u32::from(needs_duplex_padding(duplex, output_pages));
            output_pages += blank_pages_after;
            blank_pages += blank_pages_after;

            planned.push(PlannedSource {
                path: spec.path.clone(),
                page_count,
                pages,
                orientation: spec.orientation,
                first_output_page,
                blank_pages_after,
            });
        }

        Ok(Self {
            sources: planned,
            duplex,
            orientation,
            imported_pages: output_pages - blank_pages,
            blank_pages,
            total_pages: output_pages,
        })
    }

    /// Render the plan as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PageMergeError::other(e.to_string()))
    }
}
