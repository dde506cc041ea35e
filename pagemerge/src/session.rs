//! Merge sessions.
//!
//! A [`MergeSession`] collects sources, merges them exactly once and can then
//! save the result any number of times.
//!
//! # Examples
//!
//! ```no_run
//! use pagemerge::{MergeSession, Metadata, Orientation, OutputMode};
//!
//! # fn example() -> pagemerge::Result<()> {
//! let mut session = MergeSession::new();
//! session
//!     .add_source("cover.pdf")?
//!     .add_source_with("report.pdf", "1,3,6,12-16", Some(Orientation::Portrait))?;
//!
//! let metadata = Metadata::from_pairs([("title", "Quarterly Report")]);
//! let stats = session.duplex_merge(None, &metadata)?;
//! println!("{} pages", stats.total_pages);
//!
//! session.save("merged.pdf", OutputMode::File)?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::Path;

use lopdf::Document;

use crate::backend::LopdfBackend;
use crate::config::{Metadata, Orientation, OutputMode};
use crate::io::{PdfReader, PdfWriter, SaveOutput};
use crate::merge::{MergeOptions, MergePlan, MergeStatistics, SourceSpec, execute};
use crate::range::PageSelection;
use crate::{PageMergeError, Result};

struct MergedDocument {
    document: Document,
    statistics: MergeStatistics,
}

enum SessionState {
    Open,
    Merged(MergedDocument),
    Failed,
}

/// An ordered set of sources merged into one document.
pub struct MergeSession {
    sources: Vec<SourceSpec>,
    state: SessionState,
    reader: PdfReader,
    writer: PdfWriter,
}

impl MergeSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            state: SessionState::Open,
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
        }
    }

    /// Load sources with `reader`.
    pub fn with_reader(mut self, reader: PdfReader) -> Self {
        self.reader = reader;
        self
    }

    /// Save output with `writer`.
    pub fn with_writer(mut self, writer: PdfWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Register every page of `path`.
    ///
    /// # Errors
    ///
    /// [`PageMergeError::SourceNotFound`] or [`PageMergeError::NotAFile`] if
    /// the path is not an existing file. The source is not added.
    pub fn add_source(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.add_spec(SourceSpec::new(path.as_ref()))
    }

    /// Register selected pages of `path`.
    ///
    /// `pages` is `"all"` or a page range expression such as `"1,3,6,12-16"`;
    /// it is parsed here, but page numbers are only checked against the
    /// document when merging.
    ///
    /// # Errors
    ///
    /// Path errors as for [`add_source`](Self::add_source), then
    /// [`PageMergeError::InvalidRange`] or [`PageMergeError::InvalidPageNumber`]
    /// for malformed selections. A rejected source is not added.
    pub fn add_source_with(
        &mut self,
        path: impl AsRef<Path>,
        pages: &str,
        orientation: Option<Orientation>,
    ) -> Result<&mut Self> {
        self.ensure_open()?;
        let path = path.as_ref();
        crate::merge::planner::check_source_path(path)?;
        let selection: PageSelection = pages.parse()?;

        self.add_spec(
            SourceSpec::new(path)
                .with_selection(selection)
                .with_orientation(orientation),
        )
    }

    /// Register a prepared source specification.
    pub fn add_spec(&mut self, spec: SourceSpec) -> Result<&mut Self> {
        self.ensure_open()?;
        spec.check_path()?;

        tracing::debug!(source = %spec, "registered source");
        self.sources.push(spec);
        Ok(self)
    }

    /// Registered sources, in merge order.
    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    /// Returns true once a merge has succeeded.
    pub fn is_merged(&self) -> bool {
        matches!(self.state, SessionState::Merged(_))
    }

    /// Merge all sources.
    ///
    /// # Errors
    ///
    /// [`PageMergeError::EmptySession`] without sources (the session stays
    /// usable). Any other failure aborts the merge and leaves the session
    /// failed.
    pub fn merge(
        &mut self,
        orientation: Option<Orientation>,
        metadata: &Metadata,
    ) -> Result<&MergeStatistics> {
        self.merge_with(
            MergeOptions {
                orientation,
                duplex: false,
            },
            metadata,
        )
    }

    /// Merge all sources, padding each to an even page count for duplex
    /// printing.
    pub fn duplex_merge(
        &mut self,
        orientation: Option<Orientation>,
        metadata: &Metadata,
    ) -> Result<&MergeStatistics> {
        self.merge_with(
            MergeOptions {
                orientation,
                duplex: true,
            },
            metadata,
        )
    }

    /// Merge with explicit options.
    pub fn merge_with(
        &mut self,
        options: MergeOptions,
        metadata: &Metadata,
    ) -> Result<&MergeStatistics> {
        self.ensure_open()?;
        if self.sources.is_empty() {
            return Err(PageMergeError::EmptySession);
        }

        let mut backend = LopdfBackend::with_reader(self.reader.clone());
        match execute(&mut backend, &self.sources, &options, metadata) {
            Ok(statistics) => {
                tracing::info!(
                    files = statistics.files_merged,
                    pages = statistics.total_pages,
                    blank_pages = statistics.blank_pages_added,
                    elapsed = ?statistics.merge_time,
                    "merge complete"
                );
                self.state = SessionState::Merged(MergedDocument {
                    document: backend.finish(),
                    statistics,
                });
                Ok(&self.merged()?.statistics)
            }
            Err(err) => {
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    /// Predict the merge without producing output.
    pub fn plan(&self, options: MergeOptions) -> Result<MergePlan> {
        MergePlan::build(
            &self.sources,
            &self.reader,
            options.duplex,
            options.orientation,
        )
    }

    /// Statistics of the completed merge.
    pub fn statistics(&self) -> Option<&MergeStatistics> {
        self.merged().ok().map(|merged| &merged.statistics)
    }

    /// The merged document.
    pub fn document(&self) -> Option<&Document> {
        self.merged().ok().map(|merged| &merged.document)
    }

    /// Save the merged document.
    ///
    /// [`OutputMode::File`] writes `destination`; [`OutputMode::String`]
    /// returns the bytes; streamed modes write to stdout and use
    /// `destination` only as the suggested filename.
    pub fn save(&self, destination: impl AsRef<Path>, mode: OutputMode) -> Result<SaveOutput> {
        if mode.is_streamed() {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            self.save_to_writer(&mut handle, destination, mode)
        } else {
            self.save_to_writer(&mut std::io::sink(), destination, mode)
        }
    }

    /// Like [`save`](Self::save), streaming to `writer` instead of stdout.
    pub fn save_to_writer<W: Write>(
        &self,
        writer: &mut W,
        destination: impl AsRef<Path>,
        mode: OutputMode,
    ) -> Result<SaveOutput> {
        let merged = self.merged()?;
        let output = self
            .writer
            .write(&merged.document, destination.as_ref(), mode, writer)?;

        tracing::debug!(%mode, size = output.size(), "saved merged document");
        Ok(output)
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Merged(_) => Err(PageMergeError::SessionConsumed),
            SessionState::Failed => Err(PageMergeError::SessionFailed),
        }
    }

    fn merged(&self) -> Result<&MergedDocument> {
        match &self.state {
            SessionState::Merged(merged) => Ok(merged),
            SessionState::Open => Err(PageMergeError::NotMerged),
            SessionState::Failed => Err(PageMergeError::SessionFailed),
        }
    }
}

impl Default for MergeSession {
    fn default() -> Self {
        Self::new()
    }
}
