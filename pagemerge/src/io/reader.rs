//! PDF reading and loading operations.
//!
//! Sources are loaded one at a time, fully into memory, and checked for
//! encryption before any page is imported from them.
//!
//! # Examples
//!
//! ```no_run
//! use pagemerge::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf"))?;
//! println!("Loaded {} pages in {:?}", loaded.page_count, loaded.load_time);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PageMergeError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: u32,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len() as u32;
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }

    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Loads source PDFs, rejecting encrypted and page-less documents.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read or is not a valid PDF ([`PageMergeError::FailedToLoadPdf`])
    /// - PDF is encrypted ([`PageMergeError::EncryptedPdf`])
    /// - PDF has no pages
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let start = Instant::now();

        let document = Document::load(path).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                PageMergeError::encrypted_pdf(path)
            } else {
                PageMergeError::failed_to_load_pdf(path, err_msg)
            }
        })?;

        self.check(&document, path)?;

        let loaded = LoadedPdf::new(document, path.to_path_buf(), start.elapsed());
        tracing::debug!(
            path = %loaded.path.display(),
            pages = loaded.page_count,
            size = %loaded.format_file_size(),
            elapsed = ?loaded.load_time,
            "loaded source"
        );

        Ok(loaded)
    }

    fn check(&self, document: &Document, path: &Path) -> Result<()> {
        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(PageMergeError::encrypted_pdf(path));
        }

        if document.get_pages().is_empty() {
            return Err(PageMergeError::failed_to_load_pdf(path, "PDF has no pages"));
        }

        Ok(())
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
