//! Error types for pagemerge.
//!
//! This module defines all error types that can occur while registering
//! sources, merging them and writing the merged document. Errors carry the
//! path, page or range that caused them so callers can report them as-is.
//!
//! # Error Categories
//!
//! - **Registration Errors**: missing source files, malformed page selections
//! - **Merge Errors**: missing pages, unreadable or empty sources
//! - **Output Errors**: failures while writing or streaming the result
//! - **Configuration Errors**: invalid CLI arguments or input lists

use std::io;
use std::path::PathBuf;

use crate::config::OutputMode;

/// Result type alias for pagemerge operations.
pub type Result<T> = std::result::Result<T, PageMergeError>;

/// Main error type for pagemerge operations.
#[derive(Debug, thiserror::Error)]
pub enum PageMergeError {
    /// Source file does not exist at registration time.
    #[error("Could not locate PDF: {}", path.display())]
    SourceNotFound {
        /// Path that was registered.
        path: PathBuf,
    },

    /// Source path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// A range token whose start page is greater than its end page.
    #[error("Starting page '{start}' is greater than ending page '{end}'")]
    InvalidRange {
        /// First page of the range.
        start: u32,
        /// Last page of the range.
        end: u32,
    },

    /// A token in a page selection is not a positive page number.
    #[error("Invalid page number '{token}' in page selection '{expression}'")]
    InvalidPageNumber {
        /// The full selection expression.
        expression: String,
        /// The offending token.
        token: String,
    },

    /// A flat page list would exceed the expansion limit.
    #[error("Page selection '{expression}' expands to {pages} pages (limit {limit})")]
    RangeTooLarge {
        /// The full selection expression.
        expression: String,
        /// Pages the expression expands to.
        pages: u64,
        /// Largest list `parse_page_range` will build.
        limit: u64,
    },

    /// Merge was invoked without any registered source.
    #[error("No PDFs to merge")]
    EmptySession,

    /// A requested page does not exist in its source document.
    #[error(
        "Could not load page '{page}' in PDF '{}'. Check that the page exists \
         (document has {page_count} page(s))",
        path.display()
    )]
    PageNotFound {
        /// Requested 1-based page number.
        page: u32,
        /// Source document.
        path: PathBuf,
        /// Number of pages in the source document.
        page_count: u32,
    },

    /// A source resolved to an empty page list.
    #[error("PDF has no pages to merge: {}", path.display())]
    EmptySource {
        /// Source document.
        path: PathBuf,
    },

    /// Failed to load a source PDF.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Source PDF is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// Merge operation failed inside the PDF backend.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// The session was already merged; sources cannot be added or merged again.
    #[error("Merge session has already been merged")]
    SessionConsumed,

    /// A previous merge failed; the session must be discarded.
    #[error("Merge session failed during a previous merge and must be discarded")]
    SessionFailed,

    /// Save was requested before any merge.
    #[error("Nothing to save: merge has not been run")]
    NotMerged,

    /// Writing or streaming the merged document failed.
    #[error("Error outputting PDF to '{mode}': {reason}")]
    Output {
        /// Requested output target.
        mode: OutputMode,
        /// Underlying failure.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to read an input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains an invalid entry.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Error reported by the PDF library.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl PageMergeError {
    /// Create a SourceNotFound error.
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Create an InvalidPageNumber error.
    pub fn invalid_page_number(expression: impl Into<String>, token: impl Into<String>) -> Self {
        Self::InvalidPageNumber {
            expression: expression.into(),
            token: token.into(),
        }
    }

    /// Create a PageNotFound error.
    pub fn page_not_found(page: u32, path: impl Into<PathBuf>, page_count: u32) -> Self {
        Self::PageNotFound {
            page,
            path: path.into(),
            page_count,
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: impl Into<PathBuf>) -> Self {
        Self::EncryptedPdf { path: path.into() }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an Output error.
    pub fn output(mode: OutputMode, reason: impl Into<String>) -> Self {
        Self::Output {
            mode,
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error was raised while registering a source.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::NotAFile { .. }
                | Self::InvalidRange { .. }
                | Self::InvalidPageNumber { .. }
                | Self::RangeTooLarge { .. }
        )
    }

    /// Whether this error was raised while producing output.
    pub fn is_output_error(&self) -> bool {
        matches!(
            self,
            Self::Output { .. }
                | Self::OutputExists { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::Pdf(_) => 3,
            Self::OutputExists { .. } => 4,
            Self::Output { .. } => 5,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::PageNotFound { .. } => 6,
            Self::EmptySource { .. } => 6,
            Self::MergeFailed { .. } => 6,
            Self::SessionConsumed | Self::SessionFailed | Self::NotMerged => 6,
            Self::InvalidRange { .. } => 1,
            Self::InvalidPageNumber { .. } => 1,
            Self::RangeTooLarge { .. } => 1,
            Self::EmptySession => 1,
            Self::InvalidInputList { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
            Self::Cancelled => 130,
        }
    }
}
