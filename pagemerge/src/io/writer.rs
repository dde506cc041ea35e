//! PDF writing and saving operations.
//!
//! This module turns a merged document into its output form:
//! - Files, written atomically (temp file, then rename)
//! - Byte buffers returned to the caller
//! - Streams to any `Write`, tagged with a `Content-Disposition` value
//!
//! # Examples
//!
//! ```no_run
//! use pagemerge::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.write_file(&doc, Path::new("output.pdf"))?;
//! println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{CompressionLevel, OutputMode};
use crate::error::{PageMergeError, Result};
use crate::io::reader::format_file_size;

/// Filename used in `Content-Disposition` when the destination has none.
pub const DEFAULT_FILENAME: &str = "doc.pdf";

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Drop unreferenced objects and renumber the rest.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl WriteOptions {
    /// Options matching a compression level.
    pub fn for_compression(level: CompressionLevel) -> Self {
        let (compress, optimize) = match level {
            CompressionLevel::None => (false, false),
            CompressionLevel::Standard => (true, false),
            CompressionLevel::Maximum => (true, true),
        };
        Self {
            compress,
            optimize,
            ..Default::default()
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a file write.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,

    /// Whether optimization was applied.
    pub optimized: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// What a save produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutput {
    /// The serialised document ([`OutputMode::String`]).
    Bytes(Vec<u8>),
    /// The document was written to `path` ([`OutputMode::File`]).
    Written {
        /// Destination file.
        path: PathBuf,
        /// Bytes written.
        size: u64,
    },
    /// The document was streamed to a writer ([`OutputMode::Browser`] or
    /// [`OutputMode::Download`]).
    Streamed {
        /// `Content-Disposition` value for the stream.
        disposition: String,
        /// Bytes streamed.
        size: u64,
    },
}

impl SaveOutput {
    /// Number of bytes produced.
    pub fn size(&self) -> u64 {
        match self {
            Self::Bytes(bytes) => bytes.len() as u64,
            Self::Written { size, .. } | Self::Streamed { size, .. } => *size,
        }
    }
}

/// `Content-Disposition` header value for a streamed document.
///
/// ```
/// use pagemerge::config::OutputMode;
/// use pagemerge::io::writer::content_disposition;
/// use std::path::Path;
///
/// assert_eq!(
///     content_disposition(OutputMode::Download, Path::new("out/report.pdf")),
///     "attachment; filename=\"report.pdf\""
/// );
/// ```
pub fn content_disposition(mode: OutputMode, destination: &Path) -> String {
    let filename = destination
        .file_name()
        .map(|name| name.to_string_lossy().replace('"', "'"))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let kind = match mode {
        OutputMode::Download => "attachment",
        _ => "inline",
    };

    format!("{kind}; filename=\"{filename}\"")
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer for a compression level.
    pub fn with_compression(level: CompressionLevel) -> Self {
        Self::with_options(WriteOptions::for_compression(level))
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self::with_options(WriteOptions {
            atomic: false,
            ..Default::default()
        })
    }

    /// Current options.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serialise a document to bytes, applying compression options.
    ///
    /// The document itself is left untouched.
    pub fn render(&self, doc: &Document) -> Result<Vec<u8>> {
        self.serialize(doc, OutputMode::String)
    }

    /// Save a PDF document to a file and return statistics about the write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Write operation fails
    pub fn write_file(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let mut doc = self.prepare(doc);

        let write_path = if self.options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        let file = std::fs::File::create(&write_path).map_err(|e| {
            PageMergeError::FailedToCreateOutput {
                path: write_path.clone(),
                source: e,
            }
        })?;

        let mut writer = std::io::BufWriter::with_capacity(self.options.buffer_size, file);

        let written = doc
            .save_to(&mut writer)
            .map_err(|e| PageMergeError::FailedToWrite {
                path: write_path.clone(),
                source: std::io::Error::other(e),
            })
            .and_then(|()| {
                writer.flush().map_err(|e| PageMergeError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                })
            });

        if let Err(err) = written {
            if self.options.atomic {
                let _ = std::fs::remove_file(&write_path);
            }
            return Err(err);
        }
        drop(writer);

        if self.options.atomic {
            std::fs::rename(&write_path, path).map_err(|e| PageMergeError::FailedToWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compressed: self.options.compress,
            optimized: self.options.optimize,
        })
    }

    /// Produce the output for `mode`.
    ///
    /// `destination` is the file for [`OutputMode::File`] and the suggested
    /// filename for streamed modes. Streamed modes write to `sink`; the other
    /// modes leave it untouched.
    ///
    /// # Errors
    ///
    /// Failures are reported as output errors for the requested mode.
    pub fn write<W: Write>(
        &self,
        doc: &Document,
        destination: &Path,
        mode: OutputMode,
        sink: &mut W,
    ) -> Result<SaveOutput> {
        match mode {
            OutputMode::String => self.serialize(doc, mode).map(SaveOutput::Bytes),
            OutputMode::File => {
                let stats = self.write_file(doc, destination)?;
                Ok(SaveOutput::Written {
                    path: stats.output_path,
                    size: stats.file_size,
                })
            }
            OutputMode::Browser | OutputMode::Download => {
                let bytes = self.serialize(doc, mode)?;
                sink.write_all(&bytes)
                    .and_then(|()| sink.flush())
                    .map_err(|e| PageMergeError::output(mode, e.to_string()))?;

                Ok(SaveOutput::Streamed {
                    disposition: content_disposition(mode, destination),
                    size: bytes.len() as u64,
                })
            }
        }
    }

    /// Check if a file can be written to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory doesn't exist or is read-only.
    pub fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = std::fs::metadata(parent).map_err(|_| {
            PageMergeError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if metadata.permissions().readonly() {
            return Err(PageMergeError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    fn serialize(&self, doc: &Document, mode: OutputMode) -> Result<Vec<u8>> {
        let mut doc = self.prepare(doc);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| PageMergeError::output(mode, e.to_string()))?;
        Ok(bytes)
    }

    fn prepare(&self, doc: &Document) -> Document {
        let mut doc = doc.clone();

        if self.options.compress {
            doc.compress();
        }

        if self.options.optimize {
            doc.prune_objects();
            doc.renumber_objects();
        }

        doc
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_FILENAME));
    name.push(".tmp");
    path.with_file_name(name)
}
