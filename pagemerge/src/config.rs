//! Configuration module for pagemerge.
//!
//! This module holds the value types shared by the library and the CLI
//! (orientation, page size, output mode, metadata) and the validated [`Config`]
//! that drives a single merge run. It handles:
//! - Parsing of option values from their string forms
//! - Validation of argument combinations
//! - Normalisation of metadata values

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::merge::SourceSpec;
use crate::{PageMergeError, Result};

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall (or square).
    Landscape,
}

impl Orientation {
    /// Infer the orientation of a page from its size.
    ///
    /// Square pages are treated as landscape.
    pub fn from_size(size: PageSize) -> Self {
        if size.width < size.height {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }
}

impl FromStr for Orientation {
    type Err = PageMergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "portrait" | "p" => Ok(Self::Portrait),
            "landscape" | "l" => Ok(Self::Landscape),
            _ => Err(PageMergeError::invalid_config(format!(
                "Invalid orientation: {s}. Must be one of: portrait (p), landscape (l)"
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => write!(f, "portrait"),
            Self::Landscape => write!(f, "landscape"),
        }
    }
}

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl PageSize {
    /// US Letter, used when a page declares no usable box.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.276,
        height: 841.89,
    };

    /// Create a new page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The same size with width and height exchanged.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Swap the dimensions if needed so the long edge matches `orientation`.
    pub fn oriented(self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait if self.width > self.height => self.swapped(),
            Orientation::Landscape if self.width < self.height => self.swapped(),
            _ => self,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} x {:.2} pt", self.width, self.height)
    }
}

/// Where a merged document goes when saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Stream as an attachment (`Content-Disposition: attachment`).
    Download,
    /// Stream for inline display (`Content-Disposition: inline`).
    Browser,
    /// Write to the destination path.
    #[default]
    File,
    /// Return the bytes to the caller.
    String,
}

impl OutputMode {
    /// Parse a mode name case-insensitively.
    ///
    /// Unrecognised names fall back to [`OutputMode::Browser`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "download" => Self::Download,
            "browser" => Self::Browser,
            "file" => Self::File,
            "string" => Self::String,
            other => {
                tracing::debug!(mode = other, "unknown output mode, streaming inline");
                Self::Browser
            }
        }
    }

    /// Returns true for the modes that stream bytes to a writer.
    pub fn is_streamed(&self) -> bool {
        matches!(self, Self::Download | Self::Browser)
    }
}

impl FromStr for OutputMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Download => write!(f, "download"),
            Self::Browser => write!(f, "browser"),
            Self::File => write!(f, "file"),
            Self::String => write!(f, "string"),
        }
    }
}

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Write streams exactly as produced.
    None,
    /// Compress content streams.
    #[default]
    Standard,
    /// Compress, drop unreferenced objects and renumber.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PageMergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PageMergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// A document information field that can be set on the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    /// Document title.
    Title,
    /// Document author.
    Author,
    /// Document subject.
    Subject,
    /// Keywords, usually comma separated.
    Keywords,
    /// Application that created the original content.
    Creator,
}

impl MetadataField {
    /// Every recognised field, in the order they are applied.
    pub const ALL: [MetadataField; 5] = [
        Self::Title,
        Self::Author,
        Self::Subject,
        Self::Keywords,
        Self::Creator,
    ];

    /// Lowercase key accepted in metadata maps.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Subject => "subject",
            Self::Keywords => "keywords",
            Self::Creator => "creator",
        }
    }

    /// Name of the entry in the PDF Info dictionary.
    pub fn info_key(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Subject => "Subject",
            Self::Keywords => "Keywords",
            Self::Creator => "Creator",
        }
    }

    /// Look up a field by key, ignoring case and surrounding whitespace.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
    /// Application that created the original content.
    pub creator: Option<String>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
}

impl Metadata {
    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
        creator: Option<String>,
    ) -> Self {
        Self {
            title: normalize(title),
            author: normalize(author),
            subject: normalize(subject),
            keywords: normalize(keywords),
            creator: normalize(creator),
        }
    }

    /// Build metadata from key/value pairs.
    ///
    /// Keys are matched case-insensitively against [`MetadataField`];
    /// unrecognised keys are skipped. Later pairs override earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut metadata = Self::default();
        for (key, value) in pairs {
            match MetadataField::from_key(key.as_ref()) {
                Some(field) => metadata.set(field, value),
                None => tracing::debug!(key = key.as_ref(), "ignoring unknown metadata key"),
            }
        }
        metadata
    }

    /// Set a field. Whitespace-only values clear it.
    pub fn set(&mut self, field: MetadataField, value: impl Into<String>) {
        *self.slot_mut(field) = normalize(Some(value.into()));
    }

    /// Get a field's value.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::Title => self.title.as_deref(),
            MetadataField::Author => self.author.as_deref(),
            MetadataField::Subject => self.subject.as_deref(),
            MetadataField::Keywords => self.keywords.as_deref(),
            MetadataField::Creator => self.creator.as_deref(),
        }
    }

    /// Iterate over the fields that are set.
    pub fn fields(&self) -> impl Iterator<Item = (MetadataField, &str)> + '_ {
        MetadataField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Fill unset fields from `other`.
    pub fn merge_missing(&mut self, other: &Metadata) {
        for (field, value) in other.fields() {
            if self.get(field).is_none() {
                self.set(field, value);
            }
        }
    }

    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    fn slot_mut(&mut self, field: MetadataField) -> &mut Option<String> {
        match field {
            MetadataField::Title => &mut self.title,
            MetadataField::Author => &mut self.author,
            MetadataField::Subject => &mut self.subject,
            MetadataField::Keywords => &mut self.keywords,
            MetadataField::Creator => &mut self.creator,
        }
    }
}

/// Complete configuration for a merge run.
///
/// This structure contains all settings needed to perform a merge,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sources in merge order.
    pub sources: Vec<SourceSpec>,

    /// Output destination (file path, or download filename for streamed modes).
    pub output: PathBuf,

    /// Output target.
    pub mode: OutputMode,

    /// Pad each source to an even page count.
    pub duplex: bool,

    /// Orientation applied to sources without their own override.
    pub orientation: Option<Orientation>,

    /// Metadata to set on output document.
    pub metadata: Metadata,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Dry run mode - plan without creating output.
    pub dry_run: bool,

    /// Print the dry-run plan as JSON.
    pub plan_json: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Returns a reference to sources.
    pub fn sources(&self) -> &[SourceSpec] {
        self.sources.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sources are specified
    /// - Verbose and quiet modes are both enabled
    /// - `plan_json` is set without `dry_run`
    /// - The output file is one of the sources
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(PageMergeError::invalid_config("No input files specified"));
        }

        if self.verbose && self.quiet {
            return Err(PageMergeError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.plan_json && !self.dry_run {
            return Err(PageMergeError::invalid_config(
                "--plan-json requires --dry-run",
            ));
        }

        if self.mode == OutputMode::File
            && self.sources.iter().any(|source| source.path == self.output)
        {
            return Err(PageMergeError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            )));
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
