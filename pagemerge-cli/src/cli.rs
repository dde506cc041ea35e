//! CLI argument parsing for pagemerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled into the build script to render the man page, so it
//! only depends on `pagemerge`, `clap` and `tokio`.

use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pagemerge::config::{
    CompressionLevel, Config, Metadata, Orientation, OutputMode, OverwriteMode,
};
use pagemerge::error::{PageMergeError, Result};
use pagemerge::merge::SourceSpec;
use pagemerge::utils::expand_source_specs;

/// Merge PDF documents and page selections into a single file.
///
/// Each SOURCE is `PATH[@PAGES[@ORIENTATION]]`, for example
/// `report.pdf@1,3,6,12-16@landscape`. Sources are merged in the order given.
#[derive(Parser, Debug)]
#[command(name = "pagemerge")]
#[command(version)]
#[command(about = "Merge PDF documents and page selections into a single file", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Sources to merge (in order)
    ///
    /// PATH may be a glob pattern; every match gets the same pages and
    /// orientation.
    ///
    /// Examples:
    ///   pagemerge cover.pdf report.pdf@2-5 -o out.pdf
    ///   pagemerge 'scans/*.pdf@1@portrait' -o out.pdf
    #[arg(value_name = "SOURCE", required_unless_present = "input_list")]
    pub sources: Vec<String>,

    /// Output destination
    ///
    /// A file path in `file` mode, otherwise the suggested download name.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output mode: file, browser, download or string
    ///
    /// `browser` and `download` stream the PDF to stdout; `string` prints the
    /// raw document. Unknown values fall back to `browser`.
    #[arg(long, value_name = "MODE", default_value = "file")]
    pub mode: String,

    /// Pad each source with a blank page to an even page count
    #[arg(short, long)]
    pub duplex: bool,

    /// Orientation for all sources without their own override
    ///
    /// Without it, each page keeps the orientation of its geometry.
    #[arg(long, value_name = "ORIENTATION", env = "PAGEMERGE_ORIENTATION")]
    #[arg(value_parser = ["portrait", "p", "landscape", "l"], ignore_case = true)]
    pub orientation: Option<String>,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Set creator metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub creator: Option<String>,

    /// Set metadata by key (title, author, subject, keywords, creator)
    ///
    /// Repeatable. Unknown keys are ignored. Dedicated flags such as
    /// --title take precedence.
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,

    /// Compression level for output PDF
    ///
    /// - none: write streams as produced
    /// - standard: compress content streams (default)
    /// - maximum: also drop unused objects and renumber
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(env = "PAGEMERGE_COMPRESSION")]
    #[arg(value_parser = ["none", "standard", "maximum"], ignore_case = true)]
    pub compression: String,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Read sources from a file (one SOURCE per line)
    ///
    /// Lines starting with '#' are comments. Use '-' to read from stdin.
    /// Listed sources follow the ones given as arguments.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Print the merge plan without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub plan_json: bool,

    /// Verbose output (-v for debug logs, -vv for trace logs)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Build a validated [`Config`] for `sources`.
    ///
    /// # Errors
    ///
    /// Returns an error if an option value is invalid or
    /// [`Config::validate`] rejects the result.
    pub fn to_config(&self, sources: Vec<SourceSpec>) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let orientation = self
            .orientation
            .as_deref()
            .map(Orientation::from_str)
            .transpose()?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            sources,
            output: self.output.clone(),
            mode: OutputMode::parse_lenient(&self.mode),
            duplex: self.duplex,
            orientation,
            metadata: self.metadata()?,
            compression,
            overwrite_mode,
            dry_run: self.dry_run,
            plan_json: self.plan_json,
            verbose: self.verbose > 0,
            quiet: self.quiet,
        };

        config.validate()?;
        Ok(config)
    }

    /// Metadata from the dedicated flags, completed by `--meta` pairs.
    pub fn metadata(&self) -> Result<Metadata> {
        let pairs = self
            .meta
            .iter()
            .map(|pair| {
                pair.split_once('=').ok_or_else(|| {
                    PageMergeError::invalid_config(format!(
                        "Invalid --meta value '{pair}': expected KEY=VALUE"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut metadata = Metadata::new(
            self.title.clone(),
            self.author.clone(),
            self.subject.clone(),
            self.keywords.clone(),
            self.creator.clone(),
        );
        metadata.merge_missing(&Metadata::from_pairs(pairs));
        Ok(metadata)
    }

    /// Collect every source: arguments first, then the input list, with glob
    /// patterns expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, the input list cannot be
    /// read, or a glob pattern matches nothing.
    pub async fn get_all_sources(&self) -> Result<Vec<SourceSpec>> {
        let mut specs = self
            .sources
            .iter()
            .map(|source| source.parse::<SourceSpec>())
            .collect::<Result<Vec<_>>>()?;

        if let Some(ref input_list_path) = self.input_list {
            specs.extend(read_input_list(input_list_path).await?);
        }

        if specs.is_empty() {
            return Err(PageMergeError::EmptySession);
        }

        expand_source_specs(specs)
    }
}

/// Read sources from a file, or stdin for `-`.
pub async fn read_input_list(path: &Path) -> Result<Vec<SourceSpec>> {
    use tokio::io::BufReader;

    let read_error = |source| PageMergeError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        parse_input_list(BufReader::new(tokio::io::stdin()), path).await
    } else {
        let file = tokio::fs::File::open(path).await.map_err(read_error)?;
        parse_input_list(BufReader::new(file), path).await
    }
}

/// Parse one SOURCE per line, skipping blank lines and `#` comments.
pub async fn parse_input_list<R>(reader: R, path: &Path) -> Result<Vec<SourceSpec>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    use tokio::io::AsyncBufReadExt;

    let mut lines = reader.lines();
    let mut specs = Vec::new();
    let mut line_number = 0;

    while let Some(line) =
        lines
            .next_line()
            .await
            .map_err(|source| PageMergeError::FailedToReadInputList {
                path: path.to_path_buf(),
                source,
            })?
    {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let spec = line
            .parse::<SourceSpec>()
            .map_err(|err| PageMergeError::InvalidInputList {
                path: path.to_path_buf(),
                line_number,
                details: err.to_string(),
            })?;
        specs.push(spec);
    }

    Ok(specs)
}
