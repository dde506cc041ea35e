//! pagemerge - Merge PDF documents and page selections into a single file.
//!
//! This library combines whole documents or selected pages of them into one
//! output document. It supports:
//!
//! - Page range expressions such as `1,3,6,12-16`
//! - Per-source and global page orientation
//! - Duplex padding with blank pages
//! - Document metadata (title, author, subject, keywords, creator)
//! - Saving to a file, to stdout or to memory
//!
//! # Examples
//!
//! ## Merge Session
//!
//! ```no_run
//! use pagemerge::{MergeSession, Metadata, Orientation, OutputMode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new();
//! session.add_source("a.pdf")?;
//! session.add_source_with("b.pdf", "1,3-4", Some(Orientation::Landscape))?;
//!
//! let stats = session.merge(None, &Metadata::default())?;
//! println!("Created {} page document", stats.total_pages);
//!
//! session.save("merged.pdf", OutputMode::File)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Planning
//!
//! ```no_run
//! use pagemerge::io::PdfReader;
//! use pagemerge::{MergePlan, SourceSpec};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sources: Vec<SourceSpec> = vec!["a.pdf@1-2".parse()?, "b.pdf".parse()?];
//! let plan = MergePlan::build(&sources, &PdfReader::new(), true, None)?;
//! println!("{}", plan.to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod range;
pub mod session;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{Config, Metadata, Orientation, OutputMode, PageSize};
pub use error::{PageMergeError, Result};
pub use io::SaveOutput;
pub use merge::{MergePlan, MergeStatistics, SourceSpec};
pub use range::{PageSelection, PageToken, parse_page_range};
pub use session::MergeSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
