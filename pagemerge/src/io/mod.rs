//! Loading source PDFs and producing output.

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader, format_file_size};
pub use writer::{PdfWriter, SaveOutput, WriteOptions, WriteStatistics, content_disposition};
