//! PDF metadata management.
//!
//! This module handles the document Info dictionary of merged output:
//! - Title, Author, Subject, Keywords, Creator from the caller
//! - Producer, set by pagemerge
//! - Creation and modification dates

use chrono::{DateTime, Local, Offset, TimeZone};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::{Metadata, MetadataField};

/// Manager for PDF metadata.
#[derive(Debug, Clone)]
pub struct MetadataManager {
    producer: String,
}

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self {
            producer: format!("{} {}", crate::NAME, crate::VERSION),
        }
    }

    /// Use a custom Producer entry.
    pub fn with_producer(producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
        }
    }

    /// Set a single field in an Info dictionary.
    pub fn set_field(&self, info: &mut Dictionary, field: MetadataField, value: &str) {
        info.set(field.info_key(), text_string(value));
    }

    /// Write `info` as the document's Info dictionary.
    ///
    /// Producer and the creation/modification dates are always written;
    /// caller fields in `info` are kept as they are.
    pub fn write_info<Tz>(&self, doc: &mut Document, mut info: Dictionary, now: &DateTime<Tz>)
    where
        Tz: TimeZone,
    {
        let date = Object::string_literal(format_pdf_date(now));
        info.set("Producer", text_string(&self.producer));
        info.set("CreationDate", date.clone());
        info.set("ModDate", date);

        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    /// Same as [`write_info`](Self::write_info), stamped with the local time.
    pub fn write_info_now(&self, doc: &mut Document, info: Dictionary) {
        self.write_info(doc, info, &Local::now());
    }

    /// Get metadata from a document.
    ///
    /// Returns default metadata when the document has no Info dictionary.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = info_dictionary(doc) else {
            return Metadata::default();
        };

        let mut metadata = Metadata::default();
        for field in MetadataField::ALL {
            if let Some(value) = string_field(doc, info, field.info_key().as_bytes()) {
                metadata.set(field, value);
            }
        }
        metadata
    }

    /// Read the Producer entry.
    pub fn get_producer(&self, doc: &Document) -> Option<String> {
        info_dictionary(doc).and_then(|info| string_field(doc, info, b"Producer"))
    }

    /// Check if a document has metadata.
    pub fn has_metadata(&self, doc: &Document) -> bool {
        doc.trailer.has(b"Info")
    }
}

impl Default for MetadataManager {
    fn default() -> Self {
        Self::new()
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn string_field(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match dict.get(key).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match value {
        Object::String(bytes, _) => decode_text_string(bytes),
        _ => None,
    }
}

/// Encode a PDF text string.
///
/// ASCII text is written as a literal string; anything else as UTF-16BE with
/// a byte order mark.
pub fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Decode a PDF text string written by [`text_string`] or as plain UTF-8.
pub fn decode_text_string(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            if rest.len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        _ => String::from_utf8(bytes.to_vec()).ok(),
    }
}

/// Format a timestamp as a PDF date string: `D:YYYYMMDDHHmmSS+HH'mm'`.
pub fn format_pdf_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    let offset_minutes = time.offset().fix().local_minus_utc() / 60;
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let offset_minutes = offset_minutes.abs();

    format!(
        "D:{}{sign}{:02}'{:02}'",
        time.naive_local().format("%Y%m%d%H%M%S"),
        offset_minutes / 60,
        offset_minutes % 60
    )
}
