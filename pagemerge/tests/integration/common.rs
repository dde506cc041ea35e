//! Fixtures for the integration tests.
//!
//! Source documents are generated with lopdf into a temporary directory that
//! lives as long as the [`Workspace`].

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LETTER: (f32, f32) = (612.0, 792.0);
pub const LETTER_LANDSCAPE: (f32, f32) = (792.0, 612.0);

/// Temporary directory holding sources and outputs for one test.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for an output file that does not exist yet.
    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a source with one page per size.
    pub fn pdf(&self, name: &str, sizes: &[(f32, f32)]) -> PathBuf {
        self.pdf_with_rotation(name, sizes, 0)
    }

    /// Write a source whose pages all carry `/Rotate rotation`.
    pub fn pdf_with_rotation(&self, name: &str, sizes: &[(f32, f32)], rotation: i64) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut doc = build_document(sizes, rotation);
        doc.save(&path).expect("Failed to save fixture");
        path
    }
}

fn build_document(sizes: &[(f32, f32)], rotation: i64) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = sizes
        .iter()
        .enumerate()
        .map(|(index, &(width, height))| {
            let text = format!("BT /F1 18 Tf 36 36 Td (Page {}) Tj ET", index + 1);
            let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
                "Contents" => content_id,
            };
            if rotation != 0 {
                page.set("Rotate", rotation);
            }
            doc.add_object(page).into()
        })
        .collect();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => sizes.len() as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Page box of every page in `doc`, in page order.
pub fn page_sizes(doc: &Document) -> Vec<(f32, f32)> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("MediaBox");
            let values: Vec<f32> = media_box
                .iter()
                .map(|value| value.as_float().expect("number"))
                .collect();
            (values[2] - values[0], values[3] - values[1])
        })
        .collect()
}

/// Which pages of `doc` have no content stream.
pub fn blank_pages(doc: &Document) -> Vec<bool> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            doc.get_dictionary(page_id)
                .map(|page| !page.has(b"Contents"))
                .unwrap_or(false)
        })
        .collect()
}

/// Text drawn by each page's source, read back from the imported templates.
///
/// Returns an empty string for blank pages.
pub fn page_labels(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let Ok(xobjects) = doc
                .get_dictionary(page_id)
                .and_then(|page| page.get(b"Resources"))
                .and_then(Object::as_dict)
                .and_then(|resources| resources.get(b"XObject"))
                .and_then(Object::as_dict)
            else {
                return String::new();
            };

            xobjects
                .iter()
                .filter_map(|(_, value)| value.as_reference().ok())
                .filter_map(|id| doc.get_object(id).and_then(Object::as_stream).ok())
                .map(|stream| {
                    let content = stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone());
                    label(&String::from_utf8_lossy(&content))
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn label(content: &str) -> String {
    content
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(text, _)| text.to_string())
        .unwrap_or_default()
}
