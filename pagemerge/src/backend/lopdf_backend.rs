//! [`PdfBackend`] on top of lopdf.
//!
//! Imported pages become Form XObjects ("templates") in the output document.
//! A template's bounding box is the source page's CropBox (falling back to
//! MediaBox, then US Letter), its matrix undoes the page's `/Rotate` and box
//! origin, and its resources are deep copies of the page's (possibly
//! inherited) resources. Output pages paint one template each, anchored at
//! their top-left corner.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::{ImportedPage, ObjectImporter, PdfBackend};
use crate::config::{MetadataField, Orientation, PageSize};
use crate::io::reader::{LoadedPdf, PdfReader};
use crate::merge::metadata::MetadataManager;
use crate::{PageMergeError, Result};

/// PDF version of the merged output.
pub const OUTPUT_PDF_VERSION: &str = "1.7";

/// Limit for walking `Parent` chains of malformed page trees.
const MAX_TREE_DEPTH: usize = 64;

struct OpenSource {
    loaded: LoadedPdf,
    pages: BTreeMap<u32, ObjectId>,
    importer: ObjectImporter,
}

struct Template {
    name: String,
    id: ObjectId,
    size: PageSize,
}

/// Builds a merged document with lopdf.
pub struct LopdfBackend {
    reader: PdfReader,
    metadata: MetadataManager,
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    current_page: Option<(ObjectId, PageSize)>,
    source: Option<OpenSource>,
    templates: Vec<Template>,
    info: Dictionary,
}

impl LopdfBackend {
    /// Create a backend with an empty output document.
    pub fn new() -> Self {
        Self::with_reader(PdfReader::new())
    }

    /// Create a backend loading sources with `reader`.
    pub fn with_reader(reader: PdfReader) -> Self {
        let mut document = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = document.new_object_id();

        Self {
            reader,
            metadata: MetadataManager::new(),
            document,
            pages_id,
            page_ids: Vec::new(),
            current_page: None,
            source: None,
            templates: Vec::new(),
            info: Dictionary::new(),
        }
    }

    /// Assemble the page tree, catalog and Info dictionary and return the
    /// finished document.
    pub fn finish(self) -> Document {
        let Self {
            metadata,
            mut document,
            pages_id,
            page_ids,
            info,
            ..
        } = self;

        let count = page_ids.len() as i64;
        let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        metadata.write_info_now(&mut document, info);

        document
    }

    fn add_template(&mut self, page_number: u32) -> Result<ImportedPage> {
        let Some(source) = self.source.as_mut() else {
            return Err(PageMergeError::merge_failed("no source document is open"));
        };

        let Some(&page_id) = source.pages.get(&page_number) else {
            return Err(PageMergeError::page_not_found(
                page_number,
                &source.loaded.path,
                source.loaded.page_count,
            ));
        };

        let src = &source.loaded.document;
        let geometry = PageGeometry::read(src, page_id);
        let content = page_content(src, page_id, page_number)?;

        let resources = match inherited_attribute(src, page_id, b"Resources") {
            Some(resources) => source.importer.import(&mut self.document, src, resources),
            None => Object::Dictionary(Dictionary::new()),
        };
        let objects_copied = source.importer.copied();

        let [x0, y0, x1, y1] = geometry.bbox;
        let form = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => vec![Object::Real(x0), Object::Real(y0), Object::Real(x1), Object::Real(y1)],
            "Matrix" => geometry.matrix().into_iter().map(Object::Real).collect::<Vec<_>>(),
            "Resources" => resources,
        };
        let id = self.document.add_object(Stream::new(form, content));

        let size = geometry.display_size();
        let handle = self.templates.len();
        self.templates.push(Template {
            name: format!("TPL{handle}"),
            id,
            size,
        });

        tracing::trace!(
            page = page_number,
            rotation = geometry.rotation,
            %size,
            template = handle,
            objects_copied,
            "imported page"
        );

        Ok(ImportedPage {
            page_number,
            size,
            handle,
        })
    }
}

impl Default for LopdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for LopdfBackend {
    fn open_document(&mut self, path: &Path) -> Result<u32> {
        let loaded = self.reader.load(path)?;
        let pages = loaded.document.get_pages();
        let page_count = loaded.page_count;

        self.source = Some(OpenSource {
            loaded,
            pages,
            importer: ObjectImporter::new(),
        });

        Ok(page_count)
    }

    fn import_page(&mut self, page_number: u32) -> Result<ImportedPage> {
        self.add_template(page_number)
    }

    fn append_page(&mut self, orientation: Orientation, size: PageSize) -> Result<()> {
        let page_size = size.oriented(orientation);
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(page_size.width),
                Object::Real(page_size.height),
            ],
            "Resources" => dictionary! {},
        });

        self.page_ids.push(page_id);
        self.current_page = Some((page_id, page_size));
        Ok(())
    }

    fn render_imported_page(&mut self, page: &ImportedPage) -> Result<()> {
        let Some((page_id, page_size)) = self.current_page else {
            return Err(PageMergeError::merge_failed(
                "cannot render a template before a page is appended",
            ));
        };
        let Some(template) = self.templates.get(page.handle) else {
            return Err(PageMergeError::merge_failed(format!(
                "unknown template handle {}",
                page.handle
            )));
        };

        let dy = page_size.height - template.size.height;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![1.into(), 0.into(), 0.into(), 1.into(), 0.into(), Object::Real(dy)],
                ),
                Operation::new("Do", vec![Object::Name(template.name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let name = template.name.clone();
        let template_id = template.id;

        let content_id = self
            .document
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_dict = self.document.get_dictionary_mut(page_id)?;

        match page_dict.get_mut(b"Contents") {
            Ok(Object::Array(streams)) => streams.push(content_id.into()),
            Ok(existing) => {
                let first = existing.clone();
                *existing = Object::Array(vec![first, content_id.into()]);
            }
            Err(_) => {
                page_dict.set("Contents", content_id);
            }
        }

        let resources = page_dict
            .get_mut(b"Resources")
            .and_then(Object::as_dict_mut)?;
        match resources.get_mut(b"XObject").and_then(Object::as_dict_mut) {
            Ok(xobjects) => {
                xobjects.set(name, template_id);
            }
            Err(_) => {
                resources.set("XObject", dictionary! { name => template_id });
            }
        }

        Ok(())
    }

    fn set_metadata_field(&mut self, field: MetadataField, value: &str) -> Result<()> {
        self.metadata.set_field(&mut self.info, field, value);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }
}

/// Geometry of a source page as seen by a viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageGeometry {
    /// Visible box `[x0, y0, x1, y1]`, normalised so `x0 <= x1`, `y0 <= y1`.
    bbox: [f32; 4],
    /// Clockwise rotation in degrees: 0, 90, 180 or 270.
    rotation: i64,
}

impl PageGeometry {
    fn read(doc: &Document, page_id: ObjectId) -> Self {
        let bbox = inherited_attribute(doc, page_id, b"CropBox")
            .and_then(|obj| rectangle(doc, obj))
            .or_else(|| {
                inherited_attribute(doc, page_id, b"MediaBox").and_then(|obj| rectangle(doc, obj))
            })
            .unwrap_or([0.0, 0.0, PageSize::LETTER.width, PageSize::LETTER.height]);

        let rotation = inherited_attribute(doc, page_id, b"Rotate")
            .and_then(|obj| resolve(doc, obj).as_i64().ok())
            .map(normalize_rotation)
            .unwrap_or(0);

        Self { bbox, rotation }
    }

    fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }

    fn display_size(&self) -> PageSize {
        let size = PageSize::new(self.width(), self.height());
        if self.rotation % 180 == 0 {
            size
        } else {
            size.swapped()
        }
    }

    /// Form matrix mapping box space onto an upright page at the origin.
    fn matrix(&self) -> [f32; 6] {
        let (w, h) = (self.width(), self.height());
        let [a, b, c, d, e, f] = match self.rotation {
            90 => [0.0, -1.0, 1.0, 0.0, 0.0, w],
            180 => [-1.0, 0.0, 0.0, -1.0, w, h],
            270 => [0.0, 1.0, -1.0, 0.0, h, 0.0],
            _ => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        };
        let [x0, y0, ..] = self.bbox;
        [a, b, c, d, e - a * x0 - c * y0, f - b * x0 - d * y0]
    }
}

fn normalize_rotation(degrees: i64) -> i64 {
    let degrees = degrees.rem_euclid(360);
    if degrees % 90 == 0 { degrees } else { 0 }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Look up a page attribute, walking up the page tree for inherited values.
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let dict = node?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }
    None
}

fn rectangle(doc: &Document, object: &Object) -> Option<[f32; 4]> {
    let Object::Array(items) = resolve(doc, object) else {
        return None;
    };
    if items.len() != 4 {
        return None;
    }

    let mut values = [0.0f32; 4];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = resolve(doc, item).as_float().ok()?;
    }

    let [ax, ay, bx, by] = values;
    let rect = [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)];
    (rect[2] > rect[0] && rect[3] > rect[1]).then_some(rect)
}

/// Decoded page content; multiple content streams are joined by newlines.
///
/// Templates are written unfiltered, so a stream whose filter cannot be
/// decoded fails the import.
fn page_content(doc: &Document, page_id: ObjectId, page_number: u32) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    for stream_id in doc.get_page_contents(page_id) {
        let Ok(stream) = doc.get_object(stream_id).and_then(Object::as_stream) else {
            continue;
        };
        if !content.is_empty() {
            content.push(b'\n');
        }
        if !stream.is_compressed() {
            content.extend_from_slice(&stream.content);
            continue;
        }
        let data = stream.decompressed_content().map_err(|err| {
            PageMergeError::merge_failed(format!(
                "cannot decode content stream {} {} of page {page_number}: {err}",
                stream_id.0, stream_id.1
            ))
        })?;
        content.extend_from_slice(&data);
    }
    Ok(content)
}
