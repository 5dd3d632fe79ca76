//! [`PdfProvider`] backed by lopdf.
//!
//! # Coordinate System
//!
//! PDF uses a **bottom-left origin**: X grows to the right, Y grows upward.
//! Geometry handed to this provider is relative to the lower-left corner of
//! the page's MediaBox, so boxes that do not start at (0, 0) are shifted by
//! their origin when content is drawn.
//!
//! # Page Copy Strategy
//!
//! Copying pages between documents follows the usual lopdf merge recipe:
//! 1. Clone the source and renumber its objects above the target's max id
//! 2. Flatten inherited attributes (Resources, MediaBox, ...) onto each
//!    selected page, since the source page tree is not carried over
//! 3. Move every non-structural object into the target
//! 4. Add one new page object per selected index
//!
//! Objects only reachable from unselected pages are dropped at serialization
//! by pruning everything unreachable from the trailer.
//!
//! # Overlay Strategy
//!
//! Existing page content is wrapped in `q ... Q` before an overlay stream is
//! appended, so whatever graphics state the original content leaves behind
//! (transforms, colors, clipping) never leaks into the overlay.

use std::collections::{BTreeMap, HashMap};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::error::{Error, Result};

use super::font::{StandardFont, encode_win_ansi};
use super::jpeg::JpegHeader;
use super::page_index::PageIndex;
use super::provider::{
    ImagePlacement, OptimizationStats, OptimizeOptions, OptimizedPdf, PageSize, PdfProvider,
    RasterFormat, TextRun,
};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Depth limit when walking `Parent` links, guards against cyclic page trees.
const MAX_TREE_DEPTH: usize = 32;

/// PDF version written for documents created from scratch.
const OUTPUT_PDF_VERSION: &str = "1.7";

// =============================================================================
// Handles
// =============================================================================

/// A lopdf document owned by the engine.
#[derive(Debug, Clone)]
pub struct LopdfDocument {
    inner: Document,
}

impl LopdfDocument {
    /// Read-only access to the underlying lopdf document.
    pub const fn inner(&self) -> &Document {
        &self.inner
    }

    fn page_id(&self, page: PageIndex) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&page.as_lopdf_page_number()?)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page: page.page_number(),
                total: pages.len(),
            })
    }

    /// Object id of the root `Pages` node.
    fn pages_root(&self) -> Result<ObjectId> {
        let root_id = self
            .inner
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|e| Error::Lopdf(format!("Missing document catalog: {e}")))?;
        self.inner
            .get_dictionary(root_id)
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| Error::Lopdf(format!("Missing page tree: {e}")))
    }
}

/// A page copied into a target document but not yet attached to its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LopdfPage(ObjectId);

/// A Standard-14 font dictionary registered in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LopdfFont {
    id: ObjectId,
    font: StandardFont,
}

impl LopdfFont {
    fn resource_name(self) -> String {
        format!("TbF{}", self.id.0)
    }
}

/// An image XObject registered in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LopdfImage {
    id: ObjectId,
    width: u32,
    height: u32,
}

impl LopdfImage {
    fn resource_name(self) -> String {
        format!("TbIm{}", self.id.0)
    }
}

// =============================================================================
// Provider
// =============================================================================

/// PDF object model provider using lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfProvider;

impl LopdfProvider {
    pub const fn new() -> Self {
        Self
    }
}

impl PdfProvider for LopdfProvider {
    type Document = LopdfDocument;
    type PageHandle = LopdfPage;
    type FontHandle = LopdfFont;
    type ImageHandle = LopdfImage;

    fn parse(&self, bytes: &[u8]) -> Result<LopdfDocument> {
        let inner = Document::load_mem(bytes).map_err(|e| Error::PdfParse(e.to_string()))?;
        Ok(LopdfDocument { inner })
    }

    fn page_count(&self, doc: &LopdfDocument) -> usize {
        doc.inner.get_pages().len()
    }

    fn page_size(&self, doc: &LopdfDocument, page: PageIndex) -> Result<PageSize> {
        let page_id = doc.page_id(page)?;
        let [x0, y0, x1, y1] = media_box(&doc.inner, page_id);
        Ok(PageSize::new((x1 - x0).abs(), (y1 - y0).abs()))
    }

    fn create_empty(&self) -> Result<LopdfDocument> {
        let mut doc = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = doc.new_object_id();
        let pages = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(Vec::new())),
            ("Count", Object::Integer(0)),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Ok(LopdfDocument { inner: doc })
    }

    fn copy_pages(
        &self,
        target: &mut LopdfDocument,
        source: &LopdfDocument,
        indices: &[PageIndex],
    ) -> Result<Vec<LopdfPage>> {
        let mut src = source.inner.clone();
        src.renumber_objects_with(target.inner.max_id + 1);

        let src_pages: Vec<ObjectId> = src.get_pages().into_values().collect();
        let mut copies = Vec::with_capacity(indices.len());
        for &index in indices {
            let page_id = *src_pages.get(index.as_usize()).ok_or(Error::PageOutOfRange {
                page: index.page_number(),
                total: src_pages.len(),
            })?;
            copies.push(flatten_page(&src, page_id)?);
        }

        let src_max_id = src.max_id;
        for (object_id, object) in src.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    target.inner.objects.insert(object_id, object);
                }
            }
        }
        target.inner.max_id = target.inner.max_id.max(src_max_id);

        debug!("Copied {} page(s) from a {}-page source", copies.len(), src_pages.len());

        Ok(copies
            .into_iter()
            .map(|dict| LopdfPage(target.inner.add_object(Object::Dictionary(dict))))
            .collect())
    }

    fn append_page(&self, doc: &mut LopdfDocument, page: LopdfPage) -> Result<()> {
        let pages_id = doc.pages_root()?;

        doc.inner
            .get_dictionary_mut(page.0)
            .map_err(|e| Error::Lopdf(format!("Failed to get page: {e}")))?
            .set("Parent", Object::Reference(pages_id));

        let pages = doc
            .inner
            .get_dictionary_mut(pages_id)
            .map_err(|e| Error::Lopdf(format!("Failed to get page tree: {e}")))?;
        let mut kids = pages
            .get(b"Kids")
            .and_then(Object::as_array)
            .cloned()
            .unwrap_or_default();
        kids.push(Object::Reference(page.0));
        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0) + 1;
        pages.set("Kids", Object::Array(kids));
        pages.set("Count", Object::Integer(count));

        Ok(())
    }

    fn embed_standard_font(&self, doc: &mut LopdfDocument, font: StandardFont) -> Result<LopdfFont> {
        let id = doc.inner.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        Ok(LopdfFont { id, font })
    }

    fn measure_text_width(&self, font: &LopdfFont, text: &str, font_size: f32) -> f32 {
        font.font.text_width(text, font_size)
    }

    fn draw_text(
        &self,
        doc: &mut LopdfDocument,
        page: PageIndex,
        font: &LopdfFont,
        run: &TextRun,
    ) -> Result<()> {
        let page_id = doc.page_id(page)?;
        let [x0, y0, _, _] = media_box(&doc.inner, page_id);

        let gs_id = doc.inner.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"ExtGState".to_vec())),
            ("ca", Object::Real(run.opacity)),
            ("CA", Object::Real(run.opacity)),
        ]));
        let gs_name = format!("TbGs{}", gs_id.0);
        let font_name = font.resource_name();

        add_page_resource(&mut doc.inner, page_id, b"Font", &font_name, font.id)?;
        add_page_resource(&mut doc.inner, page_id, b"ExtGState", &gs_name, gs_id)?;

        let (sin, cos) = run.rotation_degrees.to_radians().sin_cos();
        let color = run.color.clamped();
        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(gs_name.into_bytes())]),
            Operation::new(
                "rg",
                vec![
                    Object::Real(color.r),
                    Object::Real(color.g),
                    Object::Real(color.b),
                ],
            ),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font_name.into_bytes()), Object::Real(run.font_size)],
            ),
            Operation::new(
                "Tm",
                vec![
                    Object::Real(cos),
                    Object::Real(sin),
                    Object::Real(-sin),
                    Object::Real(cos),
                    Object::Real(x0 + run.x),
                    Object::Real(y0 + run.y),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];

        append_overlay(&mut doc.inner, page_id, operations)
    }

    fn embed_raster_image(
        &self,
        doc: &mut LopdfDocument,
        bytes: &[u8],
        format: RasterFormat,
    ) -> Result<LopdfImage> {
        let (stream, width, height) = match format {
            RasterFormat::Jpeg => {
                let header = JpegHeader::parse(bytes)?;
                (jpeg_stream(bytes, &header), header.width, header.height)
            }
            RasterFormat::Png => {
                let decoded = image::load_from_memory_with_format(bytes, format.image_format())
                    .map_err(|e| Error::ImageDecode(format!("{format}: {e}")))?;
                let smask = alpha_stream(&decoded).map(|s| doc.inner.add_object(Object::Stream(s)));
                (png_stream(&decoded, smask), decoded.width(), decoded.height())
            }
        };
        let id = doc.inner.add_object(Object::Stream(stream));
        debug!("Embedded {}x{} {} image as {:?}", width, height, format, id);

        Ok(LopdfImage { id, width, height })
    }

    fn image_size(&self, image: &LopdfImage) -> (u32, u32) {
        (image.width, image.height)
    }

    fn add_page(&self, doc: &mut LopdfDocument, size: PageSize) -> Result<PageIndex> {
        let page_id = doc.inner.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(size.width),
                    Object::Real(size.height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
        ]));
        self.append_page(doc, LopdfPage(page_id))?;

        let count = self.page_count(doc);
        Ok(PageIndex::new(count.saturating_sub(1)))
    }

    fn draw_image(
        &self,
        doc: &mut LopdfDocument,
        page: PageIndex,
        image: &LopdfImage,
        placement: &ImagePlacement,
    ) -> Result<()> {
        let page_id = doc.page_id(page)?;
        let [x0, y0, _, _] = media_box(&doc.inner, page_id);
        let name = image.resource_name();
        add_page_resource(&mut doc.inner, page_id, b"XObject", &name, image.id)?;

        let mut operations = vec![Operation::new("q", vec![])];
        if let Some(clip) = placement.clip {
            operations.push(Operation::new(
                "re",
                vec![
                    Object::Real(x0 + clip.x),
                    Object::Real(y0 + clip.y),
                    Object::Real(clip.width),
                    Object::Real(clip.height),
                ],
            ));
            operations.push(Operation::new("W", vec![]));
            operations.push(Operation::new("n", vec![]));
        }
        let rect = placement.rect;
        operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(rect.width),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(rect.height),
                Object::Real(x0 + rect.x),
                Object::Real(y0 + rect.y),
            ],
        ));
        operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        operations.push(Operation::new("Q", vec![]));

        append_overlay(&mut doc.inner, page_id, operations)
    }

    fn optimize_structure(&self, bytes: &[u8], options: OptimizeOptions) -> Result<OptimizedPdf> {
        let mut doc = Document::load_mem(bytes).map_err(|e| Error::PdfParse(e.to_string()))?;
        let objects_before = doc.objects.len();

        let empty_streams = doc.delete_zero_length_streams();
        let streams_deduplicated = deduplicate_streams(&mut doc);
        let pruned = doc.prune_objects();
        doc.renumber_objects();
        doc.compress();

        debug!(
            "Optimization removed {} empty stream(s), {} duplicate stream(s), {} unreachable object(s)",
            empty_streams.len(),
            streams_deduplicated,
            pruned.len()
        );

        let objects_after = doc.objects.len();
        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save optimized PDF: {e}")))?;

        let stats = options.collect_stats.then(|| OptimizationStats {
            original_size: bytes.len(),
            optimized_size: output.len(),
            objects_before,
            objects_after,
            streams_deduplicated,
        });

        Ok(OptimizedPdf { bytes: output, stats })
    }

    fn serialize(&self, doc: &mut LopdfDocument) -> Result<Vec<u8>> {
        doc.inner.prune_objects();
        doc.inner.renumber_objects();
        doc.inner.compress();

        let mut output = Vec::new();
        doc.inner
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save PDF: {e}")))?;
        Ok(output)
    }
}

// =============================================================================
// Page Tree Helpers
// =============================================================================

/// Clone a page dictionary with inherited attributes made explicit and the
/// `Parent` link removed.
fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::Lopdf(format!("Failed to get page object: {e}")))?
        .clone();

    for key in INHERITABLE_KEYS {
        if !dict.has(key)
            && let Some(value) = inherited_attribute(doc, &dict, key)
        {
            dict.set(key.to_vec(), value);
        }
    }

    dict.remove(b"Parent");
    Ok(dict)
}

/// Walk up the page tree looking for an inheritable attribute.
fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value.clone());
        }
        node = parent;
    }
    None
}

/// Get the media box of a page as `[x0, y0, x1, y1]`, following inheritance.
fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return letter_box();
    };
    let value = page
        .get(b"MediaBox")
        .ok()
        .cloned()
        .or_else(|| inherited_attribute(doc, page, b"MediaBox"));

    let array = match value {
        Some(Object::Array(arr)) => Some(arr),
        Some(Object::Reference(id)) => doc.get_object(id).and_then(Object::as_array).ok().cloned(),
        _ => None,
    };

    if let Some(arr) = array
        && arr.len() == 4
    {
        let values: Vec<f32> = arr
            .iter()
            .filter_map(|o| match o {
                #[allow(clippy::cast_precision_loss)]
                Object::Integer(i) => Some(*i as f32),
                Object::Real(r) => Some(*r),
                _ => None,
            })
            .collect();
        if values.len() == 4 {
            return [values[0], values[1], values[2], values[3]];
        }
    }

    letter_box()
}

const fn letter_box() -> [f32; 4] {
    [0.0, 0.0, PageSize::LETTER.width, PageSize::LETTER.height]
}

// =============================================================================
// Resource and Content Helpers
// =============================================================================

/// Register `name -> id` in one category (`Font`, `ExtGState`, `XObject`) of
/// a page's Resources.
///
/// Resources may be inline, an indirect reference, or inherited. The merged
/// dictionary is written back inline on the page so that sibling pages
/// sharing the original Resources object are left untouched.
fn add_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    id: ObjectId,
) -> Result<()> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::Lopdf(format!("Failed to get page: {e}")))?;

    let resources_obj = page
        .get(b"Resources")
        .ok()
        .cloned()
        .or_else(|| inherited_attribute(doc, page, b"Resources"));
    let mut resources = resources_obj
        .and_then(|obj| resolve_dict(doc, &obj))
        .unwrap_or_default();

    let mut entries = resources
        .get(category)
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))
        .unwrap_or_default();
    entries.set(name, Object::Reference(id));
    resources.set(category.to_vec(), Object::Dictionary(entries));

    doc.get_dictionary_mut(page_id)
        .map_err(|e| Error::Lopdf(format!("Failed to get page: {e}")))?
        .set("Resources", Object::Dictionary(resources));

    Ok(())
}

/// Resolve an object that should be a Dictionary (handles References).
fn resolve_dict(doc: &Document, obj: &Object) -> Option<Dictionary> {
    match obj {
        Object::Dictionary(d) => Some(d.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

/// Append overlay operations to a page, isolating the existing content.
fn append_overlay(doc: &mut Document, page_id: ObjectId, operations: Vec<Operation>) -> Result<()> {
    let mut overlay = Content { operations }
        .encode()
        .map_err(|e| Error::Lopdf(format!("Failed to encode overlay content: {e}")))?;

    let existing = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::Lopdf(format!("Failed to get page: {e}")))?
        .get(b"Contents")
        .ok()
        .cloned();

    let existing: Vec<Object> = match existing {
        Some(Object::Reference(id)) => vec![Object::Reference(id)],
        Some(Object::Array(arr)) => arr,
        _ => Vec::new(),
    };

    let contents = if existing.is_empty() {
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));
        vec![Object::Reference(overlay_id)]
    } else {
        let push_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut body = b"Q\n".to_vec();
        body.append(&mut overlay);
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), body));

        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(push_id));
        contents.extend(existing);
        contents.push(Object::Reference(overlay_id));
        contents
    };

    doc.get_dictionary_mut(page_id)
        .map_err(|e| Error::Lopdf(format!("Failed to get page: {e}")))?
        .set("Contents", Object::Array(contents));

    Ok(())
}

// =============================================================================
// Image Streams
// =============================================================================

fn image_dict(width: u32, height: u32, color_space: &[u8], bits: i64) -> Dictionary {
    Dictionary::from_iter([
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(bits)),
    ])
}

const fn is_sixteen_bit(color: image::ColorType) -> bool {
    matches!(
        color,
        image::ColorType::L16
            | image::ColorType::La16
            | image::ColorType::Rgb16
            | image::ColorType::Rgba16
    )
}

/// JPEG data is passed through unchanged with `DCTDecode`.
fn jpeg_stream(bytes: &[u8], header: &JpegHeader) -> Stream {
    let mut dict = image_dict(header.width, header.height, header.color_space(), 8);
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    if header.is_inverted_cmyk() {
        let decode = [1, 0, 1, 0, 1, 0, 1, 0].map(Object::Integer).to_vec();
        dict.set("Decode", Object::Array(decode));
    }
    Stream::new(dict, bytes.to_vec()).with_compression(false)
}

/// PNG pixels are stored as raw RGB samples, Flate-compressed on save.
fn png_stream(decoded: &image::DynamicImage, smask: Option<ObjectId>) -> Stream {
    let (content, bits) = if is_sixteen_bit(decoded.color()) {
        let samples: Vec<u8> = decoded
            .to_rgb16()
            .into_raw()
            .into_iter()
            .flat_map(u16::to_be_bytes)
            .collect();
        (samples, 16)
    } else {
        (decoded.to_rgb8().into_raw(), 8)
    };

    let mut dict = image_dict(decoded.width(), decoded.height(), b"DeviceRGB", bits);
    if let Some(smask_id) = smask {
        dict.set("SMask", Object::Reference(smask_id));
    }
    Stream::new(dict, content).with_compression(true)
}

/// Soft mask carrying the alpha channel, if the image has one.
fn alpha_stream(decoded: &image::DynamicImage) -> Option<Stream> {
    if !decoded.color().has_alpha() {
        return None;
    }
    let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
    let dict = image_dict(decoded.width(), decoded.height(), b"DeviceGray", 8);
    Some(Stream::new(dict, alpha).with_compression(true))
}

// =============================================================================
// Structural Optimization
// =============================================================================

/// Collapse byte-identical streams (same dictionary, same content) onto one
/// object and rewrite every reference. Returns the number of streams removed.
fn deduplicate_streams(doc: &mut Document) -> usize {
    let mut seen: HashMap<(String, [u8; 16]), ObjectId> = HashMap::new();
    let mut remap: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();

    for (&id, object) in &doc.objects {
        let Object::Stream(stream) = object else {
            continue;
        };
        let key = (format!("{:?}", stream.dict), md5::compute(&stream.content).0);
        match seen.get(&key) {
            Some(&survivor) => {
                let same_content = matches!(
                    doc.objects.get(&survivor),
                    Some(Object::Stream(s)) if s.content == stream.content
                );
                if same_content {
                    remap.insert(id, survivor);
                }
            }
            None => {
                seen.insert(key, id);
            }
        }
    }

    if remap.is_empty() {
        return 0;
    }

    for object in doc.objects.values_mut() {
        remap_references(object, &remap);
    }
    for (_, value) in doc.trailer.iter_mut() {
        remap_references(value, &remap);
    }
    for id in remap.keys() {
        doc.objects.remove(id);
    }

    remap.len()
}

fn remap_references(object: &mut Object, remap: &BTreeMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(&target) = remap.get(id) {
                *id = target;
            }
        }
        Object::Array(items) => {
            for item in items {
                remap_references(item, remap);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                remap_references(value, remap);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                remap_references(value, remap);
            }
        }
        _ => {}
    }
}

// =============================================================================
// Tests
// =============================================================================
