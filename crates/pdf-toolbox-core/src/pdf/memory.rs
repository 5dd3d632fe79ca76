//! Deterministic in-memory [`PdfProvider`].
//!
//! A `MemoryDocument` is a plain list of labelled pages. Its byte form is the
//! `%PDF-` signature, a marker line and the document as JSON, so it passes the
//! signature check like a real PDF would. Every draw call is recorded on the
//! page it targets, which lets tests assert overlay geometry and labels
//! without binary fixtures.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::font::StandardFont;
use super::page_index::PageIndex;
use super::provider::{
    ImagePlacement, OptimizationStats, OptimizeOptions, OptimizedPdf, PageSize, PdfProvider,
    RasterFormat, TextRun,
};

/// Header of the in-memory byte form.
pub const MEMORY_PDF_HEADER: &[u8] = b"%PDF-memory\n";

/// A page of a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    /// Identifies where the page came from, e.g. `A3` for page 3 of doc A
    pub label: String,
    pub size: PageSize,
    #[serde(default)]
    pub texts: Vec<TextRun>,
    #[serde(default)]
    pub images: Vec<DrawnImage>,
}

impl MemoryPage {
    pub fn new(label: impl Into<String>, size: PageSize) -> Self {
        Self {
            label: label.into(),
            size,
            texts: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// An embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryImage {
    pub id: usize,
    pub format: RasterFormat,
    pub width: u32,
    pub height: u32,
}

/// An image draw call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawnImage {
    pub image: MemoryImage,
    pub placement: ImagePlacement,
}

/// The in-memory document model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub pages: Vec<MemoryPage>,
    #[serde(default)]
    pub fonts: Vec<StandardFont>,
    #[serde(default)]
    pub images: Vec<MemoryImage>,
}

impl MemoryDocument {
    /// A document with one A4 page per label.
    pub fn with_page_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: labels
                .into_iter()
                .map(|label| MemoryPage::new(label, PageSize::A4))
                .collect(),
            ..Self::default()
        }
    }

    /// Page labels in order.
    pub fn labels(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(self)
            .map_err(|e| Error::PdfSave(format!("Failed to encode memory document: {e}")))?;
        let mut bytes = MEMORY_PDF_HEADER.to_vec();
        bytes.extend_from_slice(&json);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let json = bytes
            .strip_prefix(MEMORY_PDF_HEADER)
            .ok_or_else(|| Error::PdfParse("missing memory document header".to_string()))?;
        serde_json::from_slice(json).map_err(|e| Error::PdfParse(e.to_string()))
    }

    fn page_mut(&mut self, page: PageIndex) -> Result<&mut MemoryPage> {
        let total = self.pages.len();
        self.pages
            .get_mut(page.as_usize())
            .ok_or(Error::PageOutOfRange {
                page: page.page_number(),
                total,
            })
    }
}

/// In-memory provider that also keeps a log of the primitives it served.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    calls: Mutex<Vec<&'static str>>,
    empty_optimization: bool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose `optimize_structure` returns zero bytes.
    pub fn with_empty_optimization() -> Self {
        Self {
            empty_optimization: true,
            ..Self::default()
        }
    }

    /// Names of the provider primitives called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl PdfProvider for MemoryProvider {
    type Document = MemoryDocument;
    type PageHandle = MemoryPage;
    type FontHandle = StandardFont;
    type ImageHandle = MemoryImage;

    fn parse(&self, bytes: &[u8]) -> Result<MemoryDocument> {
        self.record("parse");
        MemoryDocument::from_bytes(bytes)
    }

    fn page_count(&self, doc: &MemoryDocument) -> usize {
        doc.pages.len()
    }

    fn page_size(&self, doc: &MemoryDocument, page: PageIndex) -> Result<PageSize> {
        doc.pages
            .get(page.as_usize())
            .map(|p| p.size)
            .ok_or(Error::PageOutOfRange {
                page: page.page_number(),
                total: doc.pages.len(),
            })
    }

    fn create_empty(&self) -> Result<MemoryDocument> {
        self.record("create_empty");
        Ok(MemoryDocument::default())
    }

    fn copy_pages(
        &self,
        _target: &mut MemoryDocument,
        source: &MemoryDocument,
        indices: &[PageIndex],
    ) -> Result<Vec<MemoryPage>> {
        self.record("copy_pages");
        indices
            .iter()
            .map(|&index| {
                source
                    .pages
                    .get(index.as_usize())
                    .cloned()
                    .ok_or(Error::PageOutOfRange {
                        page: index.page_number(),
                        total: source.pages.len(),
                    })
            })
            .collect()
    }

    fn append_page(&self, doc: &mut MemoryDocument, page: MemoryPage) -> Result<()> {
        self.record("append_page");
        doc.pages.push(page);
        Ok(())
    }

    fn embed_standard_font(&self, doc: &mut MemoryDocument, font: StandardFont) -> Result<StandardFont> {
        self.record("embed_standard_font");
        doc.fonts.push(font);
        Ok(font)
    }

    fn measure_text_width(&self, font: &StandardFont, text: &str, font_size: f32) -> f32 {
        font.text_width(text, font_size)
    }

    fn draw_text(
        &self,
        doc: &mut MemoryDocument,
        page: PageIndex,
        _font: &StandardFont,
        run: &TextRun,
    ) -> Result<()> {
        self.record("draw_text");
        doc.page_mut(page)?.texts.push(run.clone());
        Ok(())
    }

    fn embed_raster_image(
        &self,
        doc: &mut MemoryDocument,
        bytes: &[u8],
        format: RasterFormat,
    ) -> Result<MemoryImage> {
        self.record("embed_raster_image");
        let decoded = image::load_from_memory_with_format(bytes, format.image_format())
            .map_err(|e| Error::ImageDecode(format!("{format}: {e}")))?;
        let image = MemoryImage {
            id: doc.images.len(),
            format,
            width: decoded.width(),
            height: decoded.height(),
        };
        doc.images.push(image);
        Ok(image)
    }

    fn image_size(&self, image: &MemoryImage) -> (u32, u32) {
        (image.width, image.height)
    }

    fn add_page(&self, doc: &mut MemoryDocument, size: PageSize) -> Result<PageIndex> {
        self.record("add_page");
        doc.pages.push(MemoryPage::new(format!("blank{}", doc.pages.len() + 1), size));
        Ok(PageIndex::new(doc.pages.len() - 1))
    }

    fn draw_image(
        &self,
        doc: &mut MemoryDocument,
        page: PageIndex,
        image: &MemoryImage,
        placement: &ImagePlacement,
    ) -> Result<()> {
        self.record("draw_image");
        doc.page_mut(page)?.images.push(DrawnImage {
            image: *image,
            placement: *placement,
        });
        Ok(())
    }

    fn optimize_structure(&self, bytes: &[u8], options: OptimizeOptions) -> Result<OptimizedPdf> {
        self.record("optimize_structure");
        let doc = MemoryDocument::from_bytes(bytes)?;
        let output = if self.empty_optimization {
            Vec::new()
        } else {
            doc.to_bytes()?
        };
        let stats = options.collect_stats.then(|| OptimizationStats {
            original_size: bytes.len(),
            optimized_size: output.len(),
            objects_before: doc.pages.len(),
            objects_after: doc.pages.len(),
            streams_deduplicated: 0,
        });
        Ok(OptimizedPdf { bytes: output, stats })
    }

    fn serialize(&self, doc: &mut MemoryDocument) -> Result<Vec<u8>> {
        self.record("serialize");
        doc.to_bytes()
    }
}
