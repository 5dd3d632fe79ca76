//! The PDF object model boundary.
//!
//! The engine never touches PDF syntax. Everything it needs from a PDF
//! library is expressed by [`PdfProvider`]: parse, count and measure pages,
//! copy pages between documents, embed fonts and images, draw, optimize and
//! serialize. `LopdfProvider` implements it on top of lopdf; `MemoryProvider`
//! is a deterministic fake that records every call for tests.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::RgbColor;

use super::font::StandardFont;
use super::page_index::PageIndex;

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: Self = Self::new(595.28, 841.89);
    /// US Letter portrait, the fallback when a page declares no MediaBox.
    pub const LETTER: Self = Self::new(612.0, 792.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in page space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Raster formats the providers can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    /// Guess the format from a file name extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = std::path::Path::new(name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// The other supported format, tried when the first one fails to embed.
    pub const fn other(self) -> Self {
        match self {
            Self::Png => Self::Jpeg,
            Self::Jpeg => Self::Png,
        }
    }

    pub(crate) const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

impl std::fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => f.write_str("PNG"),
            Self::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// One fully placed run of overlay text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    /// Baseline origin of the text
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: RgbColor,
    /// Counter-clockwise rotation around the origin, in degrees
    pub rotation_degrees: f32,
    pub opacity: f32,
}

/// Where and how big an embedded image is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub rect: Rect,
    /// Drawing is clipped to this area when set
    pub clip: Option<Rect>,
}

/// Provider-level options for structural optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptimizeOptions {
    pub collect_stats: bool,
}

/// Before/after figures reported by structural optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub original_size: usize,
    pub optimized_size: usize,
    pub objects_before: usize,
    pub objects_after: usize,
    pub streams_deduplicated: usize,
}

impl OptimizationStats {
    /// Fraction of bytes saved, 0.0 when nothing was saved.
    #[allow(clippy::cast_precision_loss)]
    pub fn savings_ratio(&self) -> f64 {
        if self.original_size == 0 || self.optimized_size >= self.original_size {
            return 0.0;
        }
        (self.original_size - self.optimized_size) as f64 / self.original_size as f64
    }
}

/// Result of `optimize_structure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedPdf {
    pub bytes: Vec<u8>,
    pub stats: Option<OptimizationStats>,
}

/// Functional surface the engine needs from a PDF object model.
///
/// Documents passed by shared reference are sources and are never modified.
/// Every mutation goes through a `&mut Self::Document` that the engine itself
/// created with [`PdfProvider::create_empty`].
pub trait PdfProvider {
    type Document;
    /// A page copied out of a source, ready to be appended to a target
    type PageHandle;
    type FontHandle;
    type ImageHandle;

    /// Parse bytes into a document. Fails on structurally invalid PDFs.
    fn parse(&self, bytes: &[u8]) -> Result<Self::Document>;

    fn page_count(&self, doc: &Self::Document) -> usize;

    fn page_size(&self, doc: &Self::Document, page: PageIndex) -> Result<PageSize>;

    fn create_empty(&self) -> Result<Self::Document>;

    /// Copy pages of `source` for use in `target`, one handle per index, in
    /// order. Repeated indices yield distinct handles.
    fn copy_pages(
        &self,
        target: &mut Self::Document,
        source: &Self::Document,
        indices: &[PageIndex],
    ) -> Result<Vec<Self::PageHandle>>;

    fn append_page(&self, doc: &mut Self::Document, page: Self::PageHandle) -> Result<()>;

    fn embed_standard_font(
        &self,
        doc: &mut Self::Document,
        font: StandardFont,
    ) -> Result<Self::FontHandle>;

    fn measure_text_width(&self, font: &Self::FontHandle, text: &str, font_size: f32) -> f32;

    fn draw_text(
        &self,
        doc: &mut Self::Document,
        page: PageIndex,
        font: &Self::FontHandle,
        run: &TextRun,
    ) -> Result<()>;

    /// Embed a raster image. Fails when the bytes are not of `format`.
    fn embed_raster_image(
        &self,
        doc: &mut Self::Document,
        bytes: &[u8],
        format: RasterFormat,
    ) -> Result<Self::ImageHandle>;

    /// Pixel dimensions of an embedded image.
    fn image_size(&self, image: &Self::ImageHandle) -> (u32, u32);

    /// Append a blank page and return its index.
    fn add_page(&self, doc: &mut Self::Document, size: PageSize) -> Result<PageIndex>;

    fn draw_image(
        &self,
        doc: &mut Self::Document,
        page: PageIndex,
        image: &Self::ImageHandle,
        placement: &ImagePlacement,
    ) -> Result<()>;

    /// Lossless structural optimization of a serialized PDF.
    fn optimize_structure(&self, bytes: &[u8], options: OptimizeOptions) -> Result<OptimizedPdf>;

    fn serialize(&self, doc: &mut Self::Document) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_format_from_filename() {
        assert_eq!(RasterFormat::from_filename("scan.PNG"), Some(RasterFormat::Png));
        assert_eq!(RasterFormat::from_filename("photo.jpeg"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_filename("photo.JPG"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_filename("notes.txt"), None);
        assert_eq!(RasterFormat::from_filename("noext"), None);
    }

    #[test]
    fn test_raster_format_other() {
        assert_eq!(RasterFormat::Png.other(), RasterFormat::Jpeg);
        assert_eq!(RasterFormat::Jpeg.other(), RasterFormat::Png);
    }

    #[test]
    fn test_savings_ratio() {
        let stats = OptimizationStats {
            original_size: 1000,
            optimized_size: 750,
            ..Default::default()
        };
        assert!((stats.savings_ratio() - 0.25).abs() < 1e-9);

        let grew = OptimizationStats {
            original_size: 100,
            optimized_size: 120,
            ..Default::default()
        };
        assert!(grew.savings_ratio().abs() < f64::EPSILON);
    }
}
