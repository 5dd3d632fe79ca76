//! PDF Toolbox Core Library
//!
//! Page-level transformations of PDF documents, entirely in memory:
//! - Extract, delete, reorder, split and merge pages
//! - Text watermarks and page numbers
//! - Single raster image to PDF
//! - Lossless structural compression
//!
//! The [`Engine`] owns validation, page-number translation, composition
//! planning and overlay geometry. PDF syntax is delegated to a
//! [`PdfProvider`]: [`LopdfProvider`] for real documents, [`MemoryProvider`]
//! for deterministic tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod options;
pub mod pdf;
pub mod session;
pub mod util;

pub use config::{AppConfig, DEFAULT_MAX_IMAGE_BYTES};
pub use engine::{
    CompressionOutcome, Engine, Overlay, PageGeometry, PageRange, looks_like_pdf,
    validate_pdf_bytes,
};
pub use error::{Error, ErrorKind, Result};
pub use export::{format_bytes, image_output_name, normalize_pdf_filename, split_part_name};
pub use options::{
    CompressionOptions, FitMode, ImagePlacementOptions, PageNumberOptions, PagePosition,
    PageSizing, RgbColor, WatermarkOptions, WatermarkPlacement,
};
pub use pdf::{
    LopdfProvider, MemoryDocument, MemoryProvider, OptimizationStats, PageIndex, PageSize,
    PdfProvider, RasterFormat, StandardFont,
};
pub use session::{DocumentSession, Fingerprint};

/// The engine backed by lopdf.
pub type PdfToolbox = Engine<LopdfProvider>;

impl PdfToolbox {
    pub const fn with_lopdf() -> Self {
        Self::new(LopdfProvider::new())
    }
}
