mod font;
mod jpeg;
mod lopdf_provider;
mod memory;
mod page_index;
mod provider;

pub use font::{StandardFont, encode_win_ansi};
pub use jpeg::JpegHeader;
pub use lopdf_provider::{LopdfDocument, LopdfFont, LopdfImage, LopdfPage, LopdfProvider};
pub use memory::{
    DrawnImage, MEMORY_PDF_HEADER, MemoryDocument, MemoryImage, MemoryPage, MemoryProvider,
};
pub use page_index::PageIndex;
pub use provider::{
    ImagePlacement, OptimizationStats, OptimizeOptions, OptimizedPdf, PageSize, PdfProvider,
    RasterFormat, Rect, TextRun,
};
