use thiserror::Error;

/// Unified error type for pdf-toolbox-core
///
/// Variants are grouped by where they arise:
/// - Input validation (bytes, page selections, ranges, images), always
///   detected before the provider mutates anything
/// - Provider failures (parse, compose, serialize), propagated unchanged
/// - Postconditions violated after an otherwise successful sequence of steps
/// - Session, configuration and general I/O
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// The byte buffer is empty
    #[error("empty input: no bytes were provided")]
    EmptyInput,

    /// The byte buffer does not start with the `%PDF-` signature
    #[error("input does not look like a PDF (missing %PDF- signature)")]
    NotAPdf,

    /// No pages were selected
    #[error("no pages selected")]
    EmptySelection,

    /// A 1-based page number was zero or negative
    #[error("page numbers must be >= 1 (got {page})")]
    NonPositivePage { page: i64 },

    /// A selected page does not exist in the document
    #[error("page {page} does not exist (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// A permutation references a page outside the document
    #[error("invalid order: page {page} does not exist (document has {total} pages)")]
    InvalidPermutation { page: usize, total: usize },

    /// A permutation visits the same page twice
    #[error("invalid order: page {page} appears more than once")]
    DuplicatePage { page: usize },

    /// A permutation does not cover every page
    #[error("invalid order: expected {expected} pages, got {actual}")]
    PermutationLength { expected: usize, actual: usize },

    /// Split was requested without any range
    #[error("no page ranges provided")]
    EmptyRanges,

    /// A split range reaches outside the document
    #[error("range {start}..{end} is out of bounds (document has {total} pages)")]
    RangeOutOfBounds { start: usize, end: usize, total: usize },

    /// Merge needs at least two documents
    #[error("at least 2 PDFs are required to merge (got {count})")]
    NotEnoughDocuments { count: usize },

    /// The raster image could not be embedded as PNG or JPEG
    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// Image margin outside the accepted range, or leaving no drawable area
    #[error("invalid margin {margin_mm}mm: {reason}")]
    InvalidMargin { margin_mm: f32, reason: String },

    /// The raster image exceeds the configured size limit
    #[error("image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: u64, max: u64 },

    /// The document parsed but has no pages
    #[error("the PDF does not contain any page")]
    NoPages,

    // ==========================================================================
    // Provider Errors
    // ==========================================================================
    /// Failed to parse a PDF
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// Error from the lopdf library while composing a document
    #[error("lopdf error: {0}")]
    Lopdf(String),

    /// Failed to serialize a PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// Failed to decode a raster image
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    // ==========================================================================
    // Postcondition Errors
    // ==========================================================================
    /// Every page was targeted for deletion
    #[error("operation would produce an empty document")]
    ResultWouldBeEmpty,

    /// Structural optimization returned nothing
    #[error("optimization produced an empty output")]
    OptimizationProducedEmptyOutput,

    // ==========================================================================
    // Session Errors
    // ==========================================================================
    /// A session query was made before any document was loaded
    #[error("no document loaded in session")]
    NoDocumentLoaded,

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure category, used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied something invalid; nothing was written
    Input,
    /// The PDF provider failed for a reason opaque to the engine
    Provider,
    /// An engine invariant was violated after the provider succeeded
    Postcondition,
    Session,
    Config,
    Io,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput
            | Self::NotAPdf
            | Self::EmptySelection
            | Self::NonPositivePage { .. }
            | Self::PageOutOfRange { .. }
            | Self::InvalidPermutation { .. }
            | Self::DuplicatePage { .. }
            | Self::PermutationLength { .. }
            | Self::EmptyRanges
            | Self::RangeOutOfBounds { .. }
            | Self::NotEnoughDocuments { .. }
            | Self::UnsupportedImageFormat(_)
            | Self::InvalidMargin { .. }
            | Self::ImageTooLarge { .. }
            | Self::NoPages => ErrorKind::Input,
            Self::PdfParse(_) | Self::Lopdf(_) | Self::PdfSave(_) | Self::ImageDecode(_) => {
                ErrorKind::Provider
            }
            Self::ResultWouldBeEmpty | Self::OptimizationProducedEmptyOutput => {
                ErrorKind::Postcondition
            }
            Self::NoDocumentLoaded => ErrorKind::Session,
            Self::ConfigLoad(_) | Self::ConfigInvalid { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
