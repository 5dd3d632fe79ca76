//! The document transformation engine.
//!
//! Every operation takes raw bytes plus 1-based selections and returns new
//! bytes. The flow is always the same: validate the input, translate the
//! selection, plan the composition against the parsed page count, then drive
//! the provider. Source documents are only read; output is always a freshly
//! created document.

pub mod compose;
pub mod compress;
pub mod layout;
pub mod overlay;
pub mod selection;
pub mod validate;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::options::{
    CompressionOptions, ImagePlacementOptions, PageNumberOptions, WatermarkOptions,
};
use crate::pdf::{PageIndex, PageSize, PdfProvider, RasterFormat};

pub use compress::CompressionOutcome;
pub use overlay::{Overlay, PageGeometry};
pub use selection::PageRange;
pub use validate::{looks_like_pdf, validate_pdf_bytes};

/// Transformation engine over a PDF provider.
#[derive(Debug, Clone, Default)]
pub struct Engine<P> {
    provider: P,
}

impl<P: PdfProvider> Engine<P> {
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Validate, parse and count pages. Fails with `NoPages` for an empty
    /// page tree.
    pub fn validated_page_count(&self, bytes: &[u8]) -> Result<usize> {
        validate_pdf_bytes(bytes)?;
        let doc = self.provider.parse(bytes)?;
        match self.provider.page_count(&doc) {
            0 => Err(Error::NoPages),
            count => Ok(count),
        }
    }

    /// Size of every page, in order.
    pub fn page_sizes(&self, bytes: &[u8]) -> Result<Vec<PageSize>> {
        validate_pdf_bytes(bytes)?;
        let doc = self.provider.parse(bytes)?;
        PageIndex::all(self.provider.page_count(&doc))
            .map(|index| self.provider.page_size(&doc, index))
            .collect()
    }

    // =========================================================================
    // Page composition
    // =========================================================================

    /// Keep the selected pages, in the given order. Duplicates are allowed.
    pub fn extract(&self, bytes: &[u8], pages: &[i64]) -> Result<Vec<u8>> {
        validate_pdf_bytes(bytes)?;
        let selection = selection::to_zero_based(pages)?;

        let source = self.provider.parse(bytes)?;
        let total = self.provider.page_count(&source);
        let plan = compose::plan_extract(selection, total)?;

        info!("Extracting {} of {} page(s)", plan.len(), total);
        self.compose_single(&source, &plan)
    }

    /// Drop the selected pages, keeping the rest in order.
    pub fn delete(&self, bytes: &[u8], pages: &[i64]) -> Result<Vec<u8>> {
        validate_pdf_bytes(bytes)?;
        let selection = selection::to_zero_based(pages)?;

        let source = self.provider.parse(bytes)?;
        let total = self.provider.page_count(&source);
        let plan = compose::plan_delete(&selection, total)?;

        info!("Deleting {} of {} page(s)", total - plan.len(), total);
        self.compose_single(&source, &plan)
    }

    /// Rearrange pages following a 1-based permutation.
    pub fn reorder(&self, bytes: &[u8], order: &[i64]) -> Result<Vec<u8>> {
        validate_pdf_bytes(bytes)?;
        let order = selection::to_zero_based(order)?;

        let source = self.provider.parse(bytes)?;
        let total = self.provider.page_count(&source);
        let plan = compose::plan_reorder(order, total)?;

        info!("Reordering {} page(s)", total);
        self.compose_single(&source, &plan)
    }

    /// Produce one document per 1-based inclusive `(start, end)` range.
    pub fn split_by_ranges(&self, bytes: &[u8], ranges: &[(i64, i64)]) -> Result<Vec<Vec<u8>>> {
        validate_pdf_bytes(bytes)?;
        if ranges.is_empty() {
            return Err(Error::EmptyRanges);
        }
        let ranges = ranges
            .iter()
            .map(|&(start, end)| PageRange::from_page_numbers(start, end))
            .collect::<Result<Vec<_>>>()?;

        let source = self.provider.parse(bytes)?;
        let total = self.provider.page_count(&source);
        let parts = compose::plan_split(&ranges, total)?;

        info!("Splitting {} page(s) into {} part(s)", total, parts.len());
        parts
            .iter()
            .zip(&ranges)
            .map(|(plan, range)| {
                debug!("Writing part for pages {}", range);
                self.compose_single(&source, plan)
            })
            .collect()
    }

    /// Concatenate all pages of at least two documents, in input order.
    pub fn merge<B: AsRef<[u8]>>(&self, inputs: &[B]) -> Result<Vec<u8>> {
        if inputs.len() < 2 {
            return Err(Error::NotEnoughDocuments { count: inputs.len() });
        }
        for input in inputs {
            validate_pdf_bytes(input.as_ref())?;
        }

        let sources = inputs
            .iter()
            .map(|input| self.provider.parse(input.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let counts: Vec<usize> = sources.iter().map(|doc| self.provider.page_count(doc)).collect();
        let plan = compose::plan_merge(&counts)?;

        info!(
            "Merging {} document(s), {} page(s) total",
            sources.len(),
            counts.iter().sum::<usize>()
        );

        let mut target = self.provider.create_empty()?;
        for (position, pages) in &plan {
            debug!("Appending {} page(s) of document {}", pages.len(), position + 1);
            self.append_pages(&mut target, &sources[*position], pages)?;
        }
        self.provider.serialize(&mut target)
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// Stamp the same text watermark on every page.
    pub fn add_watermark(&self, bytes: &[u8], options: &WatermarkOptions) -> Result<Vec<u8>> {
        info!("Adding watermark \"{}\"", options.text);
        self.apply_overlay(bytes, &Overlay::Watermark(options.clone()))
    }

    /// Label every page with its number.
    pub fn add_page_numbers(&self, bytes: &[u8], options: &PageNumberOptions) -> Result<Vec<u8>> {
        info!("Adding page numbers at {}", options.position);
        self.apply_overlay(bytes, &Overlay::PageNumber(options.clone()))
    }

    fn apply_overlay(&self, bytes: &[u8], overlay: &Overlay) -> Result<Vec<u8>> {
        validate_pdf_bytes(bytes)?;
        let source = self.provider.parse(bytes)?;
        let total = self.provider.page_count(&source);

        let mut target = self.provider.create_empty()?;
        let all: Vec<PageIndex> = PageIndex::all(total).collect();
        self.append_pages(&mut target, &source, &all)?;

        let font = self.provider.embed_standard_font(&mut target, overlay.font())?;
        for index in all {
            let size = self.provider.page_size(&target, index)?;
            let page = PageGeometry { size, index, total };
            let run = overlay.place(&page, |text, font_size| {
                self.provider.measure_text_width(&font, text, font_size)
            });
            debug!(
                "Page {}: \"{}\" at ({:.1}, {:.1})",
                index.page_number(),
                run.text,
                run.x,
                run.y
            );
            self.provider.draw_text(&mut target, index, &font, &run)?;
        }

        info!("Overlay applied to {} page(s)", total);
        self.provider.serialize(&mut target)
    }

    // =========================================================================
    // Image conversion
    // =========================================================================

    /// Turn one PNG or JPEG image into a single-page document.
    ///
    /// The format is guessed from `file_name` (PNG when unknown). If embedding
    /// fails the other format is tried before giving up.
    pub fn image_to_pdf(
        &self,
        image_bytes: &[u8],
        file_name: &str,
        options: &ImagePlacementOptions,
        max_bytes: u64,
    ) -> Result<Vec<u8>> {
        if image_bytes.is_empty() {
            return Err(Error::EmptyInput);
        }
        let size = u64::try_from(image_bytes.len()).unwrap_or(u64::MAX);
        if size > max_bytes {
            return Err(Error::ImageTooLarge { size, max: max_bytes });
        }
        layout::validate_margin(options.margin_mm)?;

        let mut doc = self.provider.create_empty()?;
        let guessed = RasterFormat::from_filename(file_name).unwrap_or(RasterFormat::Png);
        let handle = match self.provider.embed_raster_image(&mut doc, image_bytes, guessed) {
            Ok(handle) => handle,
            Err(first) => {
                debug!(
                    "Embedding {} as {} failed ({}), retrying as {}",
                    file_name,
                    guessed,
                    first,
                    guessed.other()
                );
                self.provider
                    .embed_raster_image(&mut doc, image_bytes, guessed.other())
                    .map_err(|second| {
                        Error::UnsupportedImageFormat(format!(
                            "{file_name} is neither PNG nor JPEG ({first}; {second})"
                        ))
                    })?
            }
        };

        let (width, height) = self.provider.image_size(&handle);
        let layout = layout::layout_image(width, height, options)?;
        info!(
            "Converting {}x{} image to a {:.0}x{:.0}pt page",
            width, height, layout.page.width, layout.page.height
        );

        let page = self.provider.add_page(&mut doc, layout.page)?;
        self.provider.draw_image(&mut doc, page, &handle, &layout.placement)?;
        self.provider.serialize(&mut doc)
    }

    // =========================================================================
    // Compression
    // =========================================================================

    /// Lossless structural compression.
    pub fn compress(&self, bytes: &[u8], options: CompressionOptions) -> Result<CompressionOutcome> {
        validate_pdf_bytes(bytes)?;
        let optimized = self
            .provider
            .optimize_structure(bytes, compress::optimize_options(options))?;
        let outcome = compress::check_output(optimized)?;

        info!("Compressed {} -> {} bytes", bytes.len(), outcome.bytes.len());
        if let Some(stats) = &outcome.stats {
            debug!(
                "Objects {} -> {}, {} duplicate stream(s) merged",
                stats.objects_before, stats.objects_after, stats.streams_deduplicated
            );
        }
        Ok(outcome)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn compose_single(&self, source: &P::Document, plan: &[PageIndex]) -> Result<Vec<u8>> {
        let mut target = self.provider.create_empty()?;
        self.append_pages(&mut target, source, plan)?;
        self.provider.serialize(&mut target)
    }

    fn append_pages(
        &self,
        target: &mut P::Document,
        source: &P::Document,
        plan: &[PageIndex],
    ) -> Result<()> {
        for page in self.provider.copy_pages(target, source, plan)? {
            self.provider.append_page(target, page)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pdf::{MemoryDocument, MemoryProvider};

    fn engine() -> Engine<MemoryProvider> {
        Engine::new(MemoryProvider::new())
    }

    fn doc(prefix: &str, pages: usize) -> Vec<u8> {
        MemoryDocument::with_page_labels((1..=pages).map(|i| format!("{prefix}{i}")))
            .to_bytes()
            .unwrap()
    }

    fn labels(bytes: &[u8]) -> Vec<String> {
        MemoryDocument::from_bytes(bytes)
            .unwrap()
            .pages
            .into_iter()
            .map(|p| p.label)
            .collect()
    }

    #[test]
    fn test_extract_order_and_duplicates() {
        let out = engine().extract(&doc("A", 4), &[4, 2, 4]).unwrap();
        assert_eq!(labels(&out), vec!["A4", "A2", "A4"]);
    }

    #[test]
    fn test_selection_errors_precede_parsing() {
        let engine = engine();
        assert!(matches!(
            engine.extract(&doc("A", 2), &[0]),
            Err(Error::NonPositivePage { page: 0 })
        ));
        assert!(matches!(engine.delete(&doc("A", 2), &[]), Err(Error::EmptySelection)));
        assert!(engine.provider().calls().is_empty());
    }

    #[test]
    fn test_delete_all_produces_nothing() {
        let engine = engine();
        let result = engine.delete(&doc("A", 3), &[1, 2, 3]);
        assert!(matches!(result, Err(Error::ResultWouldBeEmpty)));
        assert_eq!(engine.provider().calls(), vec!["parse"]);
    }

    #[test]
    fn test_reorder_rejects_before_copy() {
        let engine = engine();
        assert!(matches!(
            engine.reorder(&doc("A", 3), &[1, 4, 2]),
            Err(Error::InvalidPermutation { page: 4, total: 3 })
        ));
        assert!(!engine.provider().calls().contains(&"copy_pages"));

        let out = engine.reorder(&doc("A", 3), &[2, 3, 1]).unwrap();
        assert_eq!(labels(&out), vec!["A2", "A3", "A1"]);
    }

    #[test]
    fn test_split_reversed_range() {
        let parts = engine().split_by_ranges(&doc("A", 5), &[(3, 1), (5, 5)]).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(labels(&parts[0]), vec!["A1", "A2", "A3"]);
        assert_eq!(labels(&parts[1]), vec!["A5"]);
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let out = engine().merge(&[doc("A", 3), doc("B", 2)]).unwrap();
        assert_eq!(labels(&out), vec!["A1", "A2", "A3", "B1", "B2"]);
    }

    #[test]
    fn test_merge_single_document_rejected_without_provider_calls() {
        let engine = engine();
        assert!(matches!(
            engine.merge(&[doc("A", 3)]),
            Err(Error::NotEnoughDocuments { count: 1 })
        ));
        assert!(matches!(
            engine.merge(&[doc("A", 1), b"nope".to_vec()]),
            Err(Error::NotAPdf)
        ));
        assert!(engine.provider().calls().is_empty());
    }

    #[test]
    fn test_page_number_labels() {
        let out = engine()
            .add_page_numbers(&doc("A", 4), &PageNumberOptions::default())
            .unwrap();
        let doc = MemoryDocument::from_bytes(&out).unwrap();
        let texts: Vec<&str> = doc.pages.iter().map(|p| p.texts[0].text.as_str()).collect();
        assert_eq!(texts, vec!["1/4", "2/4", "3/4", "4/4"]);
    }

    #[test]
    fn test_watermark_leaves_source_untouched() {
        let source = doc("A", 2);
        let before = source.clone();
        let out = engine().add_watermark(&source, &WatermarkOptions::default()).unwrap();
        assert_eq!(source, before);

        let doc = MemoryDocument::from_bytes(&out).unwrap();
        assert!(doc.pages.iter().all(|p| p.texts.len() == 1));
        assert_eq!(doc.fonts, vec![crate::pdf::StandardFont::HelveticaBold]);
    }

    #[test]
    fn test_page_numbers_in_courier_measure_with_courier() {
        use crate::pdf::{PageSize, StandardFont};

        let options = PageNumberOptions {
            font: StandardFont::Courier,
            ..PageNumberOptions::default()
        };
        let out = engine().add_page_numbers(&doc("A", 2), &options).unwrap();
        let doc = MemoryDocument::from_bytes(&out).unwrap();
        assert_eq!(doc.fonts, vec![StandardFont::Courier]);

        // "1/2" is three 600-unit glyphs at 12pt
        let run = &doc.pages[0].texts[0];
        assert!((run.x - (PageSize::A4.width - 40.0 - 21.6)).abs() < 1e-3);
    }

    #[test]
    fn test_validated_page_count() {
        let engine = engine();
        assert_eq!(engine.validated_page_count(&doc("A", 3)).unwrap(), 3);
        assert!(matches!(
            engine.validated_page_count(&MemoryDocument::default().to_bytes().unwrap()),
            Err(Error::NoPages)
        ));
        assert!(matches!(engine.validated_page_count(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_compress_postcondition() {
        let failing = Engine::new(MemoryProvider::with_empty_optimization());
        let result = failing.compress(&doc("A", 1), CompressionOptions::default());
        assert!(matches!(result, Err(Error::OptimizationProducedEmptyOutput)));

        let outcome = engine()
            .compress(&doc("A", 1), CompressionOptions { collect_stats: true })
            .unwrap();
        assert!(!outcome.bytes.is_empty());
        assert!(outcome.stats.is_some());
    }

    #[test]
    fn test_image_size_and_margin_checked_first() {
        let engine = engine();
        let options = ImagePlacementOptions::default();
        assert!(matches!(
            engine.image_to_pdf(&[0u8; 16], "a.png", &options, 8),
            Err(Error::ImageTooLarge { size: 16, max: 8 })
        ));
        let bad_margin = ImagePlacementOptions { margin_mm: 31.0, ..options };
        assert!(matches!(
            engine.image_to_pdf(&[0u8; 16], "a.png", &bad_margin, 1024),
            Err(Error::InvalidMargin { .. })
        ));
        assert!(engine.provider().calls().is_empty());
    }

    #[test]
    fn test_unsupported_image() {
        let options = ImagePlacementOptions::default();
        let result = engine().image_to_pdf(b"not an image", "a.png", &options, 1024);
        assert!(matches!(result, Err(Error::UnsupportedImageFormat(_))));
    }
}
