//! Session-scoped handle on the document currently shown for preview.
//!
//! A session owns at most one parsed document. Access goes through an async
//! mutex, so concurrent preview requests never load two documents at once.
//! A cheap fingerprint decides whether a request refers to the document that
//! is already loaded.

use tokio::sync::Mutex;
use tracing::debug;

use crate::engine::validate_pdf_bytes;
use crate::error::{Error, Result};
use crate::pdf::{PageIndex, PageSize, PdfProvider};

/// Identity of a byte buffer: length plus the first and last four bytes.
///
/// Collisions are possible. It only has to tell apart files a user opens one
/// after another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub len: usize,
    pub head: u32,
    pub tail: u32,
}

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        let word = |slice: Option<&[u8]>| {
            slice
                .and_then(|s| <[u8; 4]>::try_from(s).ok())
                .map_or(0, u32::from_le_bytes)
        };
        Self {
            len: bytes.len(),
            head: word(bytes.get(..4)),
            tail: word(bytes.len().checked_sub(4).and_then(|start| bytes.get(start..))),
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:08x}:{:08x}", self.len, self.head, self.tail)
    }
}

struct Loaded<D> {
    fingerprint: Fingerprint,
    doc: D,
}

/// Exclusive owner of the currently loaded preview document.
pub struct DocumentSession<P: PdfProvider> {
    provider: P,
    loaded: Mutex<Option<Loaded<P::Document>>>,
}

impl<P: PdfProvider> DocumentSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            loaded: Mutex::new(None),
        }
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Make `bytes` the loaded document and return its page count.
    ///
    /// Nothing is parsed when the fingerprint matches the loaded document.
    /// Otherwise the previous document is released first, so a failed load
    /// leaves the session empty.
    pub async fn ensure_loaded(&self, bytes: &[u8]) -> Result<usize> {
        let fingerprint = Fingerprint::of(bytes);
        let mut guard = self.loaded.lock().await;

        if let Some(loaded) = guard.as_ref()
            && loaded.fingerprint == fingerprint
        {
            debug!("Document {} already loaded", fingerprint);
            return Ok(self.provider.page_count(&loaded.doc));
        }

        if guard.take().is_some() {
            debug!("Released previously loaded document");
        }

        validate_pdf_bytes(bytes)?;
        let doc = self.provider.parse(bytes)?;
        let count = self.provider.page_count(&doc);
        debug!("Loaded document {} with {} page(s)", fingerprint, count);
        *guard = Some(Loaded { fingerprint, doc });

        Ok(count)
    }

    pub async fn page_count(&self) -> Result<usize> {
        let guard = self.loaded.lock().await;
        let loaded = guard.as_ref().ok_or(Error::NoDocumentLoaded)?;
        Ok(self.provider.page_count(&loaded.doc))
    }

    pub async fn page_size(&self, page: PageIndex) -> Result<PageSize> {
        let guard = self.loaded.lock().await;
        let loaded = guard.as_ref().ok_or(Error::NoDocumentLoaded)?;
        let total = self.provider.page_count(&loaded.doc);
        self.provider.page_size(&loaded.doc, page.check_bounds(total)?)
    }

    /// Fingerprint of the loaded document, if any.
    pub async fn fingerprint(&self) -> Option<Fingerprint> {
        self.loaded.lock().await.as_ref().map(|l| l.fingerprint)
    }

    /// Release the loaded document. Does nothing when the session is empty.
    pub async fn unload(&self) {
        if self.loaded.lock().await.take().is_some() {
            debug!("Unloaded document");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pdf::{MemoryDocument, MemoryProvider};

    fn doc(pages: usize) -> Vec<u8> {
        MemoryDocument::with_page_labels((1..=pages).map(|i| format!("P{i}")))
            .to_bytes()
            .unwrap()
    }

    fn parse_calls(session: &DocumentSession<MemoryProvider>) -> usize {
        session.provider().calls().iter().filter(|c| **c == "parse").count()
    }

    #[test]
    fn test_fingerprint() {
        let fp = Fingerprint::of(b"%PDF-1.7 body %%EOF");
        assert_eq!(fp.len, 19);
        assert_eq!(fp.head, u32::from_le_bytes(*b"%PDF"));
        assert_eq!(fp.tail, u32::from_le_bytes(*b"%EOF"));

        let short = Fingerprint::of(b"abc");
        assert_eq!((short.len, short.head, short.tail), (3, 0, 0));
    }

    #[tokio::test]
    async fn test_queries_before_load_fail() {
        let session = DocumentSession::new(MemoryProvider::new());
        assert!(matches!(session.page_count().await, Err(Error::NoDocumentLoaded)));
        assert!(matches!(
            session.page_size(PageIndex::new(0)).await,
            Err(Error::NoDocumentLoaded)
        ));
    }

    #[tokio::test]
    async fn test_same_bytes_parse_once() {
        let session = DocumentSession::new(MemoryProvider::new());
        let bytes = doc(3);

        let (a, b) = tokio::join!(session.ensure_loaded(&bytes), session.ensure_loaded(&bytes));
        assert_eq!(a.unwrap(), 3);
        assert_eq!(b.unwrap(), 3);
        assert_eq!(parse_calls(&session), 1);
    }

    #[tokio::test]
    async fn test_new_bytes_replace_loaded_document() {
        let session = DocumentSession::new(MemoryProvider::new());
        session.ensure_loaded(&doc(3)).await.unwrap();
        assert_eq!(session.ensure_loaded(&doc(5)).await.unwrap(), 5);
        assert_eq!(session.page_count().await.unwrap(), 5);
        assert_eq!(parse_calls(&session), 2);

        let size = session.page_size(PageIndex::new(4)).await.unwrap();
        assert_eq!(size, PageSize::A4);
        assert!(matches!(
            session.page_size(PageIndex::new(5)).await,
            Err(Error::PageOutOfRange { page: 6, total: 5 })
        ));
    }

    #[tokio::test]
    async fn test_failed_load_leaves_session_empty() {
        let session = DocumentSession::new(MemoryProvider::new());
        session.ensure_loaded(&doc(2)).await.unwrap();
        assert!(session.ensure_loaded(b"%PDF-1.7 not memory").await.is_err());
        assert!(session.fingerprint().await.is_none());
    }

    #[tokio::test]
    async fn test_rejected_signature_also_leaves_session_empty() {
        let session = DocumentSession::new(MemoryProvider::new());
        session.ensure_loaded(&doc(2)).await.unwrap();
        assert!(matches!(
            session.ensure_loaded(b"GIF89a").await,
            Err(Error::NotAPdf)
        ));
        assert!(session.fingerprint().await.is_none());
        assert!(matches!(session.page_count().await, Err(Error::NoDocumentLoaded)));
        assert_eq!(parse_calls(&session), 1);
    }

    #[tokio::test]
    async fn test_unload() {
        let session = DocumentSession::new(MemoryProvider::new());
        session.ensure_loaded(&doc(2)).await.unwrap();
        session.unload().await;
        assert!(matches!(session.page_count().await, Err(Error::NoDocumentLoaded)));
        session.unload().await;
    }
}
