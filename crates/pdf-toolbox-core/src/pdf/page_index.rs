//! Page index newtype separating 0-based positions from 1-based page numbers.
//!
//! Page numbers typed by a user start at 1. Everything inside the engine and
//! the providers works with 0-based positions. `PageIndex` is the only type
//! that crosses into the core, and the constructors below are the only places
//! where the shift by one happens.

use std::fmt;

use crate::error::Error;

/// A 0-based page position inside a specific document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(usize);

impl PageIndex {
    /// Create a PageIndex from a 0-based value.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Translate a 1-based page number into a 0-based index.
    ///
    /// Fails with `NonPositivePage` when `page <= 0`. No upper bound is checked
    /// here; that depends on the document the index will be used with.
    pub fn from_page_number(page: i64) -> Result<Self, Error> {
        if page <= 0 {
            return Err(Error::NonPositivePage { page });
        }
        let index = usize::try_from(page - 1).map_err(|_| Error::NonPositivePage { page })?;
        Ok(Self(index))
    }

    /// Get the index as usize for Rust collections.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Get the 1-based page number (also what lopdf's page map is keyed by).
    #[must_use]
    pub const fn page_number(self) -> usize {
        self.0 + 1
    }

    /// Get the 1-indexed page number for lopdf.
    pub fn as_lopdf_page_number(self) -> Result<u32, Error> {
        u32::try_from(self.0 + 1).map_err(|_| Error::PageOutOfRange {
            page: self.page_number(),
            total: u32::MAX as usize,
        })
    }

    /// Check the index against a document's page count.
    pub const fn check_bounds(self, total_pages: usize) -> Result<Self, Error> {
        if self.0 >= total_pages {
            return Err(Error::PageOutOfRange {
                page: self.0 + 1,
                total: total_pages,
            });
        }
        Ok(self)
    }

    /// All indices of a document, in order.
    pub fn all(total_pages: usize) -> impl Iterator<Item = Self> {
        (0..total_pages).map(Self)
    }
}

impl From<PageIndex> for usize {
    fn from(index: PageIndex) -> Self {
        index.0
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index_creation() {
        let idx = PageIndex::new(5);
        assert_eq!(idx.as_usize(), 5);
        assert_eq!(idx.page_number(), 6);
    }

    #[test]
    fn test_from_page_number() {
        assert_eq!(PageIndex::from_page_number(1).unwrap(), PageIndex::new(0));
        assert_eq!(PageIndex::from_page_number(12).unwrap(), PageIndex::new(11));
    }

    #[test]
    fn test_from_page_number_rejects_non_positive() {
        assert!(matches!(
            PageIndex::from_page_number(0),
            Err(Error::NonPositivePage { page: 0 })
        ));
        assert!(matches!(
            PageIndex::from_page_number(-3),
            Err(Error::NonPositivePage { page: -3 })
        ));
    }

    #[test]
    fn test_check_bounds() {
        assert_eq!(PageIndex::new(4).check_bounds(5).unwrap(), PageIndex::new(4));
        assert!(matches!(
            PageIndex::new(5).check_bounds(5),
            Err(Error::PageOutOfRange { page: 6, total: 5 })
        ));
    }

    #[test]
    fn test_all() {
        let all: Vec<usize> = PageIndex::all(3).map(PageIndex::as_usize).collect();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn test_display() {
        let idx = PageIndex::new(7);
        assert_eq!(format!("{idx}"), "7");
    }

    #[test]
    fn test_as_lopdf_page_number() {
        assert_eq!(PageIndex::new(0).as_lopdf_page_number().unwrap(), 1);
        assert_eq!(PageIndex::new(5).as_lopdf_page_number().unwrap(), 6);
    }
}
