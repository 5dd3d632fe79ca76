//! Translation of 1-based page selections into checked 0-based indices.

use std::fmt;

use crate::error::{Error, Result};
use crate::pdf::PageIndex;

/// Map 1-based page numbers to 0-based indices, keeping order and duplicates.
///
/// No upper bound is checked; see [`check_in_document`].
pub fn to_zero_based(pages: &[i64]) -> Result<Vec<PageIndex>> {
    if pages.is_empty() {
        return Err(Error::EmptySelection);
    }
    pages.iter().map(|&p| PageIndex::from_page_number(p)).collect()
}

/// Fail with `PageOutOfRange` on the first index outside `[0, total)`.
pub fn check_in_document(indices: &[PageIndex], total: usize) -> Result<()> {
    for index in indices {
        index.check_bounds(total)?;
    }
    Ok(())
}

/// Check that `order` is a bijection over `[0, total)`.
///
/// Elements are checked in order, each one first against the page count and
/// then for repetition. The length of the order is compared last. Errors
/// carry 1-based page numbers.
pub fn validate_permutation(order: &[PageIndex], total: usize) -> Result<()> {
    let mut seen = vec![false; total];
    for index in order {
        let i = index.as_usize();
        if i >= total {
            return Err(Error::InvalidPermutation {
                page: index.page_number(),
                total,
            });
        }
        if seen[i] {
            return Err(Error::DuplicatePage {
                page: index.page_number(),
            });
        }
        seen[i] = true;
    }
    if order.len() != total {
        return Err(Error::PermutationLength {
            expected: total,
            actual: order.len(),
        });
    }
    Ok(())
}

/// An inclusive span of pages, always stored with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: PageIndex,
    end: PageIndex,
}

impl PageRange {
    /// Build a range, swapping reversed endpoints.
    pub fn new(a: PageIndex, b: PageIndex) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Build a range from 1-based page numbers.
    pub fn from_page_numbers(start: i64, end: i64) -> Result<Self> {
        Ok(Self::new(
            PageIndex::from_page_number(start)?,
            PageIndex::from_page_number(end)?,
        ))
    }

    pub const fn start(self) -> PageIndex {
        self.start
    }

    pub const fn end(self) -> PageIndex {
        self.end
    }

    /// Number of pages covered.
    pub const fn len(self) -> usize {
        self.end.as_usize() - self.start.as_usize() + 1
    }

    pub const fn is_empty(self) -> bool {
        false
    }

    /// Fail with `RangeOutOfBounds` unless both ends lie in `[0, total)`.
    pub const fn check_bounds(self, total: usize) -> Result<Self> {
        if self.end.as_usize() >= total {
            return Err(Error::RangeOutOfBounds {
                start: self.start.page_number(),
                end: self.end.page_number(),
                total,
            });
        }
        Ok(self)
    }

    /// Indices covered, ascending.
    pub fn indices(self) -> impl Iterator<Item = PageIndex> {
        (self.start.as_usize()..=self.end.as_usize()).map(PageIndex::new)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.page_number(), self.end.page_number())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn idx(values: &[usize]) -> Vec<PageIndex> {
        values.iter().copied().map(PageIndex::new).collect()
    }

    #[test]
    fn test_to_zero_based_shifts_every_element() {
        let pages = [3, 1, 3, 10];
        let out = to_zero_based(&pages).unwrap();
        for (p, i) in pages.iter().zip(&out) {
            assert_eq!(i.as_usize() as i64, p - 1);
        }
    }

    #[test]
    fn test_to_zero_based_errors() {
        assert!(matches!(to_zero_based(&[]), Err(Error::EmptySelection)));
        assert!(matches!(
            to_zero_based(&[0, -1]),
            Err(Error::NonPositivePage { page: 0 })
        ));
        assert!(matches!(
            to_zero_based(&[2, -1]),
            Err(Error::NonPositivePage { page: -1 })
        ));
    }

    #[test]
    fn test_check_in_document() {
        assert!(check_in_document(&idx(&[0, 3]), 4).is_ok());
        assert!(matches!(
            check_in_document(&idx(&[0, 4]), 4),
            Err(Error::PageOutOfRange { page: 5, total: 4 })
        ));
    }

    #[test]
    fn test_permutation_accepts_bijection() {
        assert!(validate_permutation(&idx(&[2, 0, 1]), 3).is_ok());
    }

    #[test]
    fn test_permutation_out_of_range_before_duplicate() {
        // Page 4 does not exist in a 3-page document even though page 1 repeats later
        assert!(matches!(
            validate_permutation(&idx(&[3, 0, 0]), 3),
            Err(Error::InvalidPermutation { page: 4, total: 3 })
        ));
        assert!(matches!(
            validate_permutation(&idx(&[1, 1, 0]), 3),
            Err(Error::DuplicatePage { page: 2 })
        ));
    }

    #[test]
    fn test_permutation_length_mismatch() {
        assert!(matches!(
            validate_permutation(&idx(&[1, 0]), 3),
            Err(Error::PermutationLength { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_short_order_of_existing_pages_reports_length() {
        // Pages 5, 4 and 3 all exist in a 5-page document
        assert!(matches!(
            validate_permutation(&idx(&[4, 3, 2]), 5),
            Err(Error::PermutationLength { expected: 5, actual: 3 })
        ));
        assert!(matches!(
            validate_permutation(&idx(&[5, 0, 1]), 5),
            Err(Error::InvalidPermutation { page: 6, total: 5 })
        ));
    }

    #[test]
    fn test_range_normalizes_reversed_endpoints() {
        let range = PageRange::from_page_numbers(3, 1).unwrap();
        assert_eq!(range.start(), PageIndex::new(0));
        assert_eq!(range.end(), PageIndex::new(2));
        assert_eq!(range.len(), 3);
        assert_eq!(range.to_string(), "1-3");
    }

    #[test]
    fn test_range_bounds() {
        let range = PageRange::from_page_numbers(4, 6).unwrap();
        assert!(matches!(
            range.check_bounds(5),
            Err(Error::RangeOutOfBounds { start: 4, end: 6, total: 5 })
        ));
        assert!(range.check_bounds(6).is_ok());
        assert!(matches!(
            PageRange::from_page_numbers(0, 2),
            Err(Error::NonPositivePage { page: 0 })
        ));
    }

    #[test]
    fn test_range_indices_ascending() {
        let range = PageRange::new(PageIndex::new(4), PageIndex::new(2));
        assert_eq!(range.indices().collect::<Vec<_>>(), idx(&[2, 3, 4]));
    }
}
