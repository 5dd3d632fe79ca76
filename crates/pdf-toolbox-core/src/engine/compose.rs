//! Page composition plans.
//!
//! Each function decides which source pages go into which output document and
//! in which order. Inputs are already translated to 0-based indices; plans
//! only add the checks that need the page count. Nothing here touches a
//! provider, so every check runs before the first page copy.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::pdf::PageIndex;

use super::selection::{PageRange, check_in_document, validate_permutation};

/// Selected pages in caller order. Duplicates are kept.
pub fn plan_extract(selection: Vec<PageIndex>, total: usize) -> Result<Vec<PageIndex>> {
    if selection.is_empty() {
        return Err(Error::EmptySelection);
    }
    check_in_document(&selection, total)?;
    Ok(selection)
}

/// Every page not selected, in original order.
pub fn plan_delete(selection: &[PageIndex], total: usize) -> Result<Vec<PageIndex>> {
    if selection.is_empty() {
        return Err(Error::EmptySelection);
    }
    check_in_document(selection, total)?;

    let remove: HashSet<PageIndex> = selection.iter().copied().collect();
    let keep: Vec<PageIndex> = PageIndex::all(total)
        .filter(|i| !remove.contains(i))
        .collect();

    if keep.is_empty() {
        return Err(Error::ResultWouldBeEmpty);
    }
    Ok(keep)
}

/// Pages visited in permutation order.
pub fn plan_reorder(order: Vec<PageIndex>, total: usize) -> Result<Vec<PageIndex>> {
    validate_permutation(&order, total)?;
    Ok(order)
}

/// One ascending page list per range, in input order.
pub fn plan_split(ranges: &[PageRange], total: usize) -> Result<Vec<Vec<PageIndex>>> {
    if ranges.is_empty() {
        return Err(Error::EmptyRanges);
    }
    ranges
        .iter()
        .map(|range| Ok(range.check_bounds(total)?.indices().collect()))
        .collect()
}

/// Every page of every document, documents in input order.
///
/// Returns `(document position, page indices)` pairs.
pub fn plan_merge(page_counts: &[usize]) -> Result<Vec<(usize, Vec<PageIndex>)>> {
    if page_counts.len() < 2 {
        return Err(Error::NotEnoughDocuments {
            count: page_counts.len(),
        });
    }
    Ok(page_counts
        .iter()
        .enumerate()
        .map(|(doc, &count)| (doc, PageIndex::all(count).collect()))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::selection::to_zero_based;
    use super::*;

    fn numbers(plan: &[PageIndex]) -> Vec<usize> {
        plan.iter().map(|i| i.page_number()).collect()
    }

    fn ranges(pairs: &[(i64, i64)]) -> Vec<PageRange> {
        pairs
            .iter()
            .map(|&(a, b)| PageRange::from_page_numbers(a, b).unwrap())
            .collect()
    }

    #[test]
    fn test_extract_keeps_order_and_duplicates() {
        let plan = plan_extract(to_zero_based(&[3, 1, 3]).unwrap(), 4).unwrap();
        assert_eq!(numbers(&plan), vec![3, 1, 3]);
    }

    #[test]
    fn test_extract_out_of_range() {
        assert!(matches!(
            plan_extract(to_zero_based(&[1, 5]).unwrap(), 4),
            Err(Error::PageOutOfRange { page: 5, total: 4 })
        ));
        assert!(matches!(plan_extract(Vec::new(), 4), Err(Error::EmptySelection)));
    }

    #[test]
    fn test_full_extract_is_identity() {
        let all: Vec<i64> = (1..=5).collect();
        let plan = plan_extract(to_zero_based(&all).unwrap(), 5).unwrap();
        assert_eq!(numbers(&plan), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_delete_is_complement_of_extract() {
        let total = 6;
        let deleted = [2, 5, 2];
        let kept = plan_delete(&to_zero_based(&deleted).unwrap(), total).unwrap();

        let complement: Vec<i64> = (1..=6).filter(|p| !deleted.contains(p)).collect();
        let extracted = plan_extract(to_zero_based(&complement).unwrap(), total).unwrap();
        assert_eq!(kept, extracted);
    }

    #[test]
    fn test_delete_everything_fails() {
        assert!(matches!(
            plan_delete(&to_zero_based(&[3, 2, 1]).unwrap(), 3),
            Err(Error::ResultWouldBeEmpty)
        ));
    }

    #[test]
    fn test_delete_out_of_range() {
        assert!(matches!(
            plan_delete(&to_zero_based(&[4]).unwrap(), 3),
            Err(Error::PageOutOfRange { page: 4, total: 3 })
        ));
    }

    #[test]
    fn test_reorder() {
        let plan = plan_reorder(to_zero_based(&[3, 1, 2]).unwrap(), 3).unwrap();
        assert_eq!(numbers(&plan), vec![3, 1, 2]);
        assert!(matches!(
            plan_reorder(to_zero_based(&[1, 2]).unwrap(), 3),
            Err(Error::PermutationLength { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            plan_reorder(to_zero_based(&[1, 1, 2]).unwrap(), 3),
            Err(Error::DuplicatePage { page: 1 })
        ));
    }

    #[test]
    fn test_split_normalizes_reversed_range() {
        let parts = plan_split(&ranges(&[(3, 1)]), 5).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(numbers(&parts[0]), vec![1, 2, 3]);
    }

    #[test]
    fn test_split_preserves_range_order() {
        let parts = plan_split(&ranges(&[(4, 5), (1, 1), (2, 3)]), 5).unwrap();
        let parts: Vec<Vec<usize>> = parts.iter().map(|p| numbers(p)).collect();
        assert_eq!(parts, vec![vec![4, 5], vec![1], vec![2, 3]]);
    }

    #[test]
    fn test_split_errors() {
        assert!(matches!(plan_split(&[], 5), Err(Error::EmptyRanges)));
        assert!(matches!(
            plan_split(&ranges(&[(1, 2), (5, 7)]), 5),
            Err(Error::RangeOutOfBounds { start: 5, end: 7, total: 5 })
        ));
    }

    #[test]
    fn test_merge_plan() {
        let plan = plan_merge(&[3, 2]).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].0, 0);
        assert_eq!(numbers(&plan[0].1), vec![1, 2, 3]);
        assert_eq!(numbers(&plan[1].1), vec![1, 2]);
        assert!(matches!(
            plan_merge(&[3]),
            Err(Error::NotEnoughDocuments { count: 1 })
        ));
    }
}
