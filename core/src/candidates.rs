//! Candidate paging over a match range.
//!
//! The pager is a stateless view: given the current match range, a page
//! index and a page size, it produces the visible slice and the page
//! bounds. The page index itself lives in the typing session; nothing
//! here holds state between calls.

use crate::table::Entry;
use std::ops::Range;

/// Total number of pages a range of `len` entries occupies.
pub fn num_pages(len: usize, page_size: usize) -> usize {
    if len == 0 {
        0
    } else {
        len.div_ceil(page_size.max(1))
    }
}

/// Table-index range of the visible page, clamped to the match range.
pub fn page_range(range: &Range<usize>, page: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = range
        .start
        .saturating_add(page.saturating_mul(size))
        .min(range.end);
    let end = start.saturating_add(size).min(range.end);
    start..end
}

/// The entries on the visible page.
pub fn page_entries<'a>(
    entries: &'a [Entry],
    range: &Range<usize>,
    page: usize,
    page_size: usize,
) -> &'a [Entry] {
    &entries[page_range(range, page, page_size)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry::new(format!("{}{}", (b'a' + (i / 26) as u8) as char, i), format!("候{}", i)))
            .collect()
    }

    #[test]
    fn test_num_pages() {
        assert_eq!(num_pages(0, 9), 0);
        assert_eq!(num_pages(1, 9), 1);
        assert_eq!(num_pages(9, 9), 1);
        assert_eq!(num_pages(10, 9), 2);
        assert_eq!(num_pages(11, 9), 2);
        assert_eq!(num_pages(19, 9), 3);
    }

    #[test]
    fn test_page_slices_eleven_entries() {
        let all = entries(11);
        let range = 0..11;
        let first = page_entries(&all, &range, 0, 9);
        assert_eq!(first.len(), 9);
        assert_eq!(first[0].text, "候0");
        assert_eq!(first[8].text, "候8");

        let second = page_entries(&all, &range, 1, 9);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].text, "候9");
        assert_eq!(second[1].text, "候10");
    }

    #[test]
    fn test_page_respects_range_offset() {
        let all = entries(20);
        let range = 5..12;
        assert_eq!(page_range(&range, 0, 3), 5..8);
        assert_eq!(page_range(&range, 1, 3), 8..11);
        assert_eq!(page_range(&range, 2, 3), 11..12);
        assert_eq!(page_entries(&all, &range, 1, 3)[0].text, "候8");
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let all = entries(4);
        let range = 0..4;
        assert!(page_entries(&all, &range, 5, 9).is_empty());
        assert_eq!(page_range(&range, usize::MAX, 9), 4..4);
    }

    #[test]
    fn test_page_size_floor() {
        // A zero page size behaves as one entry per page rather than dividing by zero.
        assert_eq!(num_pages(3, 0), 3);
        assert_eq!(page_range(&(0..3), 1, 0), 1..2);
    }
}
