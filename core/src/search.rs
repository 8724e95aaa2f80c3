//! Prefix range search over a sorted entry table.
//!
//! Because the table is sorted lexicographically by code, every set of
//! entries whose code starts with a given prefix occupies one contiguous
//! half-open index interval. Both boundaries are found by independent
//! binary searches (`slice::partition_point`), so a lookup costs
//! O(log n) comparisons regardless of how many entries match.
//!
//! The upper-boundary predicate has to stay monotone while the bisection
//! moves through entries that do not match the prefix at all, so it
//! combines the prefix test with plain lexicographic order: an entry is
//! "before the end of the range" when it matches the prefix or sorts
//! before it. Entries matching a prefix always compare >= the prefix
//! itself and < any non-matching successor, which keeps the predicate
//! true-then-false over the whole table.

use crate::table::Entry;
use std::ops::Range;

/// Locate the half-open index range of entries whose code starts with
/// `prefix`.
///
/// Returns `None` when nothing matches ("dead code"). The empty prefix
/// matches every entry, so it returns the whole table range (and `None`
/// only for an empty table).
pub fn range_of(entries: &[Entry], prefix: &str) -> Option<Range<usize>> {
    let lo = entries.partition_point(|e| e.code.as_str() < prefix);
    if lo == entries.len() || !entries[lo].code.starts_with(prefix) {
        return None;
    }
    let hi = entries.partition_point(|e| e.code.starts_with(prefix) || e.code.as_str() < prefix);
    Some(lo..hi)
}

/// Locate the first entry whose code starts with `prefix`.
///
/// Equivalent to the lower boundary of [`range_of`], with the insertion
/// point verified against the entry it lands on (the search converges even
/// when no entry matches). Used for forced and automatic resolution, never
/// for interactive candidate display.
pub fn first_match(entries: &[Entry], prefix: &str) -> Option<usize> {
    let lo = entries.partition_point(|e| e.code.as_str() < prefix);
    if lo < entries.len() && entries[lo].code.starts_with(prefix) {
        Some(lo)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Entry> {
        // Sorted, with a duplicate code and prefix groups at both ends.
        vec![
            Entry::new("a", "甲"),
            Entry::new("ab", "乙"),
            Entry::new("ab", "二"),
            Entry::new("abc", "丙"),
            Entry::new("ad", "啊"),
            Entry::new("b", "丁"),
            Entry::new("ba", "八"),
            Entry::new("ca", "擦"),
        ]
    }

    #[test]
    fn test_range_basic() {
        let t = table();
        assert_eq!(range_of(&t, "a"), Some(0..5));
        assert_eq!(range_of(&t, "ab"), Some(1..4));
        assert_eq!(range_of(&t, "abc"), Some(3..4));
        assert_eq!(range_of(&t, "b"), Some(5..7));
    }

    #[test]
    fn test_range_duplicate_codes() {
        let t = table();
        let r = range_of(&t, "ab").unwrap();
        let texts: Vec<&str> = t[r].iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["乙", "二", "丙"]);
    }

    #[test]
    fn test_range_at_table_boundaries() {
        let t = table();
        // Group starting at index 0
        assert_eq!(range_of(&t, "a").unwrap().start, 0);
        // Group ending at the final index
        assert_eq!(range_of(&t, "c"), Some(7..8));
        assert_eq!(range_of(&t, "ca"), Some(7..8));
    }

    #[test]
    fn test_range_no_match() {
        let t = table();
        assert_eq!(range_of(&t, "ac"), None);
        assert_eq!(range_of(&t, "bb"), None);
        assert_eq!(range_of(&t, "z"), None);
        assert_eq!(range_of(&t, "abcd"), None);
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let t = table();
        assert_eq!(range_of(&t, ""), Some(0..t.len()));
        assert_eq!(range_of(&[], ""), None);
    }

    #[test]
    fn test_single_entry_table() {
        let t = vec![Entry::new("ka", "咔")];
        assert_eq!(range_of(&t, "k"), Some(0..1));
        assert_eq!(range_of(&t, "ka"), Some(0..1));
        assert_eq!(range_of(&t, "kab"), None);
        assert_eq!(range_of(&t, "j"), None);
        assert_eq!(range_of(&t, "l"), None);
    }

    #[test]
    fn test_extending_prefix_narrows_range() {
        let t = table();
        let mut prev: Option<Range<usize>> = None;
        for prefix in ["a", "ab", "abc"] {
            let r = range_of(&t, prefix).unwrap();
            if let Some(p) = prev {
                assert!(p.start <= r.start && r.end <= p.end);
            }
            prev = Some(r);
        }
    }

    #[test]
    fn test_first_match_agrees_with_range() {
        let t = table();
        for prefix in ["", "a", "ab", "abc", "ac", "b", "ba", "bb", "c", "z"] {
            match range_of(&t, prefix) {
                Some(r) => assert_eq!(first_match(&t, prefix), Some(r.start), "{}", prefix),
                None => assert_eq!(first_match(&t, prefix), None, "{}", prefix),
            }
        }
    }

    #[test]
    fn test_range_against_linear_scan() {
        let t = table();
        for p1 in 'a'..='d' {
            for p2 in 'a'..='d' {
                for prefix in [p1.to_string(), format!("{}{}", p1, p2)] {
                    let expect: Vec<usize> = t
                        .iter()
                        .enumerate()
                        .filter(|(_, e)| e.code.starts_with(&prefix))
                        .map(|(i, _)| i)
                        .collect();
                    match range_of(&t, &prefix) {
                        Some(r) => assert_eq!(r.collect::<Vec<_>>(), expect, "{}", prefix),
                        None => assert!(expect.is_empty(), "{}", prefix),
                    }
                }
            }
        }
    }
}
