// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-range parsing for the PDF page tools (extract, delete, rotate, split).
//
// Input is what a user types: "1,3,5-7,9-". Pages are 1-indexed on input and
// 0-indexed in the resulting `PageSelection`. Accepted token forms:
//
//   N      single page
//   A-B    inclusive range
//   A-     page A through the last page
//   -B     page 1 through page B
//
// Whitespace around tokens and dashes is ignored, empty tokens are skipped,
// and overlapping tokens are merged.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a page-range string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRangeError {
    #[error("no pages selected")]
    Empty,

    #[error("'{0}' is not a page number or range")]
    InvalidToken(String),

    #[error("page numbers start at 1")]
    PageZero,

    #[error("range {start}-{end} runs backwards")]
    ReversedRange { start: usize, end: usize },

    #[error("page {page} does not exist (document has {total} pages)")]
    OutOfBounds { page: usize, total: usize },

    #[error("document has no pages")]
    NoPages,

    #[error("cannot remove all {total} pages of the document")]
    WouldRemoveAll { total: usize },
}

/// A validated, sorted, duplicate-free set of 0-indexed page indices.
///
/// Never empty, and every index is below the page count it was parsed
/// against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSelection {
    indices: Vec<usize>,
}

impl PageSelection {
    /// Parse a page-range string against a document of `total_pages` pages.
    pub fn parse(input: &str, total_pages: usize) -> Result<Self, PageRangeError> {
        if total_pages == 0 {
            return Err(PageRangeError::NoPages);
        }

        let mut ranges = tokens(input)
            .map(|token| parse_token(token, total_pages))
            .collect::<Result<Vec<_>, PageRangeError>>()?;
        if ranges.is_empty() {
            return Err(PageRangeError::Empty);
        }

        // Merge before expanding so each selected page is produced once.
        ranges.sort_unstable();
        let mut indices = Vec::new();
        let mut next = 0;
        for (start, end) in ranges {
            let from = (start - 1).max(next);
            if from < end {
                indices.extend(from..end);
                next = end;
            }
        }

        Ok(Self { indices })
    }

    /// Parse a selection of pages to delete.
    ///
    /// Identical to [`PageSelection::parse`] but also rejects a selection that
    /// covers the whole document, since a PDF must keep at least one page.
    pub fn parse_for_deletion(input: &str, total_pages: usize) -> Result<Self, PageRangeError> {
        let selection = Self::parse(input, total_pages)?;
        if selection.len() == total_pages {
            return Err(PageRangeError::WouldRemoveAll { total: total_pages });
        }
        Ok(selection)
    }

    /// Parse each comma-separated token as its own selection, in input order.
    ///
    /// Used by split: `"1-3,4-6"` yields two groups.
    pub fn parse_groups(input: &str, total_pages: usize) -> Result<Vec<Self>, PageRangeError> {
        if total_pages == 0 {
            return Err(PageRangeError::NoPages);
        }

        let groups = tokens(input)
            .map(|token| {
                let (start, end) = parse_token(token, total_pages)?;
                Ok(Self {
                    indices: (start - 1..end).collect(),
                })
            })
            .collect::<Result<Vec<_>, PageRangeError>>()?;

        if groups.is_empty() {
            return Err(PageRangeError::Empty);
        }
        Ok(groups)
    }

    /// Every page of a `total_pages` document.
    pub fn all(total_pages: usize) -> Result<Self, PageRangeError> {
        if total_pages == 0 {
            return Err(PageRangeError::NoPages);
        }
        Ok(Self {
            indices: (0..total_pages).collect(),
        })
    }

    /// Selected 0-indexed page indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Selected pages as 1-indexed page numbers, the form lopdf uses.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.indices.iter().map(|&index| index as u32 + 1).collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// 0-indexed pages of a `total_pages` document that are NOT selected.
    pub fn complement(&self, total_pages: usize) -> Vec<usize> {
        (0..total_pages).filter(|&index| !self.contains(index)).collect()
    }
}

impl fmt::Display for PageSelection {
    /// Canonical compact form, 1-indexed: `1-3,5,8-10`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut iter = self.indices.iter().copied().peekable();

        while let Some(start) = iter.next() {
            let mut end = start;
            while iter.peek() == Some(&(end + 1)) {
                end += 1;
                iter.next();
            }

            if !first {
                f.write_str(",")?;
            }
            first = false;

            if start == end {
                write!(f, "{}", start + 1)?;
            } else {
                write!(f, "{}-{}", start + 1, end + 1)?;
            }
        }
        Ok(())
    }
}

/// Non-empty, trimmed tokens of a page-range string.
fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|token| !token.is_empty())
}

/// Parse one token into an inclusive 1-indexed `(start, end)` pair that is
/// guaranteed to lie within `1..=total`.
fn parse_token(token: &str, total: usize) -> Result<(usize, usize), PageRangeError> {
    // En dashes show up when ranges are pasted from word processors.
    let normalised = token.replace('\u{2013}', "-");

    let (start, end) = match normalised.split_once('-') {
        None => {
            let page = parse_page(&normalised, token)?;
            (page, page)
        }
        Some((lhs, rhs)) => {
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if rhs.contains('-') {
                return Err(PageRangeError::InvalidToken(token.to_owned()));
            }
            match (lhs.is_empty(), rhs.is_empty()) {
                (true, true) => return Err(PageRangeError::InvalidToken(token.to_owned())),
                (false, true) => (parse_page(lhs, token)?, total),
                (true, false) => (1, parse_page(rhs, token)?),
                (false, false) => (parse_page(lhs, token)?, parse_page(rhs, token)?),
            }
        }
    };

    if start > total {
        return Err(PageRangeError::OutOfBounds { page: start, total });
    }
    if end > total {
        return Err(PageRangeError::OutOfBounds { page: end, total });
    }
    if start > end {
        return Err(PageRangeError::ReversedRange { start, end });
    }
    Ok((start, end))
}

/// Parse a bare page number. Only ASCII digits are accepted, so `+3` and
/// `3.0` are rejected rather than silently coerced.
fn parse_page(text: &str, token: &str) -> Result<usize, PageRangeError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageRangeError::InvalidToken(token.to_owned()));
    }
    let page: usize = text
        .parse()
        .map_err(|_| PageRangeError::InvalidToken(token.to_owned()))?;
    if page == 0 {
        return Err(PageRangeError::PageZero);
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mixed_singles_and_ranges() {
        let selection = PageSelection::parse("1,3,5-7,9-", 10).unwrap();
        assert_eq!(selection.indices(), &[0, 2, 4, 5, 6, 8, 9]);
        assert_eq!(selection.page_numbers(), vec![1, 3, 5, 6, 7, 9, 10]);
    }

    #[test]
    fn whitespace_and_empty_tokens_are_ignored() {
        let selection = PageSelection::parse(" 2 , ,4 - 5 ,", 6).unwrap();
        assert_eq!(selection.indices(), &[1, 3, 4]);
    }

    #[test]
    fn overlaps_are_merged_and_sorted() {
        let selection = PageSelection::parse("4-6, 1-3, 2-5, 3", 8).unwrap();
        assert_eq!(selection.indices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn repeated_open_ranges_expand_once() {
        let input = "1-,".repeat(3000);
        let selection = PageSelection::parse(&input, 100_000).unwrap();
        assert_eq!(selection.len(), 100_000);
        assert_eq!(selection.indices()[99_999], 99_999);

        let nested = PageSelection::parse("2-9, 3-4, 1, 8-10, 10", 12).unwrap();
        assert_eq!(nested.to_string(), "1-10");
    }

    #[test]
    fn leading_dash_runs_from_first_page() {
        let selection = PageSelection::parse("-3", 5).unwrap();
        assert_eq!(selection.indices(), &[0, 1, 2]);
    }

    #[test]
    fn open_ended_range_reaches_last_page() {
        let selection = PageSelection::parse("4-", 5).unwrap();
        assert_eq!(selection.indices(), &[3, 4]);
    }

    #[test]
    fn en_dash_is_accepted() {
        let selection = PageSelection::parse("2\u{2013}3", 5).unwrap();
        assert_eq!(selection.indices(), &[1, 2]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(PageSelection::parse("", 5), Err(PageRangeError::Empty));
        assert_eq!(PageSelection::parse(" , ,", 5), Err(PageRangeError::Empty));
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(PageSelection::parse("0", 5), Err(PageRangeError::PageZero));
        assert_eq!(PageSelection::parse("0-2", 5), Err(PageRangeError::PageZero));
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        assert_eq!(
            PageSelection::parse("2,7", 5),
            Err(PageRangeError::OutOfBounds { page: 7, total: 5 })
        );
        assert_eq!(
            PageSelection::parse("3-9", 5),
            Err(PageRangeError::OutOfBounds { page: 9, total: 5 })
        );
        assert_eq!(
            PageSelection::parse("8-", 5),
            Err(PageRangeError::OutOfBounds { page: 8, total: 5 })
        );
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            PageSelection::parse("5-2", 5),
            Err(PageRangeError::ReversedRange { start: 5, end: 2 })
        );
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        for input in ["a", "1-2-3", "-", "+3", "2.5", "1;2", "3-x"] {
            assert!(
                matches!(
                    PageSelection::parse(input, 10),
                    Err(PageRangeError::InvalidToken(_))
                ),
                "expected InvalidToken for {input:?}"
            );
        }
    }

    #[test]
    fn empty_document_has_no_pages() {
        assert_eq!(PageSelection::parse("1", 0), Err(PageRangeError::NoPages));
        assert_eq!(PageSelection::all(0), Err(PageRangeError::NoPages));
    }

    #[test]
    fn deleting_every_page_is_rejected() {
        assert_eq!(
            PageSelection::parse_for_deletion("1-", 3),
            Err(PageRangeError::WouldRemoveAll { total: 3 })
        );
        assert_eq!(
            PageSelection::parse_for_deletion("1,2,3", 3),
            Err(PageRangeError::WouldRemoveAll { total: 3 })
        );
        let partial = PageSelection::parse_for_deletion("1,3", 3).unwrap();
        assert_eq!(partial.complement(3), vec![1]);
    }

    #[test]
    fn groups_keep_token_order() {
        let groups = PageSelection::parse_groups("4-5, 1-2, 3", 5).unwrap();
        let rendered: Vec<String> = groups.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["4-5", "1-2", "3"]);
    }

    #[test]
    fn groups_reject_blank_input() {
        assert_eq!(PageSelection::parse_groups(",", 4), Err(PageRangeError::Empty));
    }

    #[test]
    fn display_compacts_runs() {
        let selection = PageSelection::parse("8,1,2,3,5,9,10", 10).unwrap();
        assert_eq!(selection.to_string(), "1-3,5,8-10");
    }

    #[test]
    fn contains_and_complement() {
        let selection = PageSelection::parse("2-3", 4).unwrap();
        assert!(selection.contains(1));
        assert!(!selection.contains(0));
        assert_eq!(selection.complement(4), vec![0, 3]);
    }

    proptest! {
        #[test]
        fn parsed_pages_are_sorted_unique_and_in_bounds(
            total in 1usize..60,
            pages in prop::collection::vec(1usize..60, 1..20),
        ) {
            let pages: Vec<usize> = pages.into_iter().map(|p| (p - 1) % total + 1).collect();
            let input = pages.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");

            let selection = PageSelection::parse(&input, total).unwrap();
            let indices = selection.indices();

            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(indices.iter().all(|&i| i < total));
            for page in &pages {
                prop_assert!(selection.contains(page - 1));
            }
        }

        #[test]
        fn canonical_form_reparses_to_same_selection(
            total in 1usize..40,
            start in 1usize..40,
            len in 0usize..10,
        ) {
            let start = (start - 1) % total + 1;
            let end = (start + len).min(total);
            let selection = PageSelection::parse(&format!("{start}-{end}"), total).unwrap();

            let reparsed = PageSelection::parse(&selection.to_string(), total).unwrap();
            prop_assert_eq!(reparsed, selection);
        }

        #[test]
        fn token_order_does_not_matter(
            total in 2usize..30,
            a in 1usize..30,
            b in 1usize..30,
        ) {
            let a = (a - 1) % total + 1;
            let b = (b - 1) % total + 1;
            let forward = PageSelection::parse(&format!("{a},{b}-"), total).unwrap();
            let backward = PageSelection::parse(&format!("{b}-,{a}"), total).unwrap();
            prop_assert_eq!(forward, backward);
        }
    }
}
