//! Page range expressions.
//!
//! A page range expression is a comma separated list of tokens, each either a
//! single page number (`7`) or an inclusive range (`12-16`). Whitespace is
//! ignored anywhere in the expression. Pages are emitted in the order the
//! tokens appear, so `"3,1-2,3"` yields `[3, 1, 2, 3]`; duplicates are kept.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PageMergeError, Result};

/// Largest page list [`parse_page_range`] will expand an expression into.
pub const MAX_EXPANDED_PAGES: u64 = 1 << 20;

/// One token of a page range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageToken {
    /// A single page, `7`.
    Single(u32),
    /// An inclusive range, `12-16`. Parsed ranges have `start <= end`.
    Range(u32, u32),
}

impl PageToken {
    /// Pages covered by this token, in ascending order.
    pub fn pages(&self) -> RangeInclusive<u32> {
        match *self {
            Self::Single(page) => page..=page,
            Self::Range(start, end) => start..=end,
        }
    }

    /// Number of pages covered by this token.
    pub fn page_count(&self) -> u64 {
        match *self {
            Self::Single(_) => 1,
            Self::Range(start, end) if start <= end => u64::from(end - start) + 1,
            Self::Range(..) => 0,
        }
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(page) => write!(f, "{page}"),
            Self::Range(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

/// Parse a page range expression into its tokens without expanding ranges.
///
/// # Errors
///
/// Same as [`parse_page_range`], minus [`PageMergeError::RangeTooLarge`].
pub fn parse_page_tokens(expression: &str) -> Result<Vec<PageToken>> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();

    for token in compact.split(',') {
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_page_number(expression, token, start)?;
                let end = parse_page_number(expression, token, end)?;

                if start > end {
                    return Err(PageMergeError::InvalidRange { start, end });
                }

                tokens.push(PageToken::Range(start, end));
            }
            None => {
                let page = parse_page_number(expression, token, token)?;
                tokens.push(PageToken::Single(page));
            }
        }
    }

    Ok(tokens)
}

/// Parse a page range expression into an ordered list of 1-based page numbers.
///
/// # Errors
///
/// - [`PageMergeError::InvalidRange`] when a range starts after it ends
/// - [`PageMergeError::InvalidPageNumber`] for empty or non-numeric tokens,
///   tokens with more than one hyphen, and page `0`
/// - [`PageMergeError::RangeTooLarge`] when the list would hold more than
///   [`MAX_EXPANDED_PAGES`] pages; use [`PageSelection`] for those
///
/// # Examples
///
/// ```
/// use pagemerge::range::parse_page_range;
///
/// assert_eq!(parse_page_range("1,3,6,12-16").unwrap(), vec![1, 3, 6, 12, 13, 14, 15, 16]);
/// assert_eq!(parse_page_range("2, 2").unwrap(), vec![2, 2]);
/// assert!(parse_page_range("5-3").is_err());
/// ```
pub fn parse_page_range(expression: &str) -> Result<Vec<u32>> {
    let tokens = parse_page_tokens(expression)?;

    let pages: u64 = tokens.iter().map(PageToken::page_count).sum();
    if pages > MAX_EXPANDED_PAGES {
        return Err(PageMergeError::RangeTooLarge {
            expression: expression.to_string(),
            pages,
            limit: MAX_EXPANDED_PAGES,
        });
    }

    Ok(tokens.iter().flat_map(PageToken::pages).collect())
}

fn parse_page_number(expression: &str, token: &str, digits: &str) -> Result<u32> {
    // `str::parse` accepts a leading '+', page numbers do not.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageMergeError::invalid_page_number(expression, token));
    }

    match digits.parse::<u32>() {
        Ok(0) | Err(_) => Err(PageMergeError::invalid_page_number(expression, token)),
        Ok(page) => Ok(page),
    }
}

/// Which pages of a source take part in a merge.
///
/// Explicit selections keep the parsed tokens; ranges are only expanded
/// against a document's real page count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "pages")]
pub enum PageSelection {
    /// Every page, in document order.
    #[default]
    All,
    /// Explicit pages and ranges, in output order.
    Pages(Vec<PageToken>),
}

impl PageSelection {
    /// Select individual pages, in the given order.
    pub fn from_pages(pages: impl IntoIterator<Item = u32>) -> Self {
        Self::Pages(pages.into_iter().map(PageToken::Single).collect())
    }

    /// Returns true if every page is selected.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolve the selection against a document with `page_count` pages.
    ///
    /// Expansion stops after the first page the document does not have, so
    /// a huge range costs no more than the document itself; importing that
    /// page fails with [`PageMergeError::PageNotFound`].
    pub fn resolve(&self, page_count: u32) -> Vec<u32> {
        match self {
            Self::All => (1..=page_count).collect(),
            Self::Pages(tokens) => {
                let mut pages = Vec::new();
                for page in tokens.iter().flat_map(PageToken::pages) {
                    pages.push(page);
                    if page > page_count {
                        break;
                    }
                }
                pages
            }
        }
    }
}

impl FromStr for PageSelection {
    type Err = PageMergeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            parse_page_tokens(s).map(Self::Pages)
        }
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Pages(tokens) => {
                let joined = tokens
                    .iter()
                    .map(PageToken::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{joined}")
            }
        }
    }
}
