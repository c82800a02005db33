//! Extraction options.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for turning a PDF into text runs.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-page failures
    pub error_mode: ErrorMode,

    /// Which pages to extract
    pub pages: PageSelection,

    /// Normalize run text to Unicode NFC
    pub normalize_unicode: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip pages whose content cannot be decoded instead of failing.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Fail the document on the first undecodable page.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            pages: PageSelection::All,
            normalize_unicode: true,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Log and skip pages that cannot be decoded
    #[default]
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    #[default]
    All,
    /// Inclusive range
    Range(RangeInclusive<u32>),
    /// Explicit sorted page list
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Highest page explicitly requested, if the selection is bounded.
    pub fn max_page(&self) -> Option<u32> {
        match self {
            PageSelection::All => None,
            PageSelection::Range(range) => Some(*range.end()),
            PageSelection::Pages(pages) => pages.last().copied(),
        }
    }

    /// Parse a selection string such as `"all"`, `"2-5"` or `"1,3,7-9"`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = parse_bounds(start, end, s)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = BTreeSet::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_bounds(start, end, part)?;
                pages.extend(start..=end);
            } else {
                pages.insert(parse_page(part)?);
            }
        }
        Ok(PageSelection::Pages(pages.into_iter().collect()))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "'{}' is not a page number",
            s.trim()
        ))),
        Ok(page) => Ok(page),
    }
}

fn parse_bounds(start: &str, end: &str, whole: &str) -> Result<(u32, u32)> {
    let start = parse_page(start)?;
    let end = parse_page(end)?;
    if start > end {
        return Err(Error::InvalidPageRange(format!(
            "'{}' starts after it ends",
            whole
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .strict()
            .with_unicode_normalization(false)
            .with_pages(PageSelection::Range(1..=3));

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(!options.normalize_unicode);
        assert!(options.pages.includes(3));
        assert!(!options.pages.includes(4));
        assert_eq!(options.pages.max_page(), Some(3));
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.normalize_unicode);
        assert_eq!(options.pages, PageSelection::All);
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("2-5").unwrap(),
            PageSelection::Range(2..=5)
        );
        assert_eq!(
            PageSelection::parse("7,1,3-4,3").unwrap(),
            PageSelection::Pages(vec![1, 3, 4, 7])
        );
    }

    #[test]
    fn test_page_selection_rejects_garbage() {
        assert!(PageSelection::parse("0").is_err());
        assert!(PageSelection::parse("5-2").is_err());
        assert!(PageSelection::parse("one,two").is_err());
    }
}
