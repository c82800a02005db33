//! Addressable document sections.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// Heading text used for content that precedes the first heading.
pub const PREAMBLE_TITLE: &str = "Preamble";

/// Inclusive page span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Body text attributed to one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source document name (usually the file name)
    pub document_id: String,
    /// Position of the source document in the input batch
    pub document_index: usize,
    pub heading_text: String,
    /// `None` for the synthetic preamble
    pub level: Option<HeadingLevel>,
    /// Page of the heading (or of the first preamble run)
    pub page_number: u32,
    pub page_range: PageRange,
    /// Text of the non-heading runs, one run per line
    pub body_text: String,
    /// Heading and body runs, one run per line
    pub full_text: String,
    /// Indices of all runs attributed to this section
    pub run_range: Range<usize>,
}

impl Section {
    pub fn is_preamble(&self) -> bool {
        self.level.is_none()
    }

    pub fn has_body(&self) -> bool {
        !self.body_text.trim().is_empty()
    }
}
