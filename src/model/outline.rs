//! Heading and outline types.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::FontWeight;

/// Outline level. `Title` only ever appears as the document title; the
/// heading flow uses `H1`..`H3`, H3 being the deepest supported level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    Title,
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Heading levels in tier order.
    pub const HEADINGS: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Nesting depth: 0 for the title, 1..=3 for headings.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Map a prominence tier (0 = most prominent) to a heading level.
    pub fn from_tier(tier: usize) -> Option<Self> {
        Self::HEADINGS.get(tier).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A merged line fragment that stands out from body text.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub text: String,
    pub page_number: u32,
    pub font_size: f32,
    pub font_weight: FontWeight,
    /// Top of the line in top-down page space
    pub vertical_position: f32,
    /// Indices of the source runs in the document's run sequence
    pub runs: Range<usize>,
}

/// Flat outline entry, serialized as `{"level", "text", "page"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
    #[serde(skip)]
    pub vertical_position: f32,
    #[serde(skip)]
    pub runs: Range<usize>,
}

impl Heading {
    pub fn from_candidate(candidate: &HeadingCandidate, level: HeadingLevel) -> Self {
        Self {
            level,
            text: candidate.text.clone(),
            page: candidate.page_number,
            vertical_position: candidate.vertical_position,
            runs: candidate.runs.clone(),
        }
    }
}

/// A node of the nested outline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub level: HeadingLevel,
    pub text: String,
    pub page_number: u32,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page_number: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page_number,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn total_nodes(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::total_nodes).sum::<usize>()
    }
}

/// Everything the heading classifier knows about one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentOutline {
    /// Resolved title, empty when no distinct title text exists
    pub title: String,
    /// Headings in reading order
    pub headings: Vec<Heading>,
    /// Nested view of `headings`
    pub tree: Vec<OutlineNode>,
}

impl DocumentOutline {
    /// Title-only outline used when classification degrades.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.headings.is_empty()
    }
}
