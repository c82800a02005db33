//! Positioned text runs.

use serde::{Deserialize, Serialize};

/// Font weight as far as layout analysis cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    /// Infer the weight from a PostScript base font name
    /// (e.g. `ABCDEF+Helvetica-Bold`, `Arial,Black`).
    pub fn from_font_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let bold = ["bold", "black", "heavy", "semibold", "demi"]
            .iter()
            .any(|marker| lower.contains(marker));
        if bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        }
    }

    pub fn is_bold(self) -> bool {
        self == FontWeight::Bold
    }
}

/// Axis-aligned box in top-down page space: `y` is the distance from the
/// top edge of the page to the top of the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Estimate a box for text whose glyph widths are unknown.
    ///
    /// Uses half the font size as the average advance, which is close
    /// enough for line grouping and adjacency checks.
    pub fn estimate(x: f32, y: f32, text: &str, font_size: f32) -> Self {
        let chars = text.chars().count() as f32;
        Self::new(x, y, chars * font_size * 0.5, font_size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A run of text sharing one font, as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// 1-indexed page number
    pub page_number: u32,
    /// Run text (NFC-normalized, trimmed)
    pub text: String,
    /// Effective font size in points
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub bounding_box: BoundingBox,
}

impl TextRun {
    pub fn new(
        page_number: u32,
        text: impl Into<String>,
        font_size: f32,
        font_weight: FontWeight,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            page_number,
            text: text.into(),
            font_size,
            font_weight,
            bounding_box,
        }
    }

    /// Build a run at `(x, y)` with an estimated box.
    pub fn at(
        page_number: u32,
        text: impl Into<String>,
        font_size: f32,
        font_weight: FontWeight,
        x: f32,
        y: f32,
    ) -> Self {
        let text = text.into();
        let bounding_box = BoundingBox::estimate(x, y, &text, font_size);
        Self::new(page_number, text, font_size, font_weight, bounding_box)
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight.is_bold()
    }

    /// Font size bucketed to 0.1pt, usable as a hash key.
    pub fn size_key(&self) -> i32 {
        size_key(self.font_size)
    }

    /// Baseline in top-down page space.
    pub fn baseline(&self) -> f32 {
        self.bounding_box.y + self.font_size * 0.8
    }

    /// Whether two runs sit on the same text line, allowing baseline drift
    /// of `tolerance` times the larger font size.
    pub fn shares_line(&self, other: &TextRun, tolerance: f32) -> bool {
        let size = self.font_size.max(other.font_size);
        self.page_number == other.page_number
            && (self.baseline() - other.baseline()).abs() <= size * tolerance
    }
}

/// Bucket a font size to 0.1pt precision.
pub(crate) fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
