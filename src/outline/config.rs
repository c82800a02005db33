//! Heading classifier configuration.

use crate::extract::LINE_TOLERANCE;

use super::TableDetectorConfig;

/// Deepest supported heading level (H3).
pub const MAX_LEVELS: usize = 3;

/// Tuning knobs for heading classification and title resolution.
///
/// Tier thresholds come from the observed size distribution of each
/// document unless `tier_boundaries` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingConfig {
    /// Number of heading tiers (1..=3)
    pub max_levels: usize,

    /// Sizes closer than this (points) share a tier
    pub size_tolerance: f32,

    /// How far (points) a run must exceed the body size to count as larger
    pub min_size_delta: f32,

    /// Explicit minimum font size per tier, most prominent first.
    /// Overrides the observed distribution when set.
    pub tier_boundaries: Option<Vec<f32>>,

    /// Baseline drift, as a share of font size, still read as one line
    pub line_tolerance: f32,

    /// Largest horizontal gap (in ems) between runs merged into one fragment
    pub merge_gap: f32,

    /// Largest vertical gap (in ems) between title lines
    pub title_line_gap: f32,

    /// Minimum heading length in characters
    pub min_heading_len: usize,

    /// Maximum heading length in characters
    pub max_heading_chars: usize,

    /// Never treat runs inside detected tables as headings
    pub exclude_tables: bool,

    /// Alignment thresholds for table detection
    pub table: TableDetectorConfig,
}

impl HeadingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of heading tiers, clamped to 1..=3.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels.clamp(1, MAX_LEVELS);
        self
    }

    /// Use fixed tier boundaries (minimum size per tier, most prominent
    /// first). Extra boundaries beyond three tiers are ignored.
    pub fn with_tier_boundaries(mut self, mut boundaries: Vec<f32>) -> Self {
        boundaries.retain(|b| b.is_finite() && *b > 0.0);
        boundaries.sort_by(|a, b| b.total_cmp(a));
        boundaries.truncate(MAX_LEVELS);
        self.tier_boundaries = if boundaries.is_empty() {
            None
        } else {
            Some(boundaries)
        };
        self
    }

    pub fn with_size_tolerance(mut self, tolerance: f32) -> Self {
        self.size_tolerance = tolerance.max(0.0);
        self
    }

    pub fn with_min_size_delta(mut self, delta: f32) -> Self {
        self.min_size_delta = delta.max(0.0);
        self
    }

    pub fn with_heading_length(mut self, min_len: usize, max_chars: usize) -> Self {
        self.min_heading_len = min_len;
        self.max_heading_chars = max_chars.max(min_len);
        self
    }

    pub fn with_table_exclusion(mut self, exclude: bool) -> Self {
        self.exclude_tables = exclude;
        self
    }

    pub fn with_table_detector(mut self, table: TableDetectorConfig) -> Self {
        self.table = table;
        self
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            max_levels: MAX_LEVELS,
            size_tolerance: 0.5,
            min_size_delta: 0.5,
            tier_boundaries: None,
            line_tolerance: LINE_TOLERANCE,
            merge_gap: 3.0,
            title_line_gap: 0.6,
            min_heading_len: 2,
            max_heading_chars: 120,
            exclude_tables: true,
            table: TableDetectorConfig::default(),
        }
    }
}
