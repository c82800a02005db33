//! Table-region detection from text alignment.
//!
//! Tables are found without ruling lines: consecutive lines whose fragments
//! start at shared column edges form a region. Text inside a region is never
//! a heading candidate, although it stays in the body flow.

use std::collections::{BTreeMap, BTreeSet};

use super::lines::Fragment;

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Width (points) of the buckets left edges are counted in
    pub bucket_size: f32,
    /// How far (points) a cell may start from its column edge
    pub alignment_tolerance: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
    /// Minimum share of multi-cell rows an edge must appear in
    pub min_alignment_ratio: f32,
    /// Cells longer than this (characters) are prose, not table data
    pub max_cell_chars: usize,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            bucket_size: 5.0,
            alignment_tolerance: 5.0,
            min_column_gap: 15.0,
            min_alignment_ratio: 0.3,
            max_cell_chars: 40,
        }
    }
}

/// A detected table region.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    pub page_number: u32,
    /// Column left edges
    pub columns: Vec<f32>,
    /// Indices of the fragments inside the region
    pub fragments: Vec<usize>,
}

struct Row {
    page_number: u32,
    fragments: Vec<usize>,
}

/// Detects tables in a fragment sequence.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Flags every fragment that belongs to a table region.
    pub fn table_mask(&self, fragments: &[Fragment]) -> Vec<bool> {
        let mut mask = vec![false; fragments.len()];
        for region in self.detect(fragments) {
            for index in region.fragments {
                mask[index] = true;
            }
        }
        mask
    }

    /// Detect table regions, page by page.
    pub fn detect(&self, fragments: &[Fragment]) -> Vec<TableRegion> {
        let rows = group_rows(fragments);
        let mut regions = Vec::new();

        let mut start = 0;
        while start < rows.len() {
            let page = rows[start].page_number;
            let end = rows[start..]
                .iter()
                .position(|row| row.page_number != page)
                .map(|offset| start + offset)
                .unwrap_or(rows.len());
            regions.extend(self.detect_on_page(fragments, &rows[start..end]));
            start = end;
        }

        regions
    }

    fn detect_on_page(&self, fragments: &[Fragment], rows: &[Row]) -> Vec<TableRegion> {
        let cell_rows: Vec<bool> = rows
            .iter()
            .map(|row| self.is_cell_row(fragments, row))
            .collect();

        let candidate_rows: Vec<&Row> = rows
            .iter()
            .zip(&cell_rows)
            .filter(|(_, is_cells)| **is_cells)
            .map(|(row, _)| row)
            .collect();
        if candidate_rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(fragments, &candidate_rows);
        if columns.len() < self.config.min_columns {
            return vec![];
        }
        log::debug!(
            "Page {}: column edges at {:?}",
            rows[0].page_number,
            columns
        );

        let aligned: Vec<bool> = rows
            .iter()
            .zip(&cell_rows)
            .map(|(row, &is_cells)| {
                is_cells && self.aligned_cells(fragments, row, &columns) >= self.config.min_columns
            })
            .collect();

        let mut regions = Vec::new();
        let mut index = 0;
        while index < rows.len() {
            if !aligned[index] {
                index += 1;
                continue;
            }
            let run_end = aligned[index..]
                .iter()
                .position(|a| !a)
                .map(|offset| index + offset)
                .unwrap_or(rows.len());

            if run_end - index >= self.config.min_rows {
                if let Some(region) = self.build_region(fragments, &rows[index..run_end]) {
                    regions.push(region);
                }
            }
            index = run_end;
        }

        regions
    }

    fn build_region(&self, fragments: &[Fragment], rows: &[Row]) -> Option<TableRegion> {
        let row_refs: Vec<&Row> = rows.iter().collect();
        let columns = self.detect_columns(fragments, &row_refs);

        if columns.len() < self.config.min_columns {
            return None;
        }
        if columns.len() > self.config.max_columns {
            log::debug!(
                "Skipping table region: too many columns ({} > {})",
                columns.len(),
                self.config.max_columns
            );
            return None;
        }
        if is_list_pattern(fragments, rows, &columns) {
            log::debug!("Skipping table region: list pattern");
            return None;
        }

        Some(TableRegion {
            page_number: rows[0].page_number,
            columns,
            fragments: rows.iter().flat_map(|row| row.fragments.iter().copied()).collect(),
        })
    }

    fn is_cell_row(&self, fragments: &[Fragment], row: &Row) -> bool {
        row.fragments.len() >= 2
            && row
                .fragments
                .iter()
                .all(|&i| fragments[i].text.chars().count() <= self.config.max_cell_chars)
    }

    fn aligned_cells(&self, fragments: &[Fragment], row: &Row, columns: &[f32]) -> usize {
        row.fragments
            .iter()
            .filter(|&&i| {
                columns
                    .iter()
                    .any(|col| (fragments[i].left - col).abs() <= self.config.alignment_tolerance)
            })
            .count()
    }

    /// Left edges shared by enough rows, merged when closer than the
    /// minimum column gap.
    fn detect_columns(&self, fragments: &[Fragment], rows: &[&Row]) -> Vec<f32> {
        let bucket_size = self.config.bucket_size;
        let mut edge_counts: BTreeMap<i32, usize> = BTreeMap::new();

        for row in rows {
            // Count each bucket once per row
            let buckets: BTreeSet<i32> = row
                .fragments
                .iter()
                .map(|&i| (fragments[i].left / bucket_size).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut merged: Vec<f32> = Vec::new();
        for (bucket, count) in edge_counts {
            if count < min_occurrences {
                continue;
            }
            let edge = bucket as f32 * bucket_size;
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }
}

fn group_rows(fragments: &[Fragment]) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    for (index, fragment) in fragments.iter().enumerate() {
        match rows.last_mut() {
            Some(row) if fragments[row.fragments[0]].line == fragment.line => {
                row.fragments.push(index)
            }
            _ => rows.push(Row {
                page_number: fragment.page_number,
                fragments: vec![index],
            }),
        }
    }
    rows
}

/// Numbered or bulleted lists split their markers into a separate cell and
/// look like two-column tables.
fn is_list_pattern(fragments: &[Fragment], rows: &[Row], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        let first = row
            .fragments
            .iter()
            .map(|&i| &fragments[i])
            .min_by(|a, b| a.left.total_cmp(&b.left));
        if let Some(fragment) = first {
            let text = fragment.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let bullet_ratio = bullets as f32 / rows.len() as f32;
    let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;

    bullet_ratio >= 0.5 || (columns.len() == 2 && marker_ratio >= 0.5)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text,
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "➤"
    )
}

/// `1.`, `12)`, `a.`, `iv)`
fn is_number_marker(text: &str) -> bool {
    let Some(body) = text.strip_suffix('.').or_else(|| text.strip_suffix(')')) else {
        return false;
    };
    !body.is_empty()
        && body.len() <= 4
        && (body.chars().all(|c| c.is_ascii_digit())
            || body.chars().all(|c| c.is_ascii_lowercase()))
}
