//! Document title resolution.
//!
//! The title is the most prominent text block at the top of the first page.
//! It is only claimed when it is distinct: strictly larger than every other
//! candidate on that page, and not the only heading there is. Larger text on
//! later pages does not compete with it. Text
//! claimed for the title is removed from the heading pool, so it is never
//! reported twice.

use crate::model::HeadingCandidate;

use super::filter::is_valid_title;
use super::HeadingConfig;

/// The candidates that make up the title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleBlock {
    pub text: String,
    pub font_size: f32,
    /// Indices into the candidate list, in reading order
    pub members: Vec<usize>,
}

impl TitleBlock {
    pub fn contains(&self, candidate: usize) -> bool {
        self.members.contains(&candidate)
    }
}

/// Pick the title from the candidates on `first_page`.
///
/// Returns `None` when no distinct title exists; the caller reports an
/// empty title in that case.
pub fn resolve_title(
    candidates: &[HeadingCandidate],
    first_page: u32,
    config: &HeadingConfig,
) -> Option<TitleBlock> {
    let title_size = candidates
        .iter()
        .filter(|c| c.page_number == first_page)
        .map(|c| c.font_size)
        .max_by(f32::total_cmp)?;

    let same_size = |c: &HeadingCandidate| (c.font_size - title_size).abs() <= config.size_tolerance;

    // Top-most block of vertically adjacent title-size lines
    let max_gap = config.title_line_gap * title_size;
    let mut members: Vec<usize> = Vec::new();
    let mut block_bottom = f32::NEG_INFINITY;
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.page_number != first_page || !same_size(candidate) {
            continue;
        }
        if !members.is_empty() && candidate.vertical_position - block_bottom > max_gap {
            break;
        }
        block_bottom = block_bottom.max(candidate.vertical_position + candidate.font_size);
        members.push(index);
    }

    let mut remaining = 0usize;
    for (index, candidate) in candidates.iter().enumerate() {
        if members.contains(&index) {
            continue;
        }
        remaining += 1;
        if candidate.page_number == first_page
            && candidate.font_size >= title_size - config.size_tolerance
        {
            log::debug!(
                "No distinct title: '{}' is as large as the title text",
                candidate.text
            );
            return None;
        }
    }
    if remaining == 0 {
        log::debug!("No distinct title: the largest text is the only heading");
        return None;
    }

    let text = members
        .iter()
        .map(|&i| candidates[i].text.trim())
        .collect::<Vec<_>>()
        .join(" ");
    if !is_valid_title(&text, config.min_heading_len) {
        return None;
    }

    Some(TitleBlock {
        text,
        font_size: title_size,
        members,
    })
}
