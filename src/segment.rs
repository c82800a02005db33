//! Section segmentation.
//!
//! Partitions a document's run sequence at its headings. Every run lands in
//! exactly one section: text before the first heading goes to a synthetic
//! preamble, and each heading owns everything up to the next heading or the
//! end of the document, across page boundaries.

use crate::model::{Heading, PageRange, Section, TextRun, PREAMBLE_TITLE};

/// Separator between runs in section and document text.
pub const RUN_SEPARATOR: &str = "\n";

/// The whole extracted text of a document, one run per line.
pub fn document_text(runs: &[TextRun]) -> String {
    join_runs(runs)
}

/// Split `runs` into sections at `headings`.
///
/// Headings are ordered by their position in the run sequence, which is
/// reading order (page, then vertical position). Headings whose runs fall
/// outside `runs` are ignored.
pub fn segment(
    document_id: &str,
    document_index: usize,
    headings: &[Heading],
    runs: &[TextRun],
) -> Vec<Section> {
    if runs.is_empty() {
        return Vec::new();
    }

    let mut anchors: Vec<&Heading> = headings
        .iter()
        .filter(|h| h.runs.start < h.runs.end && h.runs.end <= runs.len())
        .collect();
    anchors.sort_by_key(|h| h.runs.start);
    anchors.dedup_by_key(|h| h.runs.start);

    let mut sections = Vec::with_capacity(anchors.len() + 1);

    let first_start = anchors.first().map(|h| h.runs.start).unwrap_or(runs.len());
    if first_start > 0 {
        let preamble = &runs[..first_start];
        let text = join_runs(preamble);
        sections.push(Section {
            document_id: document_id.to_string(),
            document_index,
            heading_text: PREAMBLE_TITLE.to_string(),
            level: None,
            page_number: preamble[0].page_number,
            page_range: page_range(preamble),
            body_text: text.clone(),
            full_text: text,
            run_range: 0..first_start,
        });
    }

    for (i, heading) in anchors.iter().enumerate() {
        let start = heading.runs.start;
        let end = anchors
            .get(i + 1)
            .map(|next| next.runs.start)
            .unwrap_or(runs.len());
        let body_start = heading.runs.end.min(end);

        sections.push(Section {
            document_id: document_id.to_string(),
            document_index,
            heading_text: heading.text.clone(),
            level: Some(heading.level),
            page_number: heading.page,
            page_range: page_range(&runs[start..end]),
            body_text: join_runs(&runs[body_start..end]),
            full_text: join_runs(&runs[start..end]),
            run_range: start..end,
        });
    }

    log::debug!(
        "{}: {} sections from {} headings",
        document_id,
        sections.len(),
        anchors.len()
    );
    sections
}

fn join_runs(runs: &[TextRun]) -> String {
    runs.iter()
        .map(|run| run.text.as_str())
        .collect::<Vec<_>>()
        .join(RUN_SEPARATOR)
}

/// Pages from the first to the last run of a non-empty slice.
fn page_range(runs: &[TextRun]) -> PageRange {
    let start = runs.first().map(|r| r.page_number).unwrap_or(1);
    let end = runs.last().map(|r| r.page_number).unwrap_or(start);
    PageRange::new(start, end)
}
