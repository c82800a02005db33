//! Reading-order sorting of positioned runs.

use crate::model::TextRun;

/// Baseline drift, as a share of the font size, still read as one line.
pub const LINE_TOLERANCE: f32 = 0.3;

/// Sort runs into reading order: page, then lines from top to bottom,
/// then left to right within each line.
///
/// Content streams are free to paint text in any order, so the paint order
/// produced by the interpreter is not usable as reading order.
pub fn sort_reading_order(runs: &mut Vec<TextRun>, tolerance: f32) {
    runs.sort_by(|a, b| {
        a.page_number
            .cmp(&b.page_number)
            .then_with(|| a.baseline().total_cmp(&b.baseline()))
            .then_with(|| a.bounding_box.x.total_cmp(&b.bounding_box.x))
    });

    let mut ordered = Vec::with_capacity(runs.len());
    let mut line: Vec<TextRun> = Vec::new();

    for run in runs.drain(..) {
        let starts_new_line = line
            .first()
            .map(|anchor| !anchor.shares_line(&run, tolerance))
            .unwrap_or(false);
        if starts_new_line {
            flush_line(&mut line, &mut ordered);
        }
        line.push(run);
    }
    flush_line(&mut line, &mut ordered);

    *runs = ordered;
}

fn flush_line(line: &mut Vec<TextRun>, ordered: &mut Vec<TextRun>) {
    line.sort_by(|a, b| a.bounding_box.x.total_cmp(&b.bounding_box.x));
    ordered.append(line);
}
