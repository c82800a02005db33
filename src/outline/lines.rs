//! Line fragments: adjacent same-font runs merged into one unit.
//!
//! PDF producers often split a heading into several runs (one per word, or
//! per kerning pair). Merging them before classification keeps a heading
//! from turning into several spurious fragments.

use std::ops::Range;

use crate::extract::interpreter::is_spaceless_script_char;
use crate::model::{FontWeight, HeadingCandidate, TextRun};

use super::HeadingConfig;

/// Gap (in ems) under which two runs are glued without a space.
const GLUE_GAP: f32 = 0.1;

/// Consecutive same-font runs on one physical line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub page_number: u32,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    /// Physical line this fragment sits on (document-wide counter)
    pub line: usize,
    /// Source runs
    pub runs: Range<usize>,
}

impl Fragment {
    fn start(index: usize, run: &TextRun, line: usize) -> Self {
        let bbox = run.bounding_box;
        Self {
            text: run.text.clone(),
            page_number: run.page_number,
            font_size: run.font_size,
            font_weight: run.font_weight,
            top: bbox.y,
            bottom: bbox.bottom(),
            left: bbox.x,
            right: bbox.right(),
            line,
            runs: index..index + 1,
        }
    }

    fn accepts(&self, run: &TextRun, config: &HeadingConfig) -> bool {
        crate::model::size_key(self.font_size) == run.size_key()
            && self.font_weight == run.font_weight
            && run.bounding_box.x - self.right <= config.merge_gap * self.font_size
    }

    fn push(&mut self, index: usize, run: &TextRun) {
        let gap = run.bounding_box.x - self.right;
        let glue = gap <= GLUE_GAP * self.font_size
            || (ends_spaceless(&self.text) && starts_spaceless(&run.text));
        if !glue {
            self.text.push(' ');
        }
        self.text.push_str(&run.text);

        let bbox = run.bounding_box;
        self.top = self.top.min(bbox.y);
        self.bottom = self.bottom.max(bbox.bottom());
        self.right = self.right.max(bbox.right());
        self.runs.end = index + 1;
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight.is_bold()
    }

    pub fn to_candidate(&self) -> HeadingCandidate {
        HeadingCandidate {
            text: self.text.clone(),
            page_number: self.page_number,
            font_size: self.font_size,
            font_weight: self.font_weight,
            vertical_position: self.top,
            runs: self.runs.clone(),
        }
    }
}

fn ends_spaceless(text: &str) -> bool {
    text.chars().last().is_some_and(is_spaceless_script_char)
}

fn starts_spaceless(text: &str) -> bool {
    text.chars().next().is_some_and(is_spaceless_script_char)
}

/// Merge runs (in reading order) into fragments. Every run lands in exactly
/// one fragment and fragment ranges are contiguous and ascending.
pub fn merge_fragments(runs: &[TextRun], config: &HeadingConfig) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut line = 0usize;
    let mut line_anchor: Option<&TextRun> = None;

    for (index, run) in runs.iter().enumerate() {
        let same_line = line_anchor
            .map(|anchor| anchor.shares_line(run, config.line_tolerance))
            .unwrap_or(false);

        if !same_line {
            if line_anchor.is_some() {
                line += 1;
            }
            line_anchor = Some(run);
            fragments.push(Fragment::start(index, run, line));
            continue;
        }

        match fragments.last_mut() {
            Some(last) if last.accepts(run, config) => last.push(index, run),
            _ => fragments.push(Fragment::start(index, run, line)),
        }
    }

    fragments
}

/// Number of fragments on each physical line, indexed by line.
pub fn fragments_per_line(fragments: &[Fragment]) -> Vec<usize> {
    let lines = fragments.last().map(|f| f.line + 1).unwrap_or(0);
    let mut counts = vec![0; lines];
    for fragment in fragments {
        counts[fragment.line] += 1;
    }
    counts
}
