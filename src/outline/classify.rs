//! Heading classification.
//!
//! 1. Find the body-text baseline (most frequent size and weight).
//! 2. Merge same-font runs on a line into fragments.
//! 3. Keep fragments that are larger than the baseline, or bold at body
//!    size on a line of their own, outside tables, and with plausible text.
//! 4. Claim the title, then bucket the rest into H1..H3 by size.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{DocumentOutline, Heading, HeadingCandidate, HeadingLevel, TextRun};

use super::baseline::{BodyBaseline, FontStatistics};
use super::filter::HeadingFilter;
use super::lines::{fragments_per_line, merge_fragments};
use super::tables::TableDetector;
use super::title::resolve_title;
use super::tree::build_tree;
use super::HeadingConfig;

/// Classify a document's runs (in reading order) into a title, a flat
/// heading list and an outline tree.
///
/// Fails with [`Error::EmptyRuns`] when there are no runs at all, and with
/// [`Error::Classification`] when no run carries a usable font size.
pub fn classify(runs: &[TextRun], config: &HeadingConfig) -> Result<DocumentOutline> {
    let first_page = runs.first().ok_or(Error::EmptyRuns)?.page_number;

    let stats = FontStatistics::from_runs(runs);
    let baseline = stats.baseline().ok_or_else(|| {
        Error::Classification("no body-text baseline: no run has a usable font size".to_string())
    })?;
    log::debug!(
        "Body baseline: {:.1}pt {:?} ({} distinct sizes)",
        baseline.font_size,
        baseline.font_weight,
        stats.distinct_sizes().len()
    );

    let candidates = select_candidates(runs, &stats, baseline, config)?;
    let title = resolve_title(&candidates, first_page, config);
    if let Some(title) = &title {
        log::debug!("Title: '{}' ({:.1}pt)", title.text, title.font_size);
    }

    let pool: Vec<&HeadingCandidate> = candidates
        .iter()
        .enumerate()
        .filter(|(index, _)| title.as_ref().map_or(true, |t| !t.contains(*index)))
        .map(|(_, candidate)| candidate)
        .collect();

    let tiers = Tiers::new(&pool, baseline, config);
    let mut seen = HashSet::new();
    let mut headings = Vec::new();
    for candidate in pool {
        let Some(level) = tiers.level_of(candidate.font_size) else {
            continue;
        };
        if seen.insert((level, candidate.text.clone(), candidate.page_number)) {
            headings.push(Heading::from_candidate(candidate, level));
        }
    }

    let tree = build_tree(&headings);
    Ok(DocumentOutline {
        title: title.map(|t| t.text).unwrap_or_default(),
        headings,
        tree,
    })
}

/// Fragments that stand out from body text.
pub fn select_candidates(
    runs: &[TextRun],
    stats: &FontStatistics,
    baseline: BodyBaseline,
    config: &HeadingConfig,
) -> Result<Vec<HeadingCandidate>> {
    let has_size_variation = stats
        .distinct_sizes()
        .iter()
        .any(|size| (size - baseline.font_size).abs() > config.size_tolerance);
    if !has_size_variation {
        log::debug!("No font size variation; no headings");
        return Ok(Vec::new());
    }

    // With a bold baseline, weight says nothing; tier by size only.
    let bold_counts = !baseline.font_weight.is_bold();

    let fragments = merge_fragments(runs, config);
    let in_table = if config.exclude_tables {
        TableDetector::with_config(config.table.clone()).table_mask(&fragments)
    } else {
        vec![false; fragments.len()]
    };
    let per_line = fragments_per_line(&fragments);
    let filter = HeadingFilter::new(config)?;

    let candidates = fragments
        .iter()
        .zip(in_table)
        .filter(|(fragment, in_table)| {
            let larger = is_larger(fragment.font_size, baseline, config);
            let bold_line = bold_counts
                && fragment.is_bold()
                && fragment.font_size >= baseline.font_size - config.size_tolerance
                && per_line[fragment.line] == 1;
            (larger || bold_line) && !in_table && filter.accepts(&fragment.text)
        })
        .map(|(fragment, _)| fragment.to_candidate())
        .collect();

    Ok(candidates)
}

fn is_larger(size: f32, baseline: BodyBaseline, config: &HeadingConfig) -> bool {
    size > baseline.font_size + config.min_size_delta
}

/// Size ranges for each heading tier.
#[derive(Debug, Clone, PartialEq)]
enum Tiers {
    /// Size clusters observed in the document, largest first, as
    /// (largest, smallest) pairs. Bold body-size text ranks after them.
    Observed {
        clusters: Vec<(f32, f32)>,
        baseline: BodyBaseline,
        min_size_delta: f32,
        max_levels: usize,
    },
    /// Configured minimum size per tier
    Fixed { boundaries: Vec<f32>, max_levels: usize },
}

impl Tiers {
    fn new(pool: &[&HeadingCandidate], baseline: BodyBaseline, config: &HeadingConfig) -> Self {
        if let Some(boundaries) = &config.tier_boundaries {
            return Tiers::Fixed {
                boundaries: boundaries.clone(),
                max_levels: config.max_levels,
            };
        }

        let mut sizes: Vec<f32> = pool
            .iter()
            .map(|c| c.font_size)
            .filter(|&size| is_larger(size, baseline, config))
            .collect();
        sizes.sort_by(|a, b| b.total_cmp(a));

        let mut clusters: Vec<(f32, f32)> = Vec::new();
        for size in sizes {
            match clusters.last_mut() {
                Some((top, bottom)) if *top - size <= config.size_tolerance => *bottom = size,
                _ => clusters.push((size, size)),
            }
        }
        log::debug!("Heading size tiers: {:?}", clusters);

        Tiers::Observed {
            clusters,
            baseline,
            min_size_delta: config.min_size_delta,
            max_levels: config.max_levels,
        }
    }

    fn level_of(&self, size: f32) -> Option<HeadingLevel> {
        let (tier, max_levels) = match self {
            Tiers::Fixed {
                boundaries,
                max_levels,
            } => (boundaries.iter().position(|&min| size >= min)?, *max_levels),
            Tiers::Observed {
                clusters,
                baseline,
                min_size_delta,
                max_levels,
            } => {
                let tier = if size > baseline.font_size + min_size_delta {
                    clusters
                        .iter()
                        .position(|&(_, bottom)| size >= bottom)
                        .unwrap_or(clusters.len())
                } else {
                    clusters.len()
                };
                (tier, *max_levels)
            }
        };
        HeadingLevel::from_tier(tier.min(max_levels.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FontWeight;

    fn run(page: u32, text: &str, size: f32, weight: FontWeight, y: f32) -> TextRun {
        TextRun::at(page, text, size, weight, 72.0, y)
    }

    fn body(page: u32, y: f32) -> TextRun {
        run(page, "Ordinary paragraph text that fills the page.", 11.0, FontWeight::Regular, y)
    }

    fn levels(outline: &DocumentOutline) -> Vec<(HeadingLevel, &str, u32)> {
        outline
            .headings
            .iter()
            .map(|h| (h.level, h.text.as_str(), h.page))
            .collect()
    }

    #[test]
    fn test_empty_runs_fail() {
        assert!(matches!(
            classify(&[], &HeadingConfig::default()),
            Err(Error::EmptyRuns)
        ));
    }

    #[test]
    fn test_unusable_sizes_fail_classification() {
        let runs = vec![run(1, "text", 0.0, FontWeight::Regular, 100.0)];
        let err = classify(&runs, &HeadingConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
        assert!(err.is_degradable());
    }

    #[test]
    fn test_single_large_bold_heading() {
        let mut runs = vec![run(1, "Introduction", 24.0, FontWeight::Bold, 60.0)];
        for page in 1..=3 {
            for i in 0..10 {
                runs.push(body(page, 120.0 + i as f32 * 14.0));
            }
        }

        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(outline.title, "");
        assert_eq!(levels(&outline), vec![(HeadingLevel::H1, "Introduction", 1)]);
        assert_eq!(outline.tree.len(), 1);
    }

    #[test]
    fn test_three_tiers_and_title() {
        let mut runs = vec![
            run(1, "Field Guide", 28.0, FontWeight::Bold, 40.0),
            run(1, "Overview", 20.0, FontWeight::Bold, 100.0),
            run(1, "Purpose", 16.0, FontWeight::Bold, 130.0),
            run(1, "Audience", 13.0, FontWeight::Bold, 160.0),
        ];
        for i in 0..8 {
            runs.push(body(1, 200.0 + i as f32 * 14.0));
        }
        runs.push(run(2, "Details", 20.0, FontWeight::Bold, 60.0));
        runs.push(body(2, 100.0));

        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(outline.title, "Field Guide");
        assert_eq!(
            levels(&outline),
            vec![
                (HeadingLevel::H1, "Overview", 1),
                (HeadingLevel::H2, "Purpose", 1),
                (HeadingLevel::H3, "Audience", 1),
                (HeadingLevel::H1, "Details", 2),
            ]
        );
        assert_eq!(outline.tree.len(), 2);
        assert_eq!(outline.tree[0].children[0].children[0].text, "Audience");
    }

    #[test]
    fn test_larger_heading_on_later_page_keeps_title() {
        let mut runs = vec![
            run(1, "Annual Field Report", 28.0, FontWeight::Bold, 40.0),
            run(1, "Overview", 18.0, FontWeight::Bold, 100.0),
        ];
        for page in 1..=3 {
            if page == 3 {
                runs.push(run(3, "APPENDIX", 30.0, FontWeight::Bold, 40.0));
            }
            for i in 0..8 {
                runs.push(body(page, 140.0 + i as f32 * 14.0));
            }
        }

        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(outline.title, "Annual Field Report");
        assert_eq!(
            levels(&outline),
            vec![
                (HeadingLevel::H2, "Overview", 1),
                (HeadingLevel::H1, "APPENDIX", 3),
            ]
        );
    }

    #[test]
    fn test_extra_sizes_merge_into_h3() {
        let mut runs = vec![
            run(1, "Alpha", 22.0, FontWeight::Regular, 40.0),
            run(1, "Beta", 18.0, FontWeight::Regular, 80.0),
            run(1, "Gamma", 15.0, FontWeight::Regular, 120.0),
            run(1, "Delta", 13.0, FontWeight::Regular, 160.0),
            run(1, "Epsilon", 12.0, FontWeight::Regular, 190.0),
        ];
        for i in 0..8 {
            runs.push(body(1, 220.0 + i as f32 * 14.0));
        }

        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(outline.title, "Alpha");
        assert_eq!(
            levels(&outline),
            vec![
                (HeadingLevel::H1, "Beta", 1),
                (HeadingLevel::H2, "Gamma", 1),
                (HeadingLevel::H3, "Delta", 1),
                (HeadingLevel::H3, "Epsilon", 1),
            ]
        );
    }

    #[test]
    fn test_no_size_variation_yields_no_headings() {
        let mut runs = vec![run(1, "Bold Label", 11.0, FontWeight::Bold, 40.0)];
        for i in 0..5 {
            runs.push(body(1, 80.0 + i as f32 * 14.0));
        }
        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert!(outline.is_empty());
    }

    #[test]
    fn test_bold_body_size_line_ranks_below_size_tiers() {
        let mut runs = vec![
            run(1, "Chapter One", 18.0, FontWeight::Bold, 40.0),
            run(1, "Key Terms", 11.0, FontWeight::Bold, 80.0),
        ];
        for i in 0..6 {
            runs.push(body(1, 120.0 + i as f32 * 14.0));
        }
        runs.push(run(2, "Chapter Two", 18.0, FontWeight::Bold, 40.0));
        runs.push(body(2, 80.0));

        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(outline.title, "");
        assert_eq!(
            levels(&outline),
            vec![
                (HeadingLevel::H1, "Chapter One", 1),
                (HeadingLevel::H2, "Key Terms", 1),
                (HeadingLevel::H1, "Chapter Two", 2),
            ]
        );
    }

    #[test]
    fn test_inline_bold_word_is_not_a_heading() {
        let runs = vec![
            run(1, "Section", 16.0, FontWeight::Bold, 40.0),
            TextRun::at(1, "Always", 11.0, FontWeight::Bold, 72.0, 80.0),
            TextRun::at(1, "wear protective gloves.", 11.0, FontWeight::Regular, 110.0, 80.0),
            body(1, 100.0),
            body(1, 114.0),
        ];
        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(levels(&outline), vec![(HeadingLevel::H1, "Section", 1)]);
    }

    #[test]
    fn test_all_bold_document_tiers_by_size() {
        let mut runs = vec![run(1, "Summary", 16.0, FontWeight::Bold, 40.0)];
        for i in 0..6 {
            runs.push(run(1, "Everything here is bold.", 11.0, FontWeight::Bold, 80.0 + i as f32 * 14.0));
        }
        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(levels(&outline), vec![(HeadingLevel::H1, "Summary", 1)]);
    }

    #[test]
    fn test_duplicates_suppressed_and_filters_applied() {
        let mut runs = vec![
            run(1, "Results", 16.0, FontWeight::Bold, 40.0),
            run(1, "Results", 16.0, FontWeight::Bold, 300.0),
            run(1, "Page 1", 16.0, FontWeight::Bold, 700.0),
            run(2, "Results", 16.0, FontWeight::Bold, 40.0),
        ];
        for i in 0..6 {
            runs.push(body(1, 80.0 + i as f32 * 14.0));
        }
        runs.sort_by(|a, b| {
            a.page_number
                .cmp(&b.page_number)
                .then(a.bounding_box.y.total_cmp(&b.bounding_box.y))
        });

        let outline = classify(&runs, &HeadingConfig::default()).unwrap();
        assert_eq!(
            levels(&outline),
            vec![
                (HeadingLevel::H1, "Results", 1),
                (HeadingLevel::H1, "Results", 2),
            ]
        );
    }

    #[test]
    fn test_fixed_tier_boundaries() {
        let mut runs = vec![
            run(1, "Big", 20.0, FontWeight::Bold, 40.0),
            run(1, "Medium", 14.0, FontWeight::Bold, 80.0),
            run(1, "Small", 12.5, FontWeight::Bold, 120.0),
        ];
        for i in 0..6 {
            runs.push(body(1, 160.0 + i as f32 * 14.0));
        }
        runs.push(run(2, "Also Big", 20.0, FontWeight::Bold, 40.0));

        let config = HeadingConfig::new().with_tier_boundaries(vec![18.0, 13.0]);
        let outline = classify(&runs, &config).unwrap();
        assert_eq!(
            levels(&outline),
            vec![
                (HeadingLevel::H1, "Big", 1),
                (HeadingLevel::H2, "Medium", 1),
                (HeadingLevel::H1, "Also Big", 2),
            ]
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let mut runs = vec![
            run(1, "Report", 26.0, FontWeight::Bold, 40.0),
            run(1, "Scope", 16.0, FontWeight::Bold, 100.0),
        ];
        for i in 0..6 {
            runs.push(body(1, 140.0 + i as f32 * 14.0));
        }
        let config = HeadingConfig::default();
        assert_eq!(classify(&runs, &config).unwrap(), classify(&runs, &config).unwrap());
    }
}
