//! Font statistics and the body-text baseline.

use std::collections::BTreeMap;

use crate::model::{FontWeight, TextRun};

/// The (size, weight) pair of ordinary paragraph text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBaseline {
    pub font_size: f32,
    pub font_weight: FontWeight,
}

/// Frequency of every (size, weight) pair in a document.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Keyed by size bucketed to 0.1pt
    histogram: BTreeMap<(i32, FontWeight), usize>,
}

impl FontStatistics {
    pub fn from_runs(runs: &[TextRun]) -> Self {
        let mut stats = Self::default();
        for run in runs {
            stats.add(run.font_size, run.font_weight);
        }
        stats
    }

    /// Add one observation. Non-positive and non-finite sizes are ignored.
    pub fn add(&mut self, size: f32, weight: FontWeight) {
        if size.is_finite() && size > 0.0 {
            *self
                .histogram
                .entry((crate::model::size_key(size), weight))
                .or_insert(0) += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Most frequent (size, weight) pair.
    ///
    /// Ties go to the smaller size, then to regular weight, so the result
    /// does not depend on run order.
    pub fn baseline(&self) -> Option<BodyBaseline> {
        self.histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then_with(|| kb.cmp(ka)))
            .map(|(&(key, weight), _)| BodyBaseline {
                font_size: key as f32 / 10.0,
                font_weight: weight,
            })
    }

    /// Distinct sizes in the document, largest first.
    pub fn distinct_sizes(&self) -> Vec<f32> {
        let mut keys: Vec<i32> = self.histogram.keys().map(|(key, _)| *key).collect();
        keys.dedup();
        keys.reverse();
        keys.into_iter().map(|key| key as f32 / 10.0).collect()
    }
}
