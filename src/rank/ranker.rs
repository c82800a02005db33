//! Section ranking.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{PersonaQuery, RankedResult, Section};

use super::similarity::{HashedEmbedding, Similarity, SimilarityScheme, TermFrequency};
use super::snippet::snippet;
use super::RankOptions;

/// Ranks sections by similarity to a persona query.
///
/// The backend is built once and shared read-only by every scoring task.
#[derive(Debug, Clone)]
pub struct Ranker<S: Similarity> {
    backend: S,
    options: RankOptions,
}

impl<S: Similarity> Ranker<S> {
    pub fn new(backend: S) -> Self {
        Self::with_options(backend, RankOptions::default())
    }

    pub fn with_options(backend: S, options: RankOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Score every section against `query`, in input order.
    ///
    /// Sections without body text score 0.
    pub fn score_all(&self, query: &PersonaQuery, sections: &[Section]) -> Vec<f32> {
        let query_vector = self.backend.vectorize(&query.query_text());
        let score = |section: &Section| -> f32 {
            if !section.has_body() {
                return 0.0;
            }
            let text_vector = self.backend.vectorize(&section.body_text);
            let value = self.backend.score(&query_vector, &text_vector);
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            }
        };

        if self.options.parallel {
            sections.par_iter().map(score).collect()
        } else {
            sections.iter().map(score).collect()
        }
    }

    /// Rank `sections`, best first, keeping at most `top_k`.
    ///
    /// Equal scores fall back to document order, then page order, then
    /// input order, so the output is deterministic however scoring is
    /// scheduled.
    pub fn rank(&self, query: &PersonaQuery, sections: &[Section]) -> Result<Vec<RankedResult>> {
        if sections.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let scores = self.score_all(query, sections);
        let mut order: Vec<usize> = (0..sections.len()).collect();
        order.sort_by(|&a, &b| compare(a, b, &scores, sections));
        order.truncate(self.options.top_k.max(1));

        log::debug!(
            "ranked {} sections with {}, kept {}",
            sections.len(),
            self.backend.name(),
            order.len()
        );

        Ok(order
            .into_iter()
            .enumerate()
            .map(|(position, index)| {
                let section = &sections[index];
                RankedResult {
                    document_id: section.document_id.clone(),
                    page_number: section.page_number,
                    relevance_score: scores[index],
                    summary_snippet: summarize(section, &self.options),
                    section_title: section.heading_text.clone(),
                    importance_rank: position as u32 + 1,
                    section_index: index,
                }
            })
            .collect())
    }
}

fn compare(a: usize, b: usize, scores: &[f32], sections: &[Section]) -> Ordering {
    scores[b]
        .total_cmp(&scores[a])
        .then_with(|| sections[a].document_index.cmp(&sections[b].document_index))
        .then_with(|| sections[a].page_number.cmp(&sections[b].page_number))
        .then_with(|| a.cmp(&b))
}

/// Snippet of the body, or of the heading when the section has no body.
fn summarize(section: &Section, options: &RankOptions) -> String {
    if section.has_body() {
        snippet(&section.body_text, options.snippet)
    } else {
        snippet(&section.heading_text, options.snippet)
    }
}

/// Rank with the backend selected by `options.similarity`.
pub fn rank_sections(
    query: &PersonaQuery,
    sections: &[Section],
    options: &RankOptions,
) -> Result<Vec<RankedResult>> {
    match options.similarity {
        SimilarityScheme::TermFrequency => {
            Ranker::with_options(TermFrequency::new(), options.clone()).rank(query, sections)
        }
        SimilarityScheme::Embedding => {
            Ranker::with_options(HashedEmbedding::default(), options.clone()).rank(query, sections)
        }
    }
}
