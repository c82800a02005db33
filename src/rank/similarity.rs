//! Pluggable text similarity.
//!
//! The ranker only needs `similarity(query, text) -> [0, 1]`. Backends
//! split that into vectorizing and scoring so a query is vectorized once
//! and compared against every section.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::tokens::Tokenizer;

/// A text similarity capability.
///
/// Implementations are immutable once built and shared across scoring
/// threads.
pub trait Similarity: Send + Sync {
    /// The vector representation of a text.
    type Vector: Send + Sync;

    /// Backend name for logs.
    fn name(&self) -> &'static str;

    fn vectorize(&self, text: &str) -> Self::Vector;

    /// Similarity of two vectors, in `[0, 1]`.
    fn score(&self, query: &Self::Vector, text: &Self::Vector) -> f32;

    /// Similarity of two texts, in `[0, 1]`.
    fn similarity(&self, query: &str, text: &str) -> f32 {
        self.score(&self.vectorize(query), &self.vectorize(text))
    }
}

/// Which similarity backend to rank with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityScheme {
    /// Sparse log-scaled term frequencies, cosine similarity
    #[default]
    TermFrequency,
    /// Dense hashed embedding of words and character trigrams
    Embedding,
}

impl SimilarityScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityScheme::TermFrequency => "term-frequency",
            SimilarityScheme::Embedding => "embedding",
        }
    }
}

impl fmt::Display for SimilarityScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tf" | "term-frequency" | "term_frequency" | "termfrequency" => {
                Ok(SimilarityScheme::TermFrequency)
            }
            "embedding" | "embeddings" | "dense" => Ok(SimilarityScheme::Embedding),
            other => Err(Error::InvalidInput(format!(
                "unknown similarity scheme '{}' (expected 'term-frequency' or 'embedding')",
                other
            ))),
        }
    }
}

/// Cosine similarity of two dense vectors; 0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Sparse term-frequency vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: HashMap<String, f32>,
    norm: f32,
}

impl TermVector {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, term: &str) -> f32 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }
}

/// Log-scaled term frequency with cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct TermFrequency {
    tokenizer: Tokenizer,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Similarity for TermFrequency {
    type Vector = TermVector;

    fn name(&self) -> &'static str {
        "term-frequency"
    }

    fn vectorize(&self, text: &str) -> TermVector {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in self.tokenizer.tokens(text) {
            *counts.entry(token).or_insert(0) += 1;
        }

        let weights: HashMap<String, f32> = counts
            .into_iter()
            .map(|(term, count)| (term, 1.0 + (count as f32).ln()))
            .collect();
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        TermVector { weights, norm }
    }

    fn score(&self, query: &TermVector, text: &TermVector) -> f32 {
        if query.norm == 0.0 || text.norm == 0.0 {
            return 0.0;
        }
        let (small, large) = if query.weights.len() <= text.weights.len() {
            (query, text)
        } else {
            (text, query)
        };
        let dot: f32 = small
            .weights
            .iter()
            .map(|(term, w)| w * large.weight(term))
            .sum();
        (dot / (query.norm * text.norm)).clamp(0.0, 1.0)
    }
}

/// Feature-hashed dense embedding.
///
/// Words and their character trigrams are hashed (FNV-1a) into a fixed
/// number of signed buckets, then L2-normalized. Needs no model files, so
/// it runs in CPU-only, offline environments; trigrams give it some
/// tolerance for inflections and compound words that exact terms miss.
#[derive(Debug, Clone)]
pub struct HashedEmbedding {
    dimensions: usize,
    tokenizer: Tokenizer,
}

impl HashedEmbedding {
    pub const DEFAULT_DIMENSIONS: usize = 384;

    /// Weight of each character trigram relative to a whole word.
    const TRIGRAM_WEIGHT: f32 = 0.5;

    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(16),
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a(feature.as_bytes());
        let index = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }
}

impl Default for HashedEmbedding {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

impl Similarity for HashedEmbedding {
    type Vector = Vec<f32>;

    fn name(&self) -> &'static str {
        "embedding"
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in self.tokenizer.tokens(text) {
            self.add_feature(&mut vector, &token, 1.0);

            let padded: Vec<char> = format!("#{}#", token).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, &trigram, Self::TRIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 1e-10 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    fn score(&self, query: &Vec<f32>, text: &Vec<f32>) -> f32 {
        cosine_similarity(query, text).clamp(0.0, 1.0)
    }
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(PRIME)
    })
}
