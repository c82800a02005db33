//! Ranking options.

use serde::{Deserialize, Serialize};

use super::{SimilarityScheme, SnippetMode};

/// Default number of sections kept in a ranking.
pub const DEFAULT_TOP_K: usize = 5;

/// Options for ranking sections against a persona query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Number of results to keep (at least 1)
    pub top_k: usize,

    /// How summary snippets are derived from body text
    pub snippet: SnippetMode,

    /// Scoring backend used by `rank_sections`
    pub similarity: SimilarityScheme,

    /// Score sections on the rayon pool
    pub parallel: bool,
}

impl RankOptions {
    /// Create new rank options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of results to keep.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Set the snippet mode.
    pub fn with_snippet(mut self, snippet: SnippetMode) -> Self {
        self.snippet = snippet;
        self
    }

    /// Cap snippets at `max_chars`, keeping the current mode.
    pub fn with_snippet_length(mut self, max_chars: usize) -> Self {
        self.snippet = match self.snippet {
            SnippetMode::FirstSentence { .. } => SnippetMode::FirstSentence { max_chars },
            SnippetMode::Chars(_) => SnippetMode::Chars(max_chars),
        };
        self
    }

    /// Set the similarity scheme.
    pub fn with_similarity(mut self, scheme: SimilarityScheme) -> Self {
        self.similarity = scheme;
        self
    }

    /// Enable or disable parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            snippet: SnippetMode::default(),
            similarity: SimilarityScheme::default(),
            parallel: true,
        }
    }
}
