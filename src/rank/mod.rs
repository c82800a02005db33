//! Persona-aware section ranking.
//!
//! A [`PersonaQuery`](crate::model::PersonaQuery) is vectorized once with a
//! [`Similarity`] backend and every section's body text is scored against
//! it independently. Ordering and truncation do not depend on the backend.
//!
//! ```
//! use docsift::model::{PageRange, PersonaQuery, Section};
//! use docsift::rank::{Ranker, TermFrequency};
//!
//! let section = Section {
//!     document_id: "forms.pdf".into(),
//!     document_index: 0,
//!     heading_text: "Fillable Forms".into(),
//!     level: None,
//!     page_number: 1,
//!     page_range: PageRange::new(1, 1),
//!     body_text: "Create fillable forms for onboarding.".into(),
//!     full_text: "Fillable Forms\nCreate fillable forms for onboarding.".into(),
//!     run_range: 0..2,
//! };
//!
//! let query = PersonaQuery::new("HR professional", "Create onboarding forms");
//! let results = Ranker::new(TermFrequency::new()).rank(&query, &[section]).unwrap();
//! assert_eq!(results[0].importance_rank, 1);
//! assert!(results[0].relevance_score > 0.0);
//! ```

mod options;
mod ranker;
mod similarity;
mod snippet;
mod tokens;

pub use options::{RankOptions, DEFAULT_TOP_K};
pub use ranker::{rank_sections, Ranker};
pub use similarity::{
    cosine_similarity, HashedEmbedding, Similarity, SimilarityScheme, TermFrequency, TermVector,
};
pub use snippet::{snippet, SnippetMode};
pub use tokens::Tokenizer;
