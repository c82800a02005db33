//! # docsift
//!
//! Layout-driven PDF outline extraction and persona-aware section ranking.
//!
//! Headings are inferred from visual cues only (font size and weight
//! relative to the body text, position and alignment), never from tagged
//! structure or bookmarks. The same run sequence is then cut into sections
//! that can be ranked against a persona and task.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{extract_outline, render};
//!
//! fn main() -> docsift::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     let payload = render::OutlinePayload::from(&outline);
//!     println!("{}", render::to_json(&payload, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Ranking
//!
//! ```no_run
//! use docsift::model::PersonaQuery;
//! use docsift::pipeline::{rank_documents, BatchOptions};
//!
//! let query = PersonaQuery::new("HR professional", "Create onboarding forms");
//! let outcome = rank_documents(&["forms.pdf", "signatures.pdf"], &query, &BatchOptions::new())?;
//! for result in &outcome.results {
//!     println!("{} {} p.{}", result.importance_rank, result.section_title, result.page_number);
//! }
//! # Ok::<(), docsift::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Observed-size tiering**: H1–H3 from the document's own size distribution
//! - **Title resolution**: largest first-page text, kept out of the heading flow
//! - **Table exclusion**: aligned cell rows never become headings
//! - **Pluggable similarity**: term frequency or hashed embeddings
//! - **Parallel batches**: Rayon across documents and sections

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod outline;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use detect::{has_pdf_extension, sniff_version, sniff_version_bytes};
pub use error::{Error, Result};
pub use extract::{extract_runs, extract_runs_from_bytes, ExtractOptions, ExtractedDocument, PageSelection};
pub use model::{
    DocumentOutline, Heading, HeadingLevel, OutlineNode, PersonaQuery, RankedResult, Section,
    TextRun,
};
pub use outline::{classify, HeadingConfig};
pub use pipeline::{process_batch, process_document, rank_documents, BatchOptions};
pub use rank::{rank_sections, RankOptions, Ranker, SimilarityScheme, SnippetMode};
pub use render::{to_json, JsonFormat, OutlinePayload, RankingPayload};
pub use segment::segment;

use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// A file with no text, or with no usable body text, gives an empty outline
/// rather than an error.
///
/// # Example
///
/// ```no_run
/// use docsift::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for heading in &outline.headings {
///     println!("{} {} (p.{})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    extract_outline_with_options(path, &ExtractOptions::default(), &HeadingConfig::default())
}

/// Extract the outline of a PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    extract: &ExtractOptions,
    heading: &HeadingConfig,
) -> Result<DocumentOutline> {
    let document = extract_runs(path, extract)?;
    outline_or_empty(&document.runs, heading)
}

/// Extract the outline of an in-memory PDF.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<DocumentOutline> {
    let document = extract_runs_from_bytes(data, &ExtractOptions::default())?;
    outline_or_empty(&document.runs, &HeadingConfig::default())
}

/// Outline JSON (`{"title", "outline"}`) for a PDF file.
///
/// # Example
///
/// ```no_run
/// use docsift::{outline_json, JsonFormat};
///
/// let json = outline_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn outline_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_outline(path)?;
    to_json(&OutlinePayload::from(outline), format)
}

fn outline_or_empty(runs: &[TextRun], config: &HeadingConfig) -> Result<DocumentOutline> {
    match classify(runs, config) {
        Ok(outline) => Ok(outline),
        Err(e) if e.is_degradable() => {
            log::warn!("{}; emitting empty outline", e);
            Ok(DocumentOutline::empty())
        }
        Err(e) => Err(e),
    }
}
