//! Per-document processing and batches.
//!
//! A document goes through extraction, heading classification and
//! segmentation independently of every other document, so batches fan out
//! over the rayon pool. Results come back in input order whatever the
//! completion order; warnings and failures are reported as [`Diagnostic`]s
//! over a channel shared by the workers.
//!
//! A document that yields no text, or whose fonts give no usable body
//! baseline, still produces a result with an empty outline. Only files that
//! cannot be opened or parsed fail, and they never abort their siblings.

mod request;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::extract::{extract_runs, ExtractOptions};
use crate::model::{DocumentOutline, PersonaQuery, RankedResult, Section, TextRun};
use crate::outline::{classify, HeadingConfig};
use crate::rank::{rank_sections, RankOptions};
use crate::render::{OutlinePayload, RankingPayload};
use crate::segment::segment;

pub use request::{DocumentRef, JobSpec, PersonaSpec, RankingRequest};

/// Options for processing one or more documents.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub extract: ExtractOptions,
    pub heading: HeadingConfig,
    pub rank: RankOptions,
    /// Process documents on the rayon pool
    pub parallel: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    pub fn with_heading(mut self, heading: HeadingConfig) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_rank(mut self, rank: RankOptions) -> Self {
        self.rank = rank;
        self
    }

    /// Process documents one after another.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self.rank.parallel = false;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            heading: HeadingConfig::default(),
            rank: RankOptions::default(),
            parallel: true,
        }
    }
}

/// Something worth telling the caller about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Processing succeeded with an empty outline
    Degraded {
        document_index: usize,
        document: String,
        reason: String,
    },
    /// Lenient extraction skipped unreadable pages
    SkippedPages {
        document_index: usize,
        document: String,
        pages: Vec<u32>,
    },
    /// The document could not be processed at all
    Failed {
        document_index: usize,
        document: String,
        error: String,
    },
}

impl Diagnostic {
    pub fn document_index(&self) -> usize {
        match self {
            Diagnostic::Degraded { document_index, .. }
            | Diagnostic::SkippedPages { document_index, .. }
            | Diagnostic::Failed { document_index, .. } => *document_index,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Diagnostic::Failed { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Degraded {
                document, reason, ..
            } => write!(f, "{}: empty outline ({})", document, reason),
            Diagnostic::SkippedPages {
                document, pages, ..
            } => write!(f, "{}: skipped unreadable pages {:?}", document, pages),
            Diagnostic::Failed {
                document, error, ..
            } => write!(f, "{}: {}", document, error),
        }
    }
}

/// Everything derived from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    /// File name used to refer to the document in outputs
    pub document_id: String,
    /// Position in the input batch
    pub document_index: usize,
    pub page_count: u32,
    pub runs: Vec<TextRun>,
    pub outline: DocumentOutline,
    pub sections: Vec<Section>,
    /// Pages skipped by lenient extraction
    pub skipped_pages: Vec<u32>,
    /// Why classification degraded to an empty outline, if it did
    pub degraded: Option<String>,
}

impl ProcessedDocument {
    pub fn outline_payload(&self) -> OutlinePayload {
        OutlinePayload::from(&self.outline)
    }
}

/// Outcome for one input path.
#[derive(Debug)]
pub struct DocumentResult {
    pub path: PathBuf,
    pub result: Result<ProcessedDocument>,
}

/// Results in input order plus the diagnostics raised along the way.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentResult>,
    /// Sorted by document index
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchReport {
    /// Successfully processed documents, in input order.
    pub fn processed(&self) -> impl Iterator<Item = &ProcessedDocument> {
        self.documents.iter().filter_map(|d| d.result.as_ref().ok())
    }

    pub fn failure_count(&self) -> usize {
        self.documents.iter().filter(|d| d.result.is_err()).count()
    }
}

/// Name a document by its file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract, classify and segment one document.
///
/// Empty or unclassifiable documents come back with an empty outline and
/// `degraded` set.
pub fn process_document(
    path: &Path,
    document_index: usize,
    options: &BatchOptions,
) -> Result<ProcessedDocument> {
    let document_id = document_id(path);
    let extracted = extract_runs(path, &options.extract)?;

    let (outline, degraded) = match classify(&extracted.runs, &options.heading) {
        Ok(outline) => (outline, None),
        Err(e) if e.is_degradable() => {
            log::warn!("{}: {}; emitting empty outline", document_id, e);
            (DocumentOutline::empty(), Some(e.to_string()))
        }
        Err(e) => return Err(e),
    };

    let sections = segment(
        &document_id,
        document_index,
        &outline.headings,
        &extracted.runs,
    );

    Ok(ProcessedDocument {
        document_id,
        document_index,
        page_count: extracted.page_count,
        runs: extracted.runs,
        outline,
        sections,
        skipped_pages: extracted.skipped_pages,
        degraded,
    })
}

/// Process every path, keeping input order in the report.
pub fn process_batch<P: AsRef<Path> + Sync>(paths: &[P], options: &BatchOptions) -> BatchReport {
    process_batch_with_progress(paths, options, |_| {})
}

/// Like [`process_batch`], calling `on_done` as each document finishes
/// (in completion order).
pub fn process_batch_with_progress<P, F>(
    paths: &[P],
    options: &BatchOptions,
    on_done: F,
) -> BatchReport
where
    P: AsRef<Path> + Sync,
    F: Fn(&DocumentResult) + Sync,
{
    let (sender, receiver) = crossbeam_channel::unbounded();

    let work = |(index, path): (usize, &P)| {
        let path = path.as_ref();
        let result = process_document(path, index, options);
        report(&sender, index, path, &result);
        let done = DocumentResult {
            path: path.to_path_buf(),
            result,
        };
        on_done(&done);
        done
    };

    let documents: Vec<DocumentResult> = if options.parallel {
        paths.par_iter().enumerate().map(work).collect()
    } else {
        paths.iter().enumerate().map(work).collect()
    };

    drop(sender);
    let mut diagnostics: Vec<Diagnostic> = receiver.try_iter().collect();
    diagnostics.sort_by_key(Diagnostic::document_index);

    log::info!(
        "Processed {} documents ({} failed)",
        documents.len(),
        documents.iter().filter(|d| d.result.is_err()).count()
    );
    BatchReport {
        documents,
        diagnostics,
    }
}

fn report(
    sender: &Sender<Diagnostic>,
    document_index: usize,
    path: &Path,
    result: &Result<ProcessedDocument>,
) {
    let document = document_id(path);
    let send = |diagnostic: Diagnostic| {
        // The receiver outlives every worker
        let _ = sender.send(diagnostic);
    };

    match result {
        Ok(processed) => {
            if !processed.skipped_pages.is_empty() {
                send(Diagnostic::SkippedPages {
                    document_index,
                    document: document.clone(),
                    pages: processed.skipped_pages.clone(),
                });
            }
            if let Some(reason) = &processed.degraded {
                send(Diagnostic::Degraded {
                    document_index,
                    document,
                    reason: reason.clone(),
                });
            }
        }
        Err(e) => {
            log::warn!("{}: {}", document, e);
            send(Diagnostic::Failed {
                document_index,
                document,
                error: e.to_string(),
            });
        }
    }
}

/// Outcome of ranking a batch of documents.
#[derive(Debug)]
pub struct RankingOutcome {
    pub results: Vec<RankedResult>,
    pub report: BatchReport,
}

impl RankingOutcome {
    /// Build the output payload, naming `input_documents` in the metadata.
    pub fn payload(&self, input_documents: Vec<String>, query: &PersonaQuery) -> RankingPayload {
        RankingPayload::new(input_documents, query, &self.results)
    }
}

/// Process `paths` and rank all of their sections against `query`.
///
/// Documents that fail are left out of the corpus and reported in the
/// batch diagnostics. Fails with [`Error::EmptyCorpus`] when no section
/// survives.
pub fn rank_documents<P: AsRef<Path> + Sync>(
    paths: &[P],
    query: &PersonaQuery,
    options: &BatchOptions,
) -> Result<RankingOutcome> {
    let report = process_batch(paths, options);
    let sections: Vec<Section> = report
        .processed()
        .flat_map(|doc| doc.sections.iter().cloned())
        .collect();

    let results = rank_sections(query, &sections, &options.rank)?;
    Ok(RankingOutcome { results, report })
}

/// Run a ranking request file against the PDFs in `pdf_dir`.
pub fn run_request(
    request: &RankingRequest,
    pdf_dir: &Path,
    options: &BatchOptions,
) -> Result<(RankingPayload, BatchReport)> {
    let query = request.query();
    let paths = request.resolve(pdf_dir);
    let outcome = rank_documents(&paths, &query, options)?;
    let payload = outcome.payload(request.document_names(), &query);
    Ok((payload, outcome.report))
}

/// PDF files directly inside `dir`, sorted by name.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
