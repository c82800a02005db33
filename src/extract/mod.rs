//! Text-run extraction.
//!
//! Turns a PDF into the ordered run sequence every later stage consumes:
//! one [`TextRun`] per shown string, with its font size, weight and a
//! top-down bounding box, sorted into reading order.

pub mod backend;
pub(crate) mod interpreter;
pub mod options;
mod reading;

use std::collections::HashMap;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::detect::{sniff_version, sniff_version_bytes};
use crate::error::{Error, Result};
use crate::model::{BoundingBox, FontWeight, TextRun};

pub use backend::{LopdfBackend, PdfBackend};
pub use interpreter::GlyphRun;
pub use options::{ErrorMode, ExtractOptions, PageSelection};
pub use reading::{sort_reading_order, LINE_TOLERANCE};

use backend::PageId;
use interpreter::{PageInterpreter, ASCENT};

/// The run sequence of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    /// Total pages in the document, selected or not
    pub page_count: u32,
    /// Runs in reading order
    pub runs: Vec<TextRun>,
    /// Pages skipped in lenient mode because their content was unreadable
    pub skipped_pages: Vec<u32>,
}

impl ExtractedDocument {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs on one page, in reading order.
    pub fn page_runs(&self, page: u32) -> impl Iterator<Item = &TextRun> {
        self.runs.iter().filter(move |run| run.page_number == page)
    }
}

/// Extract the runs of a PDF file.
///
/// The parsed document is dropped before this returns, whether extraction
/// succeeded or not.
///
/// # Example
///
/// ```no_run
/// use docsift::extract::{extract_runs, ExtractOptions};
///
/// let doc = extract_runs("report.pdf", &ExtractOptions::default()).unwrap();
/// println!("{} runs on {} pages", doc.runs.len(), doc.page_count);
/// ```
pub fn extract_runs<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<ExtractedDocument> {
    let path = path.as_ref();
    let version = sniff_version(path)?;
    log::debug!("{}: PDF {}", path.display(), version);

    let backend = LopdfBackend::load_file(path)?;
    RunExtractor::new(&backend, options).extract()
}

/// Extract the runs of an in-memory PDF.
pub fn extract_runs_from_bytes(data: &[u8], options: &ExtractOptions) -> Result<ExtractedDocument> {
    sniff_version_bytes(data)?;
    let backend = LopdfBackend::load_bytes(data)?;
    RunExtractor::new(&backend, options).extract()
}

/// Drives the content-stream interpreter over every selected page of a
/// backend.
pub struct RunExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    options: &'a ExtractOptions,
}

impl<'a, B: PdfBackend + ?Sized> RunExtractor<'a, B> {
    pub fn new(backend: &'a B, options: &'a ExtractOptions) -> Self {
        Self { backend, options }
    }

    pub fn extract(&self) -> Result<ExtractedDocument> {
        let pages = self.backend.pages();
        let page_count = pages.len() as u32;

        if let Some(max) = self.options.pages.max_page() {
            if max > page_count {
                match self.options.error_mode {
                    ErrorMode::Strict => return Err(Error::PageOutOfRange(max, page_count)),
                    ErrorMode::Lenient => log::warn!(
                        "Page {} requested but document has {} pages",
                        max,
                        page_count
                    ),
                }
            }
        }

        let mut document = ExtractedDocument {
            page_count,
            ..Default::default()
        };

        for (&page_number, &page_id) in &pages {
            if !self.options.pages.includes(page_number) {
                continue;
            }

            match self.page_runs(page_number, page_id) {
                Ok(mut runs) => {
                    sort_reading_order(&mut runs, LINE_TOLERANCE);
                    document.runs.append(&mut runs);
                }
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Skipping page {}: {}", page_number, e);
                    document.skipped_pages.push(page_number);
                }
            }
        }

        log::debug!(
            "Extracted {} runs from {} pages",
            document.runs.len(),
            page_count
        );
        Ok(document)
    }

    fn page_runs(&self, page_number: u32, page_id: PageId) -> Result<Vec<TextRun>> {
        let fonts: HashMap<Vec<u8>, String> = match self.backend.page_fonts(page_id) {
            Ok(fonts) => fonts.into_iter().map(|f| (f.name, f.base_font)).collect(),
            Err(e) => {
                log::debug!("Page {}: no font resources ({})", page_number, e);
                HashMap::new()
            }
        };

        let content = self.backend.page_content(page_id)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;
        let (_, page_height) = self.backend.page_size(page_id);

        let glyphs = PageInterpreter::new(self.backend, page_id, fonts).run(&ops);
        Ok(glyphs
            .into_iter()
            .filter_map(|glyph| self.to_run(page_number, page_height, glyph))
            .collect())
    }

    fn to_run(&self, page_number: u32, page_height: f32, glyph: GlyphRun) -> Option<TextRun> {
        if !glyph.font_size.is_finite() || glyph.font_size <= 0.0 {
            return None;
        }

        let text = if self.options.normalize_unicode {
            glyph.text.nfc().collect::<String>()
        } else {
            glyph.text
        };
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let top = page_height - glyph.baseline - glyph.font_size * ASCENT;
        Some(TextRun::new(
            page_number,
            text,
            glyph.font_size,
            FontWeight::from_font_name(&glyph.font_name),
            BoundingBox::new(glyph.x, top, glyph.width, glyph.font_size),
        ))
    }
}
