//! PDF backend abstraction layer.
//!
//! Isolates the concrete PDF library (lopdf) from the run extractor, so the
//! content-stream interpreter only ever sees [`ContentOp`]s and decoded text.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter, used when a page has no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }

    /// Numeric operand at `index`, or `default` when missing or not a number.
    pub fn number(&self, index: usize, default: f32) -> f32 {
        self.operands
            .get(index)
            .and_then(PdfValue::as_number)
            .unwrap_or(default)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page width and height in points.
    fn page_size(&self, page: PageId) -> (f32, f32);

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
///
/// The parsed document is owned by the backend and released when it is
/// dropped, on success and error paths alike.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; extracted text may be unreadable");
        }
        Self { doc }
    }

    /// PDF version string from the header.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Look up a page attribute, following the `Parent` chain for
    /// inheritable keys such as `MediaBox`.
    fn inherited<'a>(&'a self, mut dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        for _ in 0..32 {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_size(&self, page: PageId) -> (f32, f32) {
        let media_box = self
            .doc
            .get_dictionary(page)
            .ok()
            .and_then(|dict| self.inherited(dict, b"MediaBox"))
            .and_then(|obj| match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_array().ok());

        match media_box {
            Some(values) if values.len() >= 4 => {
                let coords: Vec<f32> = values
                    .iter()
                    .take(4)
                    .map(|v| v.as_float().unwrap_or(0.0))
                    .collect();
                let width = (coords[2] - coords[0]).abs();
                let height = (coords[3] - coords[1]).abs();
                if width > 0.0 && height > 0.0 {
                    (width, height)
                } else {
                    DEFAULT_PAGE_SIZE
                }
            }
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self.doc.get_page_fonts(page)?;

        Ok(lopdf_fonts
            .iter()
            .map(|(name, font_dict)| {
                let base_font = font_dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                BackendFontInfo {
                    name: name.clone(),
                    base_font,
                }
            })
            .collect())
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content streams is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        let stream_bytes = |obj: &Object| -> Option<Vec<u8>> {
            let stream = match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok()?.as_stream().ok()?,
                Object::Stream(s) => s,
                _ => return None,
            };
            if stream.dict.get(b"Filter").is_err() {
                Some(stream.content.clone())
            } else {
                stream.decompressed_content().ok()
            }
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Array(arr) => Ok(join_streams(arr.iter().filter_map(stream_bytes))),
                obj => stream_bytes(obj)
                    .ok_or_else(|| Error::Parse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(join_streams(arr.iter().filter_map(stream_bytes))),
            _ => Err(Error::Parse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

fn join_streams(streams: impl Iterator<Item = Vec<u8>>) -> Vec<u8> {
    let mut content = Vec::new();
    for data in streams {
        content.extend_from_slice(&data);
        content.push(b' ');
    }
    content
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
