//! Content-stream interpreter.
//!
//! Walks the text operators of one page and emits a run for every text-show
//! operation, positioned with the current text and graphics matrices.

use std::collections::HashMap;

use super::backend::{ContentOp, PdfBackend, PdfValue, PageId};

/// TJ adjustment (thousandths of text space) treated as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Share of the font size above the baseline used as the glyph top.
pub(crate) const ASCENT: f32 = 0.8;

/// A shown string in PDF user space, before reading-order sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    /// Left edge of the first glyph
    pub x: f32,
    /// Baseline, measured bottom-up as in the PDF
    pub baseline: f32,
    /// Effective size after text and graphics scaling
    pub font_size: f32,
    /// Estimated advance in user space
    pub width: f32,
    pub font_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_op(op: &ContentOp) -> Self {
        Matrix {
            a: op.number(0, 1.0),
            b: op.number(1, 0.0),
            c: op.number(2, 0.0),
            d: op.number(3, 1.0),
            e: op.number(4, 0.0),
            f: op.number(5, 0.0),
        }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other` in PDF row-vector convention.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn origin(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        // TL defaults to 0; producers relying on T* without TL still expect
        // a new line, so fall back to the usual 1.2 line height.
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.matrix = Matrix::translation(tx, 0.0).then(&self.matrix);
    }
}

/// Interprets the content stream of one page.
pub struct PageInterpreter<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page_id: PageId,
    fonts: HashMap<Vec<u8>, String>,
}

impl<'a, B: PdfBackend + ?Sized> PageInterpreter<'a, B> {
    pub fn new(backend: &'a B, page_id: PageId, fonts: HashMap<Vec<u8>, String>) -> Self {
        Self {
            backend,
            page_id,
            fonts,
        }
    }

    /// Execute the operations and collect every non-blank shown string.
    pub fn run(&self, ops: &[ContentOp]) -> Vec<GlyphRun> {
        let mut runs = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut state = TextState::default();
        let mut in_text_block = false;

        for op in ops {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => ctm = ctm_stack.pop().unwrap_or(Matrix::IDENTITY),
                "cm" if op.operands.len() >= 6 => ctm = Matrix::from_op(op).then(&ctm),
                "BT" => {
                    in_text_block = true;
                    state.matrix = Matrix::IDENTITY;
                    state.line_matrix = Matrix::IDENTITY;
                }
                "ET" => in_text_block = false,
                "Tf" if op.operands.len() >= 2 => {
                    if let PdfValue::Name(resource) = &op.operands[0] {
                        state.font_name = self
                            .fonts
                            .get(resource)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(resource).to_string());
                        state.font_resource = resource.clone();
                    }
                    state.font_size = op.number(1, 12.0);
                }
                "TL" => state.leading = op.number(0, 0.0),
                "Td" if op.operands.len() >= 2 => {
                    state.move_line(op.number(0, 0.0), op.number(1, 0.0));
                }
                "TD" if op.operands.len() >= 2 => {
                    let ty = op.number(1, 0.0);
                    state.leading = -ty;
                    state.move_line(op.number(0, 0.0), ty);
                }
                "Tm" if op.operands.len() >= 6 => {
                    state.line_matrix = Matrix::from_op(op);
                    state.matrix = state.line_matrix;
                }
                "T*" => state.next_line(),
                "Tj" if in_text_block => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let text = self.decode(&state, bytes);
                        self.show(&mut state, &ctm, text, 0.0, &mut runs);
                    }
                }
                "TJ" if in_text_block => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        let (text, adjustment) = self.decode_array(&state, items);
                        self.show(&mut state, &ctm, text, adjustment, &mut runs);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if in_text_block {
                        if let Some(PdfValue::Str(bytes)) = op.operands.get(index) {
                            let text = self.decode(&state, bytes);
                            self.show(&mut state, &ctm, text, 0.0, &mut runs);
                        }
                    }
                }
                _ => {}
            }
        }

        runs
    }

    fn decode(&self, state: &TextState, bytes: &[u8]) -> String {
        self.backend
            .decode_text(self.page_id, &state.font_resource, bytes)
    }

    /// Decode a TJ array. Returns the text and the summed kerning in text
    /// space units (positive moves right).
    fn decode_array(&self, state: &TextState, items: &[PdfValue]) -> (String, f32) {
        let mut combined = String::new();
        let mut adjustment = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(state, bytes)),
                other => {
                    let Some(n) = other.as_number() else { continue };
                    let shift = -n;
                    adjustment += shift / 1000.0 * state.font_size;
                    if shift > TJ_SPACE_THRESHOLD {
                        let needs_space = combined
                            .chars()
                            .last()
                            .map(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                            .unwrap_or(false);
                        if needs_space {
                            combined.push(' ');
                        }
                    }
                }
            }
        }

        (combined, adjustment)
    }

    fn show(
        &self,
        state: &mut TextState,
        ctm: &Matrix,
        text: String,
        adjustment: f32,
        runs: &mut Vec<GlyphRun>,
    ) {
        let char_count = text.chars().count() as f32;
        // Glyph widths are not decoded; half an em per character.
        let advance = char_count * state.font_size * 0.5 + adjustment;
        let rendering = state.matrix.then(ctm);

        if !text.trim().is_empty() {
            let (x, baseline) = rendering.origin();
            let font_size = state.font_size * rendering.vertical_scale();
            let width = advance.max(0.0) * rendering.horizontal_scale();
            runs.push(GlyphRun {
                text,
                x,
                baseline,
                font_size,
                width,
                font_name: state.font_name.clone(),
            });
        }

        state.advance(advance);
    }
}

/// Characters from scripts that do not separate words with spaces.
///
/// Hangul is deliberately absent: Korean uses word spaces.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::extract::backend::{decode_text_simple, BackendFontInfo};
    use std::collections::BTreeMap;

    struct FakeBackend;

    impl PdfBackend for FakeBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::new()
        }
        fn page_size(&self, _page: PageId) -> (f32, f32) {
            (612.0, 792.0)
        }
        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(vec![])
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(vec![])
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(vec![])
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn fonts() -> HashMap<Vec<u8>, String> {
        HashMap::from([
            (b"F1".to_vec(), "Helvetica".to_string()),
            (b"F2".to_vec(), "Helvetica-Bold".to_string()),
        ])
    }

    fn name(n: &str) -> PdfValue {
        PdfValue::Name(n.as_bytes().to_vec())
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    #[test]
    fn test_positions_and_fonts() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F2"), num(24.0)]),
            ContentOp::new("Td", vec![num(72.0), num(700.0)]),
            ContentOp::new("Tj", vec![string("Introduction")]),
            ContentOp::new("Tf", vec![name("F1"), num(11.0)]),
            ContentOp::new("Td", vec![num(0.0), num(-30.0)]),
            ContentOp::new("Tj", vec![string("Body text.")]),
            ContentOp::new("ET", vec![]),
        ];

        let runs = PageInterpreter::new(&FakeBackend, (1, 0), fonts()).run(&ops);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Introduction");
        assert_eq!(runs[0].font_name, "Helvetica-Bold");
        assert_eq!(runs[0].font_size, 24.0);
        assert_eq!((runs[0].x, runs[0].baseline), (72.0, 700.0));
        assert_eq!(runs[1].font_size, 11.0);
        assert_eq!((runs[1].x, runs[1].baseline), (72.0, 670.0));
    }

    #[test]
    fn test_text_matrix_scales_font_size() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(1.0)]),
            ContentOp::new(
                "Tm",
                vec![num(18.0), num(0.0), num(0.0), num(18.0), num(50.0), num(500.0)],
            ),
            ContentOp::new("Tj", vec![string("Scaled")]),
            ContentOp::new("ET", vec![]),
        ];

        let runs = PageInterpreter::new(&FakeBackend, (1, 0), fonts()).run(&ops);
        assert_eq!(runs[0].font_size, 18.0);
        assert_eq!((runs[0].x, runs[0].baseline), (50.0, 500.0));
    }

    #[test]
    fn test_ctm_is_applied_and_restored() {
        let ops = vec![
            ContentOp::new("q", vec![]),
            ContentOp::new(
                "cm",
                vec![num(2.0), num(0.0), num(0.0), num(2.0), num(10.0), num(20.0)],
            ),
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10.0)]),
            ContentOp::new("Td", vec![num(5.0), num(5.0)]),
            ContentOp::new("Tj", vec![string("Zoomed")]),
            ContentOp::new("ET", vec![]),
            ContentOp::new("Q", vec![]),
            ContentOp::new("BT", vec![]),
            ContentOp::new("Td", vec![num(5.0), num(5.0)]),
            ContentOp::new("Tj", vec![string("Plain")]),
            ContentOp::new("ET", vec![]),
        ];

        let runs = PageInterpreter::new(&FakeBackend, (1, 0), fonts()).run(&ops);
        assert_eq!(runs[0].font_size, 20.0);
        assert_eq!((runs[0].x, runs[0].baseline), (20.0, 30.0));
        assert_eq!(runs[1].font_size, 10.0);
        assert_eq!((runs[1].x, runs[1].baseline), (5.0, 5.0));
    }

    #[test]
    fn test_tj_array_inserts_word_spaces() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10.0)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    string("Hello"),
                    PdfValue::Integer(-250),
                    string("world"),
                    PdfValue::Integer(-20),
                    string("!"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ];

        let runs = PageInterpreter::new(&FakeBackend, (1, 0), fonts()).run(&ops);
        assert_eq!(runs[0].text, "Hello world!");
    }

    #[test]
    fn test_next_line_uses_leading() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10.0)]),
            ContentOp::new("TL", vec![num(14.0)]),
            ContentOp::new("Td", vec![num(72.0), num(600.0)]),
            ContentOp::new("Tj", vec![string("one")]),
            ContentOp::new("'", vec![string("two")]),
            ContentOp::new("ET", vec![]),
        ];

        let runs = PageInterpreter::new(&FakeBackend, (1, 0), fonts()).run(&ops);
        assert_eq!(runs[1].text, "two");
        assert_eq!((runs[1].x, runs[1].baseline), (72.0, 586.0));
    }

    #[test]
    fn test_blank_strings_are_skipped() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tj", vec![string("   ")]),
            ContentOp::new("ET", vec![]),
            ContentOp::new("Tj", vec![string("outside BT")]),
        ];

        let runs = PageInterpreter::new(&FakeBackend, (1, 0), fonts()).run(&ops);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('カ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
