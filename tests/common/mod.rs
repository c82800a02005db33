//! Shared fixtures: small PDFs built with lopdf's object API.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A line of text: font resource ("F1" regular, "F2" bold), size, x and
/// baseline y in PDF user space (origin bottom-left), text.
pub type Line = (&'static str, i64, i64, i64, &'static str);

pub const REGULAR: &str = "F1";
pub const BOLD: &str = "F2";

/// Build a letter-size PDF with one entry per page.
pub fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (font, size, x, y, text) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::from(*font), Object::Integer(*size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(*x), Object::Integer(*y)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => regular, "F2" => bold },
            },
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Write a PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<Line>]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, build_pdf(pages)).unwrap();
    path
}

/// Body lines of 11pt regular text, 14pt apart, starting at baseline `top`.
pub fn body(top: i64, lines: &[&'static str]) -> Vec<Line> {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| (REGULAR, 11, 72, top - 14 * i as i64, *text))
        .collect()
}

/// A heading line at the left margin.
pub fn heading(size: i64, y: i64, text: &'static str) -> Line {
    (BOLD, size, 72, y, text)
}

/// Concatenate groups of lines into one page.
pub fn page(groups: Vec<Vec<Line>>) -> Vec<Line> {
    groups.into_iter().flatten().collect()
}

/// Three pages: a title, three H1s, two H2s and one H3.
pub fn report_pages() -> Vec<Vec<Line>> {
    vec![
        page(vec![
            vec![heading(28, 740, "Annual Field Report"), heading(20, 690, "Overview")],
            body(
                660,
                &[
                    "The season ran from April to September.",
                    "Three sites were visited twice.",
                    "Results are summarised below.",
                    "Raw data is available on request.",
                ],
            ),
        ]),
        page(vec![
            vec![heading(20, 740, "Methods")],
            body(
                710,
                &[
                    "Transects were walked at dawn.",
                    "Counts were repeated by a second observer.",
                    "Disagreements were resolved on site.",
                ],
            ),
            vec![heading(15, 650, "Sampling")],
            body(
                625,
                &[
                    "Plots were chosen at random.",
                    "Each plot covered ten square metres.",
                    "Edges were marked with flags.",
                ],
            ),
        ]),
        page(vec![
            vec![heading(20, 740, "Results"), heading(15, 700, "Site A")],
            body(
                675,
                &[
                    "Numbers rose for the third year.",
                    "Nesting began two weeks early.",
                    "No new species were recorded.",
                ],
            ),
            vec![(BOLD, 13, 72, 620, "Notes")],
            body(
                600,
                &[
                    "Flooding closed the north path in May.",
                    "Counts there resumed in June.",
                ],
            ),
        ]),
    ]
}
