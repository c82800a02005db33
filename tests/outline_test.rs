//! Integration tests for outline extraction from real PDF bytes.

mod common;

use common::{body, build_pdf, heading, page, report_pages, write_pdf, BOLD, REGULAR};
use docsift::model::HeadingLevel;
use docsift::outline::{classify, HeadingConfig, TableDetectorConfig};
use docsift::render::{to_json, JsonFormat, OutlinePayload};
use docsift::{
    extract_outline, extract_outline_from_bytes, extract_runs_from_bytes, outline_json,
    ExtractOptions, PageSelection,
};

fn introduction_pdf() -> Vec<u8> {
    build_pdf(&[
        page(vec![
            vec![heading(24, 700, "Introduction")],
            body(
                660,
                &[
                    "This guide explains how the survey was run.",
                    "It covers the sites, the teams and the tools.",
                    "Each chapter can be read on its own.",
                    "Figures are collected at the end.",
                ],
            ),
        ]),
        body(
            700,
            &[
                "Teams met every morning at the depot.",
                "Equipment was checked before leaving.",
                "Weather delays were logged separately.",
            ],
        ),
        body(
            700,
            &[
                "All data was entered the same evening.",
                "Corrections were made the next day.",
            ],
        ),
    ])
}

#[test]
fn test_single_large_heading_is_h1_without_title() {
    let outline = extract_outline_from_bytes(&introduction_pdf()).unwrap();
    let json = to_json(&OutlinePayload::from(&outline), JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        r#"{"title":"","outline":[{"level":"H1","text":"Introduction","page":1}]}"#
    );
}

#[test]
fn test_title_and_three_levels() {
    let outline = extract_outline_from_bytes(&build_pdf(&report_pages())).unwrap();
    assert_eq!(outline.title, "Annual Field Report");

    let flat: Vec<(HeadingLevel, &str, u32)> = outline
        .headings
        .iter()
        .map(|h| (h.level, h.text.as_str(), h.page))
        .collect();
    assert_eq!(
        flat,
        vec![
            (HeadingLevel::H1, "Overview", 1),
            (HeadingLevel::H1, "Methods", 2),
            (HeadingLevel::H2, "Sampling", 2),
            (HeadingLevel::H1, "Results", 3),
            (HeadingLevel::H2, "Site A", 3),
            (HeadingLevel::H3, "Notes", 3),
        ]
    );

    // The title is never reported again as a heading
    assert!(outline.headings.iter().all(|h| h.text != outline.title));

    assert_eq!(outline.tree.len(), 3);
    assert_eq!(outline.tree[1].children[0].text, "Sampling");
    assert_eq!(outline.tree[2].children[0].children[0].text, "Notes");
}

#[test]
fn test_heading_pages_are_in_range_and_ordered() {
    let pdf = build_pdf(&report_pages());
    let document = extract_runs_from_bytes(&pdf, &ExtractOptions::default()).unwrap();
    let outline = classify(&document.runs, &HeadingConfig::default()).unwrap();

    assert!(outline
        .headings
        .iter()
        .all(|h| h.page >= 1 && h.page <= document.page_count));
    assert!(outline.headings.windows(2).all(|w| w[0].page <= w[1].page));
}

#[test]
fn test_classification_is_idempotent() {
    let pdf = build_pdf(&report_pages());
    let document = extract_runs_from_bytes(&pdf, &ExtractOptions::default()).unwrap();
    let config = HeadingConfig::default();
    let first = classify(&document.runs, &config).unwrap();
    let second = classify(&document.runs, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_page_selection_moves_title_page() {
    let pdf = build_pdf(&report_pages());
    let options = ExtractOptions::new().with_pages(PageSelection::parse("2-3").unwrap());
    let document = extract_runs_from_bytes(&pdf, &options).unwrap();
    let outline = classify(&document.runs, &HeadingConfig::default()).unwrap();

    // "Methods" shares its size with "Results", so there is no distinct title
    assert_eq!(outline.title, "");
    assert_eq!(outline.headings[0].text, "Methods");
    assert_eq!(outline.headings[0].level, HeadingLevel::H1);
    assert_eq!(outline.headings.len(), 5);
}

fn budget_table_pdf() -> Vec<u8> {
    build_pdf(&[page(vec![
        vec![heading(18, 740, "Budget Summary")],
        vec![
            (BOLD, 13, 72, 700, "Region"),
            (BOLD, 13, 200, 700, "Revenue"),
            (BOLD, 13, 320, 700, "Growth"),
            (REGULAR, 11, 72, 685, "North"),
            (REGULAR, 11, 200, 685, "1,200"),
            (REGULAR, 11, 320, 685, "4%"),
            (REGULAR, 11, 72, 670, "South"),
            (REGULAR, 11, 200, 670, "900"),
            (REGULAR, 11, 320, 670, "2%"),
        ],
        body(
            640,
            &[
                "Revenue grew in both regions.",
                "The north grew faster than the south.",
                "Costs were flat.",
                "Next year's budget is unchanged.",
            ],
        ),
    ])])
}

#[test]
fn test_table_cells_are_not_headings() {
    let pdf = budget_table_pdf();

    let outline = extract_outline_from_bytes(&pdf).unwrap();
    let texts: Vec<&str> = outline.headings.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["Budget Summary"]);
}

#[test]
fn test_table_detector_thresholds_are_configurable() {
    let pdf = budget_table_pdf();
    let runs = extract_runs_from_bytes(&pdf, &ExtractOptions::default())
        .unwrap()
        .runs;

    let strict_rows = TableDetectorConfig {
        min_rows: 10,
        ..TableDetectorConfig::default()
    };
    let config = HeadingConfig::new().with_table_detector(strict_rows);
    let outline = classify(&runs, &config).unwrap();

    assert!(outline
        .headings
        .iter()
        .any(|h| h.text.contains("Revenue")));
}

#[test]
fn test_uniform_text_has_no_headings() {
    let pdf = build_pdf(&[body(
        700,
        &[
            "Every line here is set the same way.",
            "There is nothing to promote.",
            "So the outline stays empty.",
        ],
    )]);
    let outline = extract_outline_from_bytes(&pdf).unwrap();
    assert!(outline.headings.is_empty());
    assert_eq!(outline.title, "");
}

#[test]
fn test_blank_document_gives_empty_outline() {
    let outline = extract_outline_from_bytes(&build_pdf(&[vec![], vec![]])).unwrap();
    let json = to_json(&OutlinePayload::from(&outline), JsonFormat::Compact).unwrap();
    assert_eq!(json, r#"{"title":"","outline":[]}"#);
}

#[test]
fn test_outline_json_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "report.pdf", &report_pages());

    let outline = extract_outline(&path).unwrap();
    assert_eq!(outline.headings.len(), 6);

    let json = outline_json(&path, JsonFormat::Pretty).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], "Annual Field Report");
    assert_eq!(value["outline"][0]["level"], "H1");
    assert_eq!(value["outline"][5]["level"], "H3");
    assert_eq!(value["outline"][5]["page"], 3);
}
