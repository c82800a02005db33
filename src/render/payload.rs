//! Output payloads.
//!
//! `OutlinePayload` is the per-document outline file and `RankingPayload`
//! the persona ranking file. Field names are part of the output format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DocumentOutline, Heading, PersonaQuery, RankedResult};

/// `{"title": .., "outline": [{"level", "text", "page"}, ..]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlinePayload {
    pub title: String,
    pub outline: Vec<Heading>,
}

impl OutlinePayload {
    /// Use `fallback` as the title when none was resolved.
    pub fn with_title_fallback(mut self, fallback: &str) -> Self {
        if self.title.trim().is_empty() {
            self.title = fallback.to_string();
        }
        self
    }
}

impl From<&DocumentOutline> for OutlinePayload {
    fn from(outline: &DocumentOutline) -> Self {
        Self {
            title: outline.title.clone(),
            outline: outline.headings.clone(),
        }
    }
}

impl From<DocumentOutline> for OutlinePayload {
    fn from(outline: DocumentOutline) -> Self {
        Self {
            title: outline.title,
            outline: outline.headings,
        }
    }
}

/// Echo of the ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// RFC 3339
    pub processing_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub page_number: u32,
    pub section_title: String,
    pub importance_rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSectionAnalysis {
    pub document: String,
    pub page_number: u32,
    pub refined_text: String,
}

/// Ranking output, ordered by `importance_rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPayload {
    pub metadata: RankingMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub sub_section_analysis: Vec<SubSectionAnalysis>,
}

impl RankingPayload {
    /// Build a payload stamped with the current time.
    pub fn new(input_documents: Vec<String>, query: &PersonaQuery, results: &[RankedResult]) -> Self {
        Self::with_timestamp(input_documents, query, results, Utc::now())
    }

    pub fn with_timestamp(
        input_documents: Vec<String>,
        query: &PersonaQuery,
        results: &[RankedResult],
        processing_timestamp: DateTime<Utc>,
    ) -> Self {
        let mut ordered: Vec<&RankedResult> = results.iter().collect();
        ordered.sort_by_key(|r| r.importance_rank);

        Self {
            metadata: RankingMetadata {
                input_documents,
                persona: query.persona_description.clone(),
                job_to_be_done: query.task_description.clone(),
                processing_timestamp,
            },
            extracted_sections: ordered
                .iter()
                .map(|r| ExtractedSection {
                    document: r.document_id.clone(),
                    page_number: r.page_number,
                    section_title: r.section_title.clone(),
                    importance_rank: r.importance_rank,
                })
                .collect(),
            sub_section_analysis: ordered
                .iter()
                .map(|r| SubSectionAnalysis {
                    document: r.document_id.clone(),
                    page_number: r.page_number,
                    refined_text: r.summary_snippet.clone(),
                })
                .collect(),
        }
    }
}
