//! Persona queries and ranked results.

use serde::{Deserialize, Serialize};

/// Persona plus job-to-be-done, combined into one query before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaQuery {
    pub persona_description: String,
    pub task_description: String,
}

impl PersonaQuery {
    pub fn new(persona: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            persona_description: persona.into(),
            task_description: task.into(),
        }
    }

    /// The text that gets vectorized for similarity scoring.
    pub fn query_text(&self) -> String {
        format!(
            "{} {}",
            self.persona_description.trim(),
            self.task_description.trim()
        )
        .trim()
        .to_string()
    }
}

/// One entry of the ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub document_id: String,
    pub page_number: u32,
    /// Higher is more relevant, in `[0, 1]`
    pub relevance_score: f32,
    pub summary_snippet: String,
    pub section_title: String,
    /// 1-based position in the ranked output
    pub importance_rank: u32,
    /// Index of the ranked section in the ranker's input
    pub section_index: usize,
}
