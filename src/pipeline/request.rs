//! Ranking request files.
//!
//! ```json
//! {
//!   "documents": [{"filename": "guide.pdf", "title": "Guide"}],
//!   "persona": {"role": "Travel Planner"},
//!   "job_to_be_done": {"task": "Plan a trip of 4 days"}
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PersonaQuery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSpec {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub task: String,
}

/// A persona ranking request over a set of PDF files.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRequest {
    pub documents: Vec<DocumentRef>,
    pub persona: PersonaSpec,
    pub job_to_be_done: JobSpec,
}

impl RankingRequest {
    /// Read and validate a request file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    pub fn query(&self) -> PersonaQuery {
        PersonaQuery::new(self.persona.role.clone(), self.job_to_be_done.task.clone())
    }

    /// File names in request order.
    pub fn document_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }

    /// Document paths resolved against `pdf_dir`, in request order.
    pub fn resolve(&self, pdf_dir: &Path) -> Vec<PathBuf> {
        self.documents
            .iter()
            .map(|d| pdf_dir.join(&d.filename))
            .collect()
    }

    fn validate(self) -> Result<Self> {
        if self.documents.is_empty() {
            return Err(Error::InvalidInput(
                "request lists no documents".to_string(),
            ));
        }
        if let Some(doc) = self.documents.iter().find(|d| d.filename.trim().is_empty()) {
            return Err(Error::InvalidInput(format!(
                "document entry has an empty filename (title: {:?})",
                doc.title
            )));
        }
        if self.query().query_text().is_empty() {
            return Err(Error::InvalidInput(
                "persona role and task are both empty".to_string(),
            ));
        }
        Ok(self)
    }
}

impl FromStr for RankingRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let request: RankingRequest = serde_json::from_str(s)?;
        request.validate()
    }
}
