//! Rendering of outline and ranking results as JSON.

mod json;
mod payload;

pub use json::{to_json, JsonFormat};
pub use payload::{
    ExtractedSection, OutlinePayload, RankingMetadata, RankingPayload, SubSectionAnalysis,
};
