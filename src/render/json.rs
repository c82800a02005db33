//! JSON serialization for output payloads.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a payload to JSON.
///
/// Non-ASCII text is written as-is rather than escaped.
pub fn to_json<T: Serialize + ?Sized>(payload: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(payload),
        JsonFormat::Compact => serde_json::to_string(payload),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
