//! Text filters that keep page furniture out of the outline.

use regex::Regex;

use crate::error::{Error, Result};

use super::HeadingConfig;

/// Page labels, version stamps, dates, clock times and filler rules.
const NOISE_PATTERN: &str = concat!(
    r"(?i)^(?:",
    r"page\s+\d+(?:\s+of\s+\d+)?",
    r"|version\s+\d{4}",
    r"|(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?",
    r"|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)",
    r"\.?\s+\d{1,2},\s+\d{4}",
    r"|\d{1,2}:\d{2}\s*(?:am|pm|a\.m\.|p\.m\.)",
    r"|\d{1,2}/\d{1,2}/\d{4}",
    r"|[.·•_\-\s]+",
    r")$"
);

/// Accepts or rejects heading text.
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    noise: Regex,
    min_len: usize,
    max_chars: usize,
}

impl HeadingFilter {
    pub fn new(config: &HeadingConfig) -> Result<Self> {
        let noise = Regex::new(NOISE_PATTERN)
            .map_err(|e| Error::Classification(format!("heading filter: {}", e)))?;
        Ok(Self {
            noise,
            min_len: config.min_heading_len,
            max_chars: config.max_heading_chars,
        })
    }

    /// Whether `text` may be used as a heading.
    pub fn accepts(&self, text: &str) -> bool {
        let text = text.trim();
        let len = text.chars().count();
        len >= self.min_len && len <= self.max_chars && !self.noise.is_match(text)
    }
}

/// Whether a resolved title is usable: long enough and not only symbols.
pub fn is_valid_title(text: &str, min_len: usize) -> bool {
    let text = text.trim();
    text.chars().count() >= min_len && text.chars().any(char::is_alphanumeric)
}
