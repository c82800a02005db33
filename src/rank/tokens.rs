//! Tokenization shared by the similarity backends.

use std::collections::HashSet;

/// Common English function words that carry no topical signal.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
];

/// Lowercases, splits on non-alphanumerics, drops stopwords and applies a
/// light suffix stemmer so that "checklists" and "checklist" meet.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<&'static str>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .filter(|word| !self.stopwords.contains(word.as_str()))
            .map(|word| stem(&word))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip common inflectional suffixes. Words of four characters or fewer
/// are left alone.
pub(crate) fn stem(word: &str) -> String {
    let len = word.chars().count();
    if len <= 4 || !word.is_ascii() {
        return word.to_string();
    }

    if let Some(base) = word.strip_suffix("ies") {
        return format!("{}y", base);
    }
    for suffix in ["ing", "ed"] {
        if let Some(base) = word.strip_suffix(suffix) {
            if base.len() >= 3 {
                return undouble(base).to_string();
            }
        }
    }
    if let Some(base) = word.strip_suffix('s') {
        if !base.ends_with('s') && !base.ends_with('u') && !base.ends_with('i') {
            return base.to_string();
        }
    }
    word.to_string()
}

/// "plann" -> "plan", "hopp" -> "hop". Doubled l, s and z are kept
/// ("called", "passed"), as are results shorter than three letters.
fn undouble(base: &str) -> &str {
    let bytes = base.as_bytes();
    let n = bytes.len();
    if n > 3 && bytes[n - 1] == bytes[n - 2] {
        let last = bytes[n - 1];
        let consonant = last.is_ascii_alphabetic() && !b"aeiou".contains(&last);
        if consonant && !b"lsz".contains(&last) {
            return &base[..n - 1];
        }
    }
    base
}
