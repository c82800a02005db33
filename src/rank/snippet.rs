//! Summary snippets for ranked sections.

use serde::{Deserialize, Serialize};

/// How a section's body text is cut down to a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnippetMode {
    /// First sentence, capped at `max_chars`
    FirstSentence { max_chars: usize },
    /// First `n` characters, cut back to a word boundary
    Chars(usize),
}

impl SnippetMode {
    /// Upper bound on snippet length in characters.
    pub fn max_chars(&self) -> usize {
        match *self {
            SnippetMode::FirstSentence { max_chars } => max_chars,
            SnippetMode::Chars(n) => n,
        }
    }
}

impl Default for SnippetMode {
    fn default() -> Self {
        SnippetMode::FirstSentence { max_chars: 400 }
    }
}

/// Derive a snippet from `text`.
///
/// Whitespace (including the run separators) collapses to single spaces.
/// Never returns more than `mode.max_chars()` characters.
pub fn snippet(text: &str, mode: SnippetMode) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let limit = mode.max_chars();
    if limit == 0 || collapsed.is_empty() {
        return String::new();
    }

    let candidate = match mode {
        SnippetMode::FirstSentence { .. } => first_sentence(&collapsed),
        SnippetMode::Chars(_) => collapsed.as_str(),
    };
    truncate_at_word(candidate, limit)
}

/// Text up to and including the first sentence terminator that is followed
/// by whitespace or the end of the text.
fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?' | '。' | '！' | '？') {
            let at_boundary = match chars.peek() {
                None => true,
                Some((_, next)) => next.is_whitespace() || !c.is_ascii(),
            };
            if at_boundary {
                return &text[..i + c.len_utf8()];
            }
        }
    }
    text
}

fn truncate_at_word(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(limit)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..cut];
    if text[cut..].starts_with(' ') {
        return head.to_string();
    }

    // Back off to the last space unless that would drop most of the text
    match head.rfind(' ') {
        Some(space) if space >= cut / 2 => head[..space].trim_end().to_string(),
        _ => head.to_string(),
    }
}
