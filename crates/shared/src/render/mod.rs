//! Markdown and HTML output sized for language-model context windows.

pub mod budget;
pub mod digest;
pub mod news;

use chrono::NaiveDate;

pub use budget::{fit_to_budget, score_event, Budgeted};
pub use digest::{DigestHtmlRenderer, DigestMarkdownRenderer};
pub use news::NewsPageRenderer;

pub const DEFAULT_MAX_TOKENS: usize = 5000;
pub const DEFAULT_CITATION_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Approximate output budget, see [`estimate_tokens`].
    pub max_tokens: usize,
    /// Longest citation text shown before it is cut with "…".
    pub citation_chars: usize,
    /// Adds a "today is" context line when set.
    pub as_of: Option<NaiveDate>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            citation_chars: DEFAULT_CITATION_CHARS,
            as_of: None,
        }
    }
}

/// One token per four characters.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Cut `text` to at most `max_chars` characters, the last one being "…".
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(max_chars - 1).collect();
    truncated = truncated.trim_end().to_string();
    truncated.push('…');
    truncated
}
