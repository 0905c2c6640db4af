//! Highlighting of query terms in result text.

use log::warn;
use regex::RegexBuilder;

/// ANSI escape that starts a highlight (yellow on blue).
pub const HIGHLIGHT_START: &str = "\x1b[44;33m";
/// ANSI escape that ends a highlight.
pub const HIGHLIGHT_END: &str = "\x1b[m";

/// Compiled size limit of the highlight pattern.
const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Wrap every whole-word occurrence of any of `words` in `text` with ANSI
/// highlight escapes.
///
/// Matching is case-sensitive. Words are matched literally, so regex
/// metacharacters in them have no special meaning.
pub fn highlight<S: AsRef<str>>(text: &str, words: &[S]) -> String {
    highlight_within(text, words, PATTERN_SIZE_LIMIT)
}

fn highlight_within<S: AsRef<str>>(text: &str, words: &[S], size_limit: usize) -> String {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.as_ref())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return text.to_string();
    }

    let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
    match RegexBuilder::new(&pattern).size_limit(size_limit).build() {
        Ok(re) => re
            .replace_all(text, format!("{HIGHLIGHT_START}$0{HIGHLIGHT_END}"))
            .into_owned(),
        // only reachable when the compiled pattern exceeds the size limit
        Err(e) => {
            warn!("Highlighting skipped for {} words: {}", alternatives.len(), e);
            text.to_string()
        }
    }
}
