//! Term query implementation: an atomic full-text query over a field list.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Fields every term is matched against unless configured otherwise.
pub const DEFAULT_FIELDS: [&str; 3] = ["title", "abstract", "text"];

/// How the text of a term is matched against the document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The whole text must occur as a phrase.
    #[default]
    Phrase,
    /// Any of the words may match, scored by the best matching field.
    BestFields,
}

impl MatchMode {
    /// The `type` value of a `multi_match` clause.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Phrase => "phrase",
            MatchMode::BestFields => "best_fields",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query that matches documents containing some text in any of the
/// searched fields.
///
/// Terms are immutable values; two terms are equal when their text and
/// match mode are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// The text to search for.
    text: String,
    /// The match mode.
    #[serde(default)]
    match_mode: MatchMode,
}

impl Term {
    /// Create a new phrase term.
    ///
    /// The text is taken as-is; an empty string yields a clause that is
    /// valid on the wire but matches nothing useful.
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self::with_match_mode(text, MatchMode::Phrase)
    }

    /// Create a new best-fields term.
    pub fn best_fields<T: Into<String>>(text: T) -> Self {
        Self::with_match_mode(text, MatchMode::BestFields)
    }

    /// Create a term with an explicit match mode.
    pub fn with_match_mode<T: Into<String>>(text: T, match_mode: MatchMode) -> Self {
        Term {
            text: text.into(),
            match_mode,
        }
    }

    /// Get the term text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the match mode.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Render the term as it appears in a formula.
    pub fn formula(&self) -> String {
        format!("\"{}\"", self.text)
    }

    /// Render the term as a `multi_match` clause over the default fields.
    pub fn to_query_object(&self) -> Value {
        self.to_query_object_with_fields(&DEFAULT_FIELDS)
    }

    /// Render the term as a `multi_match` clause over the given fields.
    pub fn to_query_object_with_fields<S: AsRef<str>>(&self, fields: &[S]) -> Value {
        let fields: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
        json!({
            "multi_match": {
                "query": self.text,
                "fields": fields,
                "type": self.match_mode.as_str(),
            }
        })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula())
    }
}
