//! The specification log: what the user asked for, edit by edit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::term::Term;

/// Payloads longer than this are abbreviated when displayed.
const MAX_DISPLAY_CHARS: usize = 60;
/// Characters kept from each end of an abbreviated payload.
const DISPLAY_EDGE_CHARS: usize = 26;

/// The intent recorded by one specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum SpecificationKind {
    /// The seed term a builder starts from. Always the first entry.
    QueryTerm(Term),
    TermInclusion(Term),
    TermExclusion(Term),
    DocumentInclusion(Vec<String>),
    DocumentExclusion(Vec<String>),
    Synonym { term: String, synonyms: Vec<String> },
}

impl SpecificationKind {
    /// Short name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            SpecificationKind::QueryTerm(_) => "query_term",
            SpecificationKind::TermInclusion(_) => "term_inclusion",
            SpecificationKind::TermExclusion(_) => "term_exclusion",
            SpecificationKind::DocumentInclusion(_) => "document_inclusion",
            SpecificationKind::DocumentExclusion(_) => "document_exclusion",
            SpecificationKind::Synonym { .. } => "synonym",
        }
    }

    fn payload(&self) -> String {
        match self {
            SpecificationKind::QueryTerm(term)
            | SpecificationKind::TermInclusion(term)
            | SpecificationKind::TermExclusion(term) => term.formula(),
            SpecificationKind::DocumentInclusion(ids)
            | SpecificationKind::DocumentExclusion(ids) => format!("[{}]", ids.join(", ")),
            SpecificationKind::Synonym { term, synonyms } => {
                format!("{term} => [{}]", synonyms.join(", "))
            }
        }
    }
}

/// One logged user-intent edit, with the comment the user gave for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpecification {
    specification: SpecificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl QuerySpecification {
    pub fn new(specification: SpecificationKind, comment: Option<String>) -> Self {
        QuerySpecification {
            specification,
            comment,
        }
    }

    pub fn kind(&self) -> &SpecificationKind {
        &self.specification
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl fmt::Display for QuerySpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -- {}",
            self.specification.name(),
            abbreviate(&self.specification.payload())
        )?;
        if let Some(comment) = &self.comment {
            write!(f, " ({comment})")?;
        }
        Ok(())
    }
}

fn abbreviate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= MAX_DISPLAY_CHARS {
        return text.to_string();
    }
    let head: String = chars[..DISPLAY_EDGE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - DISPLAY_EDGE_CHARS..].iter().collect();
    format!("{head} ... {tail}")
}
