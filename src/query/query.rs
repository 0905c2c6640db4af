//! The query tree owned by a builder.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::query::boolean::{BooleanNode, BooleanOp, QueryNode};
use crate::query::term::{DEFAULT_FIELDS, Term};

/// A boolean full-text query with a single composite root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    root: BooleanNode,
}

impl Query {
    /// Create a query whose root is a conjunction holding only `term`.
    pub fn new(term: Term) -> Self {
        Query {
            root: BooleanNode::and([term]),
        }
    }

    /// Create a query from an arbitrary root.
    pub fn from_root(root: BooleanNode) -> Self {
        Query { root }
    }

    /// Get the root composite.
    pub fn root(&self) -> &BooleanNode {
        &self.root
    }

    /// Add a conjunct to the root.
    ///
    /// Only a conjunction root accepts conjuncts. For any other root this is
    /// a no-op and `false` is returned.
    pub fn add_term_as_conjunction<N: Into<QueryNode>>(&mut self, node: N) -> bool {
        if self.root.op() != BooleanOp::And {
            debug!(
                "root is {:?}, not a conjunction; conjunct ignored",
                self.root.op()
            );
            return false;
        }
        self.root.add_term(node);
        true
    }

    /// Replace each direct child of the root that is the term `term_text`
    /// with a disjunction of that term and one term per synonym. Synonyms
    /// inherit the match mode of the term they stand in for.
    ///
    /// Only the root's own children are scanned. Returns the number of
    /// replaced children; zero means the tree is unchanged.
    pub fn add_synonyms<S: AsRef<str>>(&mut self, term_text: &str, synonyms: &[S]) -> usize {
        let positions: Vec<usize> = self
            .root
            .children()
            .iter()
            .enumerate()
            .filter(|(_, child)| child.as_term().is_some_and(|t| t.text() == term_text))
            .map(|(index, _)| index)
            .collect();

        for &index in &positions {
            let Some(original) = self.root.children()[index].as_term().cloned() else {
                continue;
            };
            let mode = original.match_mode();
            let alternatives = std::iter::once(original)
                .chain(synonyms.iter().map(|s| Term::with_match_mode(s.as_ref(), mode)));
            self.root.replace_child(index, BooleanNode::or(alternatives));
        }

        if positions.is_empty() {
            debug!("no direct child {term_text:?} in root; synonyms ignored");
        }
        positions.len()
    }

    /// Render the query as a formula.
    pub fn formula(&self) -> String {
        self.root.formula()
    }

    /// Render the query object over the default fields.
    pub fn to_query_object(&self) -> Value {
        self.root.to_query_object_with_fields(&DEFAULT_FIELDS)
    }

    /// Render the query object over the given fields.
    pub fn to_query_object_with_fields<S: AsRef<str>>(&self, fields: &[S]) -> Value {
        self.root.to_query_object_with_fields(fields)
    }

    /// Texts of the terms the query searches for positively.
    pub fn positive_terms(&self) -> Vec<&str> {
        self.root.positive_terms()
    }

    /// Write the query object as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_to_file_with_fields(path, &DEFAULT_FIELDS)
    }

    /// Write the query object over the given fields as pretty-printed JSON.
    pub fn save_to_file_with_fields<P, S>(&self, path: P, fields: &[S]) -> Result<()>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let json = serde_json::to_string_pretty(&self.to_query_object_with_fields(fields))?;
        fs::write(path, json)?;
        Ok(())
    }
}
