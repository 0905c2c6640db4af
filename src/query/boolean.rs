//! Boolean composites for combining terms and other composites.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::query::term::{DEFAULT_FIELDS, Term};

/// Occurrence requirements for boolean clauses.
///
/// Each variant names the clause list a child lands in when the query is
/// sent to the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

impl Occur {
    /// The key of this clause list in a `bool` query.
    pub fn clause_key(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }
}

/// The operator of a boolean composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    And,
    Or,
    /// All children are negated; a `Not` never holds positive children.
    Not,
}

impl BooleanOp {
    /// The clause list children of this operator are inserted into.
    pub fn occur(&self) -> Occur {
        match self {
            BooleanOp::And => Occur::Must,
            BooleanOp::Or => Occur::Should,
            BooleanOp::Not => Occur::MustNot,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            BooleanOp::And => "AND",
            BooleanOp::Or | BooleanOp::Not => "OR",
        }
    }
}

/// A node of a query tree: either a term or a boolean composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryNode {
    Term(Term),
    Boolean(BooleanNode),
}

impl QueryNode {
    /// Render the node as a formula.
    pub fn formula(&self) -> String {
        match self {
            QueryNode::Term(term) => term.formula(),
            QueryNode::Boolean(node) => node.formula(),
        }
    }

    /// Render the node as a query object over the default fields.
    pub fn to_query_object(&self) -> Value {
        self.to_query_object_with_fields(&DEFAULT_FIELDS)
    }

    /// Render the node as a query object over the given fields.
    pub fn to_query_object_with_fields<S: AsRef<str>>(&self, fields: &[S]) -> Value {
        match self {
            QueryNode::Term(term) => term.to_query_object_with_fields(fields),
            QueryNode::Boolean(node) => node.to_query_object_with_fields(fields),
        }
    }

    /// Get the term if this node is a leaf.
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            QueryNode::Term(term) => Some(term),
            QueryNode::Boolean(_) => None,
        }
    }

    /// Get the composite if this node is not a leaf.
    pub fn as_boolean(&self) -> Option<&BooleanNode> {
        match self {
            QueryNode::Term(_) => None,
            QueryNode::Boolean(node) => Some(node),
        }
    }

    /// Texts of all terms that are not under a negation, in tree order.
    pub fn positive_terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        self.collect_positive_terms(&mut terms);
        terms
    }

    fn collect_positive_terms<'a>(&'a self, terms: &mut Vec<&'a str>) {
        match self {
            QueryNode::Term(term) => terms.push(term.text()),
            QueryNode::Boolean(node) => node.collect_positive_terms(terms),
        }
    }
}

impl From<Term> for QueryNode {
    fn from(term: Term) -> Self {
        QueryNode::Term(term)
    }
}

impl From<BooleanNode> for QueryNode {
    fn from(node: BooleanNode) -> Self {
        QueryNode::Boolean(node)
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula())
    }
}

/// A composite that combines child nodes under AND, OR or NOT semantics.
///
/// Children keep their insertion order, which is also the order they are
/// rendered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanNode {
    op: BooleanOp,
    children: Vec<QueryNode>,
}

impl BooleanNode {
    /// Create a composite from an operator and its children.
    pub fn new(op: BooleanOp, children: Vec<QueryNode>) -> Self {
        BooleanNode { op, children }
    }

    /// Create a conjunction.
    pub fn and<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<QueryNode>,
    {
        Self::new(BooleanOp::And, children.into_iter().map(Into::into).collect())
    }

    /// Create a disjunction.
    pub fn or<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<QueryNode>,
    {
        Self::new(BooleanOp::Or, children.into_iter().map(Into::into).collect())
    }

    /// Create a negation of all given children.
    pub fn not<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<QueryNode>,
    {
        Self::new(BooleanOp::Not, children.into_iter().map(Into::into).collect())
    }

    /// Get the operator.
    pub fn op(&self) -> BooleanOp {
        self.op
    }

    /// Get the children.
    pub fn children(&self) -> &[QueryNode] {
        &self.children
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if this composite has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child to this composite's own clause list.
    pub fn add_term<N: Into<QueryNode>>(&mut self, node: N) {
        self.children.push(node.into());
    }

    /// Replace the child at `index`, keeping its position.
    ///
    /// Returns the previous child, or `None` (leaving the node untouched)
    /// when the index is out of range.
    pub fn replace_child<N: Into<QueryNode>>(&mut self, index: usize, node: N) -> Option<QueryNode> {
        let slot = self.children.get_mut(index)?;
        Some(std::mem::replace(slot, node.into()))
    }

    /// Render the composite as a formula.
    ///
    /// One child renders as the child itself; more children are folded from
    /// the left, so `[a, b, c]` under AND reads `((a AND b) AND c)`.
    pub fn formula(&self) -> String {
        let joined = fold_formulas(&self.children, self.op.keyword());
        match self.op {
            BooleanOp::And | BooleanOp::Or => joined,
            BooleanOp::Not => format!("(NOT {joined})"),
        }
    }

    /// Render the composite as a `bool` query over the default fields.
    pub fn to_query_object(&self) -> Value {
        self.to_query_object_with_fields(&DEFAULT_FIELDS)
    }

    /// Render the composite as a `bool` query over the given fields.
    ///
    /// A conjunction lifts the children of its negated conjuncts into its
    /// own `must_not` list. Empty clause lists are left out.
    pub fn to_query_object_with_fields<S: AsRef<str>>(&self, fields: &[S]) -> Value {
        let mut must = Vec::new();
        let mut should = Vec::new();
        let mut must_not = Vec::new();

        match self.op {
            BooleanOp::And => {
                for child in &self.children {
                    match child {
                        QueryNode::Boolean(node) if node.op == BooleanOp::Not => must_not.extend(
                            node.children
                                .iter()
                                .map(|c| c.to_query_object_with_fields(fields)),
                        ),
                        _ => must.push(child.to_query_object_with_fields(fields)),
                    }
                }
            }
            BooleanOp::Or => should.extend(
                self.children
                    .iter()
                    .map(|c| c.to_query_object_with_fields(fields)),
            ),
            BooleanOp::Not => must_not.extend(
                self.children
                    .iter()
                    .map(|c| c.to_query_object_with_fields(fields)),
            ),
        }

        let mut clauses = Map::new();
        for (occur, list) in [
            (Occur::Must, must),
            (Occur::Should, should),
            (Occur::MustNot, must_not),
        ] {
            if !list.is_empty() {
                clauses.insert(occur.clause_key().to_string(), Value::Array(list));
            }
        }

        json!({ "bool": clauses })
    }

    /// Texts of all terms that are not under a negation, in tree order.
    pub fn positive_terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        self.collect_positive_terms(&mut terms);
        terms
    }

    fn collect_positive_terms<'a>(&'a self, terms: &mut Vec<&'a str>) {
        if self.op == BooleanOp::Not {
            return;
        }
        for child in &self.children {
            child.collect_positive_terms(terms);
        }
    }
}

impl fmt::Display for BooleanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula())
    }
}

fn fold_formulas(children: &[QueryNode], keyword: &str) -> String {
    let mut formulas = children.iter().map(QueryNode::formula);
    match formulas.next() {
        Some(first) => formulas.fold(first, |acc, next| format!("({acc} {keyword} {next})")),
        None => "()".to_string(),
    }
}
