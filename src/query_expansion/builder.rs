//! Builder that turns a sequence of refinements into a query.

use std::fmt;
use std::path::Path;

use log::debug;
use serde_json::Value;
use uuid::Uuid;

use crate::config::AskmeConfig;
use crate::error::Result;
use crate::query::{BooleanNode, Query, Term};

use super::history::{History, Snapshot};
use super::specification::{QuerySpecification, SpecificationKind};
use super::types::{Edit, ResultSummary, ScriptedEdit};

/// Builds a boolean query from a seed term and a series of edits.
///
/// Every edit is logged as one or more specifications and captured in a
/// history snapshot, so the way from the seed term to the final query can
/// be replayed and explained. The builder never searches by itself; callers
/// run [`QueryBuilder::to_query_object`] against their engine and hand the
/// results back through [`QueryBuilder::attach_result`].
///
/// # Example
///
/// ```
/// use askme::query_expansion::QueryBuilder;
///
/// let mut builder = QueryBuilder::new("earthquake");
/// builder.exclude_documents(["d1", "d2"]);
/// builder.include_terms(["tectonic activity"]);
/// builder.exclude_terms(["shock"]);
///
/// assert_eq!(
///     builder.formula(),
///     r#"(("earthquake" AND "tectonic activity") AND (NOT "shock"))"#
/// );
/// assert_eq!(builder.history().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    id: Uuid,
    config: AskmeConfig,
    specifications: Vec<QuerySpecification>,
    query: Query,
    document_inclusions: Vec<String>,
    document_exclusions: Vec<String>,
    history: History,
}

impl QueryBuilder {
    /// Create a builder for a seed term with the default configuration.
    pub fn new<S: Into<String>>(term: S) -> Self {
        Self::with_config(term, AskmeConfig::default())
    }

    /// Create a builder for a seed term.
    pub fn with_config<S: Into<String>>(term: S, config: AskmeConfig) -> Self {
        let term = Term::with_match_mode(term, config.default_match_mode);
        let specifications = vec![QuerySpecification::new(
            SpecificationKind::QueryTerm(term.clone()),
            None,
        )];
        let query = Query::new(term);
        let history = History::new(Snapshot::capture(
            0,
            &specifications,
            &[],
            &[],
            query.formula(),
        ));

        let builder = QueryBuilder {
            id: Uuid::new_v4(),
            config,
            specifications,
            query,
            document_inclusions: Vec::new(),
            document_exclusions: Vec::new(),
            history,
        };
        debug!("[{}] seeded with {}", builder.id, builder.query.formula());
        builder
    }

    /// Rebuild a query from a seed term and an edit script.
    pub fn replay<S: Into<String>>(term: S, edits: &[ScriptedEdit], config: AskmeConfig) -> Self {
        let mut builder = Self::with_config(term, config);
        for scripted in edits {
            builder.apply(scripted.edit.clone(), scripted.comment.clone());
        }
        builder
    }

    /// Apply one edit, tagging the specifications it logs with `comment`.
    ///
    /// An edit with an empty argument list changes nothing and returns
    /// `false`. Any other edit logs at least one specification, records
    /// one snapshot and returns `true`, even when the query tree itself
    /// could not take the change.
    pub fn apply(&mut self, edit: Edit, comment: Option<String>) -> bool {
        if edit.is_empty() {
            debug!("[{}] empty {:?} ignored", self.id, edit);
            return false;
        }

        match edit {
            Edit::IncludeTerms { terms } => {
                for text in terms {
                    let term = self.new_term(text);
                    self.log(SpecificationKind::TermInclusion(term.clone()), &comment);
                    self.query.add_term_as_conjunction(term);
                }
            }
            Edit::ExcludeTerms { terms } => {
                for text in terms {
                    let term = self.new_term(text);
                    self.log(SpecificationKind::TermExclusion(term.clone()), &comment);
                    self.query.add_term_as_conjunction(BooleanNode::not([term]));
                }
            }
            Edit::IncludeDocuments { ids } => {
                self.log(SpecificationKind::DocumentInclusion(ids.clone()), &comment);
                self.document_inclusions.extend(ids);
            }
            Edit::ExcludeDocuments { ids } => {
                self.log(SpecificationKind::DocumentExclusion(ids.clone()), &comment);
                self.document_exclusions.extend(ids);
            }
            Edit::AddSynonyms { term, synonyms } => {
                self.log(
                    SpecificationKind::Synonym {
                        term: term.clone(),
                        synonyms: synonyms.clone(),
                    },
                    &comment,
                );
                self.query.add_synonyms(&term, &synonyms);
            }
        }

        self.snapshot();
        true
    }

    /// Mark documents as unwanted. The query tree is not touched.
    pub fn exclude_documents<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(
            Edit::ExcludeDocuments {
                ids: collect_strings(ids),
            },
            None,
        )
    }

    /// Mark documents as wanted. The query tree is not touched.
    pub fn include_documents<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(
            Edit::IncludeDocuments {
                ids: collect_strings(ids),
            },
            None,
        )
    }

    /// Add each term as a conjunct of the root.
    pub fn include_terms<I, S>(&mut self, terms: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(
            Edit::IncludeTerms {
                terms: collect_strings(terms),
            },
            None,
        )
    }

    /// Add the negation of each term as a conjunct of the root.
    pub fn exclude_terms<I, S>(&mut self, terms: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(
            Edit::ExcludeTerms {
                terms: collect_strings(terms),
            },
            None,
        )
    }

    /// Let a direct conjunct `term` also match any of `synonyms`.
    pub fn add_synonyms<T, I, S>(&mut self, term: T, synonyms: I) -> bool
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(
            Edit::AddSynonyms {
                term: term.into(),
                synonyms: collect_strings(synonyms),
            },
            None,
        )
    }

    /// Attach the results obtained for the current query to the latest
    /// snapshot, replacing any earlier attachment.
    pub fn attach_result(&mut self, result: ResultSummary) -> Option<ResultSummary> {
        debug!(
            "[{}] {} results attached to snapshot #{}",
            self.id,
            result.len(),
            self.history.last().sequence()
        );
        self.history.attach_result(result)
    }

    /// Session identifier, used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AskmeConfig {
        &self.config
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn formula(&self) -> String {
        self.query.formula()
    }

    /// Render the query object over the configured search fields.
    pub fn to_query_object(&self) -> Value {
        self.query
            .to_query_object_with_fields(&self.config.search_fields)
    }

    /// Write the query object over the configured search fields to `path`.
    pub fn save_query<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.query
            .save_to_file_with_fields(path, &self.config.search_fields)
    }

    pub fn specifications(&self) -> &[QuerySpecification] {
        &self.specifications
    }

    pub fn document_inclusions(&self) -> &[String] {
        &self.document_inclusions
    }

    pub fn document_exclusions(&self) -> &[String] {
        &self.document_exclusions
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of logged specifications.
    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    /// Always `false`: the seed term is logged on construction.
    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    fn new_term(&self, text: String) -> Term {
        Term::with_match_mode(text, self.config.default_match_mode)
    }

    fn log(&mut self, kind: SpecificationKind, comment: &Option<String>) {
        let specification = QuerySpecification::new(kind, comment.clone());
        debug!("[{}] {}", self.id, specification);
        self.specifications.push(specification);
    }

    fn snapshot(&mut self) {
        let snapshot = Snapshot::capture(
            self.history.next_sequence(),
            &self.specifications,
            &self.document_inclusions,
            &self.document_exclusions,
            self.query.formula(),
        );
        self.history.record(snapshot);
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QueryBuilder with {} specifications", self.len())?;
        for specification in &self.specifications {
            writeln!(f, "    {specification}")?;
        }
        writeln!(f)?;
        writeln!(f, "formula: {}", self.formula())?;
        writeln!(f, "include: [{}]", self.document_inclusions.join(", "))?;
        writeln!(f, "exclude: [{}]", self.document_exclusions.join(", "))
    }
}

fn collect_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{BooleanOp, MatchMode};

    #[test]
    fn test_fresh_builder() {
        let builder = QueryBuilder::new("earthquake");
        assert_eq!(builder.formula(), "\"earthquake\"");
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.history().len(), 1);
        assert!(matches!(
            builder.specifications()[0].kind(),
            SpecificationKind::QueryTerm(t) if t.text() == "earthquake"
        ));
    }

    #[test]
    fn test_include_terms_logs_one_specification_per_term() {
        let mut builder = QueryBuilder::new("earthquake");
        assert!(builder.include_terms(["tsunami", "aftershock"]));

        assert_eq!(builder.len(), 3);
        assert_eq!(builder.history().len(), 2);
        assert_eq!(builder.query().root().len(), 3);
        assert_eq!(
            builder.formula(),
            "((\"earthquake\" AND \"tsunami\") AND \"aftershock\")"
        );
    }

    #[test]
    fn test_exclude_terms_adds_negated_conjunct() {
        let mut builder = QueryBuilder::new("earthquake");
        builder.exclude_terms(["shock"]);

        let root = builder.query().root();
        let negation = root.children()[1].as_boolean().unwrap();
        assert_eq!(negation.op(), BooleanOp::Not);
        assert_eq!(negation.len(), 1);
        assert_eq!(builder.formula(), "(\"earthquake\" AND (NOT \"shock\"))");
    }

    #[test]
    fn test_document_edits_leave_tree_alone() {
        let mut builder = QueryBuilder::new("earthquake");
        let before = builder.to_query_object();
        builder.exclude_documents(["d1", "d2"]);
        builder.include_documents(["d3"]);

        assert_eq!(builder.to_query_object(), before);
        assert_eq!(builder.document_exclusions().to_vec(), vec!["d1", "d2"]);
        assert_eq!(builder.document_inclusions().to_vec(), vec!["d3"]);
        assert_eq!(builder.history().len(), 3);
    }

    #[test]
    fn test_empty_edits_are_noops() {
        let mut builder = QueryBuilder::new("earthquake");
        assert!(!builder.include_terms(Vec::<String>::new()));
        assert!(!builder.exclude_documents(Vec::<&str>::new()));
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.history().len(), 1);
    }

    #[test]
    fn test_synonyms_for_missing_term_still_logged() {
        let mut builder = QueryBuilder::new("earthquake");
        let before = builder.to_query_object();
        assert!(builder.add_synonyms("volcano", ["eruption"]));

        assert_eq!(builder.to_query_object(), before);
        assert_eq!(builder.len(), 2);
        assert_eq!(builder.history().len(), 2);
    }

    #[test]
    fn test_comment_is_attached_to_every_specification_of_an_edit() {
        let mut builder = QueryBuilder::new("earthquake");
        builder.apply(
            Edit::IncludeTerms {
                terms: vec!["a".to_string(), "b".to_string()],
            },
            Some("user asked".to_string()),
        );
        assert!(
            builder.specifications()[1..]
                .iter()
                .all(|s| s.comment() == Some("user asked"))
        );
    }

    #[test]
    fn test_config_drives_match_mode_and_fields() {
        let config = AskmeConfig::default()
            .with_search_fields(["title"])
            .with_match_mode(MatchMode::BestFields);
        let mut builder = QueryBuilder::with_config("earthquake", config);
        builder.include_terms(["tsunami"]);

        let object = builder.to_query_object();
        let must = object["bool"]["must"].as_array().unwrap();
        assert_eq!(must[1]["multi_match"]["type"], "best_fields");
        assert_eq!(must[1]["multi_match"]["fields"], serde_json::json!(["title"]));
    }

    #[test]
    fn test_replay_matches_direct_calls() {
        let script = vec![
            ScriptedEdit::new(Edit::IncludeTerms {
                terms: vec!["head cold".to_string()],
            }),
            ScriptedEdit::new(Edit::AddSynonyms {
                term: "head cold".to_string(),
                synonyms: vec!["rhinitis".to_string()],
            })
            .with_comment("medical wording"),
        ];
        let replayed = QueryBuilder::replay("fever", &script, AskmeConfig::default());

        let mut direct = QueryBuilder::new("fever");
        direct.include_terms(["head cold"]);
        direct.add_synonyms("head cold", ["rhinitis"]);

        assert_eq!(replayed.formula(), direct.formula());
        assert_eq!(replayed.history().len(), direct.history().len());
        assert_eq!(replayed.specifications()[2].comment(), Some("medical wording"));
        assert_ne!(replayed.id(), direct.id());
    }

    #[test]
    fn test_save_query_uses_configured_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");

        let config = AskmeConfig::default().with_search_fields(["title", "abstract"]);
        let builder = QueryBuilder::with_config("earthquake", config);
        builder.save_query(&path).unwrap();

        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, builder.to_query_object());
        assert_eq!(
            saved["bool"]["must"][0]["multi_match"]["fields"],
            serde_json::json!(["title", "abstract"])
        );
    }

    #[test]
    fn test_display() {
        let mut builder = QueryBuilder::new("earthquake");
        builder.exclude_documents(["d1"]);
        let shown = builder.to_string();
        assert!(shown.starts_with("QueryBuilder with 2 specifications\n"));
        assert!(shown.contains("formula: \"earthquake\""));
        assert!(shown.contains("exclude: [d1]"));
    }
}
