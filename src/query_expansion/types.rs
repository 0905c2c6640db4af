//! Common types for query expansion: edits and result summaries.

use serde::{Deserialize, Serialize};

/// One user-directed refinement of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Require each term as a conjunct.
    IncludeTerms { terms: Vec<String> },
    /// Forbid each term through a negated conjunct.
    ExcludeTerms { terms: Vec<String> },
    /// Mark documents as wanted.
    IncludeDocuments { ids: Vec<String> },
    /// Mark documents as unwanted.
    ExcludeDocuments { ids: Vec<String> },
    /// Let a term also match any of its synonyms.
    AddSynonyms { term: String, synonyms: Vec<String> },
}

impl Edit {
    /// An edit with nothing to add. Applying it changes no state.
    pub fn is_empty(&self) -> bool {
        match self {
            Edit::IncludeTerms { terms } | Edit::ExcludeTerms { terms } => terms.is_empty(),
            Edit::IncludeDocuments { ids } | Edit::ExcludeDocuments { ids } => ids.is_empty(),
            Edit::AddSynonyms { .. } => false,
        }
    }
}

/// An edit together with the comment the user gave for it.
///
/// Edit scripts are JSON arrays of these, for example:
///
/// ```json
/// [
///   {"op": "exclude_documents", "ids": ["d1", "d2"]},
///   {"op": "include_terms", "terms": ["tectonic activity"], "comment": "narrow down"},
///   {"op": "add_synonyms", "term": "tectonic activity", "synonyms": ["seismic activity"]}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEdit {
    #[serde(flatten)]
    pub edit: Edit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ScriptedEdit {
    pub fn new(edit: Edit) -> Self {
        ScriptedEdit {
            edit,
            comment: None,
        }
    }

    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Parse an edit script.
    pub fn parse_script(json: &str) -> serde_json::Result<Vec<ScriptedEdit>> {
        serde_json::from_str(json)
    }
}

/// A document as it appeared in the results of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    /// The document identifier.
    pub id: String,
    /// The relevance score.
    pub score: f64,
    /// The document title.
    pub title: String,
}

/// Results obtained for one snapshot, keyed by document identifier.
///
/// Documents keep the order they were inserted in, which is normally the
/// ranking order of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    documents: Vec<RankedDocument>,
}

impl ResultSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document. An identifier seen before is updated in place.
    pub fn insert<I, T>(&mut self, id: I, score: f64, title: T)
    where
        I: Into<String>,
        T: Into<String>,
    {
        let id = id.into();
        let title = title.into();
        match self.documents.iter_mut().find(|d| d.id == id) {
            Some(existing) => {
                existing.score = score;
                existing.title = title;
            }
            None => self.documents.push(RankedDocument { id, score, title }),
        }
    }

    /// Look up a document by identifier.
    pub fn get(&self, id: &str) -> Option<&RankedDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RankedDocument> {
        self.documents.iter()
    }
}

impl<I, T> FromIterator<(I, f64, T)> for ResultSummary
where
    I: Into<String>,
    T: Into<String>,
{
    fn from_iter<It: IntoIterator<Item = (I, f64, T)>>(iter: It) -> Self {
        let mut summary = ResultSummary::new();
        for (id, score, title) in iter {
            summary.insert(id, score, title);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_is_empty() {
        assert!(Edit::IncludeTerms { terms: vec![] }.is_empty());
        assert!(Edit::ExcludeDocuments { ids: vec![] }.is_empty());
        assert!(
            !Edit::AddSynonyms {
                term: "flu".to_string(),
                synonyms: vec![]
            }
            .is_empty()
        );
    }

    #[test]
    fn test_parse_script() {
        let script = r#"[
            {"op": "exclude_documents", "ids": ["d1", "d2"]},
            {"op": "include_terms", "terms": ["tectonic activity"], "comment": "narrow down"},
            {"op": "add_synonyms", "term": "shock", "synonyms": ["jolt"]}
        ]"#;
        let edits = ScriptedEdit::parse_script(script).unwrap();

        assert_eq!(edits.len(), 3);
        assert_eq!(
            edits[0].edit,
            Edit::ExcludeDocuments {
                ids: vec!["d1".to_string(), "d2".to_string()]
            }
        );
        assert_eq!(edits[1].comment.as_deref(), Some("narrow down"));
        assert!(edits[2].comment.is_none());
    }

    #[test]
    fn test_parse_script_rejects_unknown_op() {
        assert!(ScriptedEdit::parse_script(r#"[{"op": "rerank"}]"#).is_err());
    }

    #[test]
    fn test_result_summary_insert_replaces() {
        let mut summary = ResultSummary::new();
        summary.insert("d1", 3.5, "Earthquakes in Chile");
        summary.insert("d2", 2.0, "Tectonic plates");
        summary.insert("d1", 4.0, "Earthquakes in Peru");

        assert_eq!(summary.len(), 2);
        let first = summary.iter().next().unwrap();
        assert_eq!(first.id, "d1");
        assert_eq!(first.score, 4.0);
        assert_eq!(summary.get("d1").unwrap().title, "Earthquakes in Peru");
        assert!(!summary.contains("d3"));
    }

    #[test]
    fn test_result_summary_from_iter() {
        let summary: ResultSummary = vec![("d1", 1.0, "one"), ("d2", 0.5, "two")]
            .into_iter()
            .collect();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.get("d2").unwrap().score, 0.5);
    }
}
