//! Search engine responses and the hits they carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AskmeError, Result};
use crate::query_expansion::ResultSummary;

/// One document returned by the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The document identifier.
    pub id: String,
    /// The relevance score. Zero when the engine did not score the hit.
    pub score: f64,
    /// The document title, empty when the source has none.
    pub title: String,
    /// The topic the document was filed under.
    pub topic: Option<String>,
    /// Publication year.
    pub year: Option<String>,
}

impl SearchHit {
    fn from_json(hit: &Value) -> Result<Self> {
        let id = hit
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| AskmeError::response("hit without a string _id"))?;
        let source = hit.get("_source");
        let source_str = |key: &str| {
            source
                .and_then(|s| s.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let year = source.and_then(|s| s.get("year")).and_then(|y| match y {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(SearchHit {
            id: id.to_string(),
            score: hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0),
            title: source_str("title").unwrap_or_default(),
            topic: source_str("topic"),
            year,
        })
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {:7.4}  {}", self.id, self.score, self.title)
    }
}

/// A response of the search engine, either to a search or to a multi-get.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Milliseconds the engine spent, when reported.
    pub took: Option<u64>,
    /// Whether the engine gave up before finishing.
    pub timed_out: bool,
    /// Number of matching documents, which may exceed the hits returned.
    pub total_hits: u64,
    /// The returned documents in ranking order.
    pub hits: Vec<SearchHit>,
}

impl SearchResponse {
    /// Parse a raw engine response.
    ///
    /// Search responses carry their documents under `hits.hits` and the
    /// match count under `hits.total`. Multi-get responses carry them under
    /// `docs`; documents the engine did not find are skipped and the total
    /// is the number returned.
    pub fn from_json(response: &Value) -> Result<Self> {
        let took = response.get("took").and_then(Value::as_u64);
        let timed_out = response
            .get("timed_out")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if let Some(docs) = response.get("docs") {
            let docs = docs
                .as_array()
                .ok_or_else(|| AskmeError::response("'docs' is not an array"))?;
            let hits = docs
                .iter()
                .filter(|doc| doc.get("found").and_then(Value::as_bool) != Some(false))
                .map(SearchHit::from_json)
                .collect::<Result<Vec<_>>>()?;
            return Ok(SearchResponse {
                took,
                timed_out,
                total_hits: hits.len() as u64,
                hits,
            });
        }

        let outer = response
            .get("hits")
            .ok_or_else(|| AskmeError::response("response has neither 'hits' nor 'docs'"))?;
        let hits = outer
            .get("hits")
            .and_then(Value::as_array)
            .ok_or_else(|| AskmeError::response("'hits.hits' is missing or not an array"))?
            .iter()
            .map(SearchHit::from_json)
            .collect::<Result<Vec<_>>>()?;
        let total_hits = match outer.get("total") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(total) => total.get("value").and_then(Value::as_u64),
            None => None,
        }
        .unwrap_or(hits.len() as u64);

        Ok(SearchResponse {
            took,
            timed_out,
            total_hits,
            hits,
        })
    }

    /// Number of hits returned.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Reduce the response to what a history snapshot keeps.
    pub fn summary(&self) -> ResultSummary {
        self.hits
            .iter()
            .map(|hit| (hit.id.as_str(), hit.score, hit.title.as_str()))
            .collect()
    }
}

impl FromStr for SearchResponse {
    type Err = AskmeError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        SearchResponse::from_json(&value)
    }
}

impl fmt::Display for SearchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchResponse with {}/{} hits",
            self.hits.len(),
            self.total_hits
        )
    }
}
