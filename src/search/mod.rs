//! The boundary toward the external search engine.
//!
//! The crate ships no engine client. Hosts implement [`SearchBackend`] for
//! whatever client they own, construct it once, and pass it in; [`run`]
//! then executes a builder's current query and files the results in the
//! builder's history.

pub mod response;

pub use self::response::{SearchHit, SearchResponse};

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::query_expansion::QueryBuilder;

/// Search request containing the query object and where to send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The index to search.
    pub index: String,
    /// The query object.
    pub query: Value,
    /// Maximum number of documents to return.
    pub size: usize,
    /// Topic the results are restricted to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new<S: Into<String>>(index: S, query: Value) -> Self {
        SearchRequest {
            index: index.into(),
            query,
            size: 20,
            domain: None,
        }
    }

    /// Create the request for a builder's current query, using the index
    /// and result count of its configuration.
    pub fn for_builder(builder: &QueryBuilder) -> Self {
        let config = builder.config();
        SearchRequest::new(config.index.clone(), builder.to_query_object()).size(config.max_results)
    }

    /// Set the maximum number of documents to return.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Restrict the results to documents of one topic.
    pub fn with_domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// The request body of the engine's search endpoint.
    ///
    /// With a domain set, the query object becomes the single `must` clause
    /// of a bool query filtered on `topic`.
    pub fn to_body(&self) -> Value {
        let query = match &self.domain {
            Some(domain) => json!({
                "bool": {
                    "must": [self.query],
                    "filter": {"term": {"topic": domain}},
                }
            }),
            None => self.query.clone(),
        };
        json!({
            "query": query,
            "size": self.size,
        })
    }
}

/// Trait for executing searches against an external engine.
///
/// Errors from the engine (unknown fields, unreachable cluster) are to be
/// returned, not absorbed; [`run`] hands them on to its caller unchanged.
pub trait SearchBackend {
    /// Execute a search request.
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

impl<B: SearchBackend + ?Sized> SearchBackend for &B {
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        (**self).search(request)
    }
}

impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        (**self).search(request)
    }
}

/// Search for the builder's current query and attach the results to its
/// latest snapshot.
///
/// On error nothing is attached.
pub fn run<B: SearchBackend + ?Sized>(
    builder: &mut QueryBuilder,
    backend: &B,
) -> Result<SearchResponse> {
    let request = SearchRequest::for_builder(builder);
    info!(
        "[{}] searching '{}' for {}",
        builder.id(),
        request.index,
        builder.formula()
    );

    let response = backend.search(&request)?;
    info!("[{}] {}", builder.id(), response);

    builder.attach_result(response.summary());
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AskmeConfig;

    #[test]
    fn test_request_for_builder() {
        let config = AskmeConfig::default().with_index("xdd-bio").with_max_results(5);
        let mut builder = QueryBuilder::with_config("earthquake", config);
        builder.include_terms(["tsunami"]);

        let request = SearchRequest::for_builder(&builder);
        assert_eq!(request.index, "xdd-bio");
        assert_eq!(request.size, 5);
        assert_eq!(request.query, builder.to_query_object());

        let body = request.to_body();
        assert_eq!(body["size"], 5);
        assert_eq!(body["query"]["bool"]["must"].as_array().unwrap().len(), 2);
        assert!(body["query"]["bool"].get("filter").is_none());
    }

    #[test]
    fn test_domain_filter_wraps_query() {
        let mut builder = QueryBuilder::new("earthquake");
        builder.exclude_terms(["shock"]);
        let query = builder.to_query_object();

        let request = SearchRequest::for_builder(&builder).with_domain("geoarchive");
        assert_eq!(request.query, query);

        let body = request.to_body();
        assert_eq!(body["query"]["bool"]["must"], json!([query]));
        assert_eq!(
            body["query"]["bool"]["filter"],
            json!({"term": {"topic": "geoarchive"}})
        );
        assert_eq!(body["size"], 20);
    }
}
