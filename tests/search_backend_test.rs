//! Integration tests for running builder queries through a search backend.

use std::cell::RefCell;

use askme::prelude::*;
use askme::search;
use serde_json::{Value, json};

/// Backend that answers every request with a canned engine response and
/// remembers what it was asked.
struct CannedBackend {
    response: Value,
    requests: RefCell<Vec<SearchRequest>>,
}

impl CannedBackend {
    fn new(response: Value) -> Self {
        CannedBackend {
            response,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl SearchBackend for CannedBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.requests.borrow_mut().push(request.clone());
        SearchResponse::from_json(&self.response)
    }
}

/// Backend standing in for an unreachable engine.
struct UnavailableBackend;

impl SearchBackend for UnavailableBackend {
    fn search(&self, _request: &SearchRequest) -> Result<SearchResponse> {
        Err(AskmeError::search("connection refused"))
    }
}

fn engine_response(ids: &[(&str, f64, &str)]) -> Value {
    let hits: Vec<Value> = ids
        .iter()
        .map(|(id, score, title)| json!({"_id": id, "_score": score, "_source": {"title": title}}))
        .collect();
    json!({
        "took": 1,
        "timed_out": false,
        "hits": {"total": {"value": hits.len(), "relation": "eq"}, "hits": hits}
    })
}

#[test]
fn test_run_attaches_results_to_latest_snapshot() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let backend = CannedBackend::new(engine_response(&[
        ("d1", 8.25, "Tectonic activity along the Andes"),
        ("d5", 3.0, "Earthquake statistics"),
    ]));

    let mut builder = QueryBuilder::new("earthquake");
    builder.include_terms(["tectonic activity"]);

    let response = search::run(&mut builder, &backend)?;
    assert_eq!(response.total_hits, 2);

    let summary = builder.history().last().result().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.get("d1").unwrap().score, 8.25);
    assert_eq!(summary.get("d5").unwrap().title, "Earthquake statistics");
    assert!(builder.history().first().result().is_none());
    Ok(())
}

#[test]
fn test_run_sends_configured_request() -> Result<()> {
    let config = AskmeConfig::default()
        .with_index("xdd-geo")
        .with_max_results(3)
        .with_search_fields(["title", "abstract"]);
    let backend = CannedBackend::new(engine_response(&[]));

    let mut builder = QueryBuilder::with_config("earthquake", config);
    builder.exclude_terms(["shock"]);
    search::run(&mut builder, &backend)?;

    let requests = backend.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].index, "xdd-geo");
    assert_eq!(requests[0].size, 3);
    assert_eq!(requests[0].query, builder.to_query_object());
    assert_eq!(
        requests[0].query["bool"]["must_not"][0]["multi_match"]["fields"],
        json!(["title", "abstract"])
    );
    Ok(())
}

#[test]
fn test_rerun_after_edit_targets_new_snapshot() -> Result<()> {
    let mut builder = QueryBuilder::new("earthquake");

    search::run(
        &mut builder,
        &CannedBackend::new(engine_response(&[("d1", 1.0, "one")])),
    )?;
    builder.exclude_documents(["d1"]);
    search::run(
        &mut builder,
        &CannedBackend::new(engine_response(&[("d2", 2.0, "two")])),
    )?;

    let history = builder.history();
    assert!(history.get(0).unwrap().result().unwrap().contains("d1"));
    assert!(history.get(1).unwrap().result().unwrap().contains("d2"));
    assert!(!history.get(1).unwrap().result().unwrap().contains("d1"));
    Ok(())
}

#[test]
fn test_backend_errors_reach_the_caller() {
    let mut builder = QueryBuilder::new("earthquake");

    let err = search::run(&mut builder, &UnavailableBackend).unwrap_err();
    assert!(matches!(err, AskmeError::Search(_)));
    assert!(builder.history().last().result().is_none());
}

#[test]
fn test_malformed_engine_response_is_an_error() {
    let backend = CannedBackend::new(json!({"error": {"type": "index_not_found_exception"}}));
    let mut builder = QueryBuilder::new("earthquake");

    let err = search::run(&mut builder, &backend).unwrap_err();
    assert!(matches!(err, AskmeError::Response(_)));
    assert!(builder.history().last().result().is_none());
}

#[test]
fn test_boxed_backend() -> Result<()> {
    let backend: Box<dyn SearchBackend> =
        Box::new(CannedBackend::new(engine_response(&[("d9", 0.5, "nine")])));
    let mut builder = QueryBuilder::new("earthquake");

    search::run(&mut builder, &backend)?;
    assert!(builder.history().last().result().unwrap().contains("d9"));
    Ok(())
}
