//! # AskMe
//!
//! Incremental, auditable construction of boolean full-text queries.
//!
//! ## Features
//!
//! - Query trees of phrase and best-fields terms under AND / OR / NOT
//! - Human-readable formulas and `bool` query objects for the search engine
//! - A specification log of every user edit
//! - Replayable snapshot history with attachable result summaries
//! - A pluggable search backend boundary

pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod query_expansion;
pub mod search;
pub mod util;

pub mod prelude {
    pub use crate::config::AskmeConfig;
    pub use crate::error::{AskmeError, Result};
    pub use crate::query::{BooleanNode, BooleanOp, MatchMode, Query, QueryNode, Term};
    pub use crate::query_expansion::{
        Edit, History, QueryBuilder, QuerySpecification, ResultSummary, ScriptedEdit, Snapshot,
        SpecificationKind,
    };
    pub use crate::search::{SearchBackend, SearchRequest, SearchResponse};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
