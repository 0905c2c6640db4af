//! Incremental, auditable query expansion.
//!
//! A [`QueryBuilder`] starts from a seed term and is refined by edits: add a
//! term, exclude a term, supply synonyms, include or exclude documents.
//! Each edit is appended to a specification log and followed by a
//! [`Snapshot`] in the builder's [`History`], to which the caller may later
//! attach the results the query produced.
//!
//! # Example
//!
//! ```
//! use askme::query_expansion::{QueryBuilder, ResultSummary};
//!
//! let mut builder = QueryBuilder::new("head cold");
//! builder.add_synonyms("head cold", ["rhinitis"]);
//! builder.attach_result(ResultSummary::from_iter([("d7", 12.5, "On rhinitis")]));
//!
//! for snapshot in builder.history() {
//!     println!("{snapshot}");
//! }
//! ```

mod builder;
mod history;
mod specification;
mod types;

pub use builder::QueryBuilder;
pub use history::{History, Snapshot};
pub use specification::{QuerySpecification, SpecificationKind};
pub use types::{Edit, RankedDocument, ResultSummary, ScriptedEdit};
