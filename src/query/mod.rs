//! Query trees and their renderings.
//!
//! A query is a tree of [`Term`] leaves under [`BooleanNode`] composites. It
//! renders two ways: a human-readable formula and a `bool` query object in
//! the JSON DSL of the search engine.

pub mod boolean;
#[allow(clippy::module_inception)]
pub mod query;
pub mod term;

pub use self::boolean::{BooleanNode, BooleanOp, Occur, QueryNode};
pub use self::query::Query;
pub use self::term::{DEFAULT_FIELDS, MatchMode, Term};
