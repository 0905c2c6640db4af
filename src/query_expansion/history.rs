//! Point-in-time snapshots of a builder and the history they form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::specification::QuerySpecification;
use super::types::ResultSummary;
use crate::error::AskmeError;

/// The state of a builder right after one of its edits.
///
/// A snapshot owns copies of everything it records, so later edits to the
/// builder cannot reach back into it. The result summary is the only part
/// that may be set after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    sequence: usize,
    timestamp: DateTime<Utc>,
    specifications: Vec<QuerySpecification>,
    document_inclusions: Vec<String>,
    document_exclusions: Vec<String>,
    formula: String,
    result: Option<ResultSummary>,
}

impl Snapshot {
    pub(crate) fn capture(
        sequence: usize,
        specifications: &[QuerySpecification],
        document_inclusions: &[String],
        document_exclusions: &[String],
        formula: String,
    ) -> Self {
        Snapshot {
            sequence,
            timestamp: Utc::now(),
            specifications: specifications.to_vec(),
            document_inclusions: document_inclusions.to_vec(),
            document_exclusions: document_exclusions.to_vec(),
            formula,
            result: None,
        }
    }

    /// Position of this snapshot in its history, starting at zero.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
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

    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// The results attached to this snapshot, if any.
    pub fn result(&self) -> Option<&ResultSummary> {
        self.result.as_ref()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.formula
        )?;
        if let Some(latest) = self.specifications.last() {
            write!(f, "  <- {latest}")?;
        }
        match &self.result {
            Some(result) => write!(f, "  [{} results]", result.len()),
            None => Ok(()),
        }
    }
}

/// All snapshots of one builder, in creation order. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistoryRepr")]
pub struct History {
    snapshots: Vec<Snapshot>,
}

#[derive(Deserialize)]
struct HistoryRepr {
    snapshots: Vec<Snapshot>,
}

impl TryFrom<HistoryRepr> for History {
    type Error = AskmeError;

    fn try_from(repr: HistoryRepr) -> Result<Self, Self::Error> {
        if repr.snapshots.is_empty() {
            return Err(AskmeError::invalid_operation(
                "a history needs at least the seed snapshot",
            ));
        }
        if let Some((position, snapshot)) = repr
            .snapshots
            .iter()
            .enumerate()
            .find(|(position, snapshot)| snapshot.sequence != *position)
        {
            return Err(AskmeError::invalid_operation(format!(
                "snapshot at position {} carries sequence {}",
                position, snapshot.sequence
            )));
        }
        Ok(History {
            snapshots: repr.snapshots,
        })
    }
}

impl History {
    pub(crate) fn new(seed: Snapshot) -> Self {
        History {
            snapshots: vec![seed],
        }
    }

    pub(crate) fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Sequence number the next recorded snapshot gets.
    pub(crate) fn next_sequence(&self) -> usize {
        self.snapshots.len()
    }

    /// Attach results to the most recent snapshot.
    ///
    /// A second attachment replaces the first; the replaced summary is
    /// returned.
    pub fn attach_result(&mut self, result: ResultSummary) -> Option<ResultSummary> {
        self.last_mut().result.replace(result)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always `false`: a history starts with the seed snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first(&self) -> &Snapshot {
        &self.snapshots[0]
    }

    pub fn last(&self) -> &Snapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    fn last_mut(&mut self) -> &mut Snapshot {
        let last = self.snapshots.len() - 1;
        &mut self.snapshots[last]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for snapshot in &self.snapshots {
            writeln!(f, "{snapshot}")?;
        }
        Ok(())
    }
}
