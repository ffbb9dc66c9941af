//! Per-item outcomes and the batch report.

use std::fmt;

use crate::error::{Error, Result};
use crate::resolve::WorkItem;

/// What happened to a work item that finished successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was a compiled artifact and was decompiled
    Converted,
    /// The file was copied unchanged
    Copied,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Converted => f.write_str("converted"),
            Outcome::Copied => f.write_str("copied"),
        }
    }
}

/// The result of processing one work item.
#[derive(Debug)]
pub struct ItemReport {
    /// The item that was processed
    pub item: WorkItem,
    /// Its outcome, or the error that stopped it
    pub result: Result<Outcome>,
}

impl ItemReport {
    /// Returns true if the item finished without error.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the error, if the item failed.
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}

/// Reports for every item in a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per work item
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    /// Total number of items attempted.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items were attempted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items decompiled.
    pub fn converted(&self) -> usize {
        self.count(Outcome::Converted)
    }

    /// Number of items copied unchanged.
    pub fn copied(&self) -> usize {
        self.count(Outcome::Copied)
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Iterates over failed items.
    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|r| !r.is_ok())
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.items
            .iter()
            .filter(|r| matches!(r.result, Ok(o) if o == outcome))
            .count()
    }
}

impl FromIterator<ItemReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = ItemReport>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
