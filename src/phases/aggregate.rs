//! Result Aggregator
//!
//! Workers finish in any order. `ResultTable` holds one slot per spec index;
//! each slot is written at most once by the worker that owns the index, so
//! concurrent writers never contend on the same data and nothing is
//! appended in completion order. `into_report` then walks the slots in
//! index order, which is the input order of the batch.

use std::sync::OnceLock;

use log::warn;

use crate::report::{BatchReport, OperationStatus, RepoReport};
use crate::spec::Batch;
use crate::task::TaskResult;

#[derive(Debug, Default)]
struct Slot {
    status: OnceLock<OperationStatus>,
    results: OnceLock<Vec<TaskResult>>,
}

/// Write-once, index-addressed storage for per-spec outcomes.
#[derive(Debug)]
pub struct ResultTable {
    slots: Vec<Slot>,
}

impl ResultTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| Slot::default()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record the operation status for `index`.
    ///
    /// Returns `false` if the index is out of range or already recorded; the
    /// first write wins.
    pub fn record_status(&self, index: usize, status: OperationStatus) -> bool {
        match self.slots.get(index) {
            Some(slot) => {
                let written = slot.status.set(status).is_ok();
                if !written {
                    warn!("status for spec #{} recorded twice; keeping the first", index);
                }
                written
            }
            None => {
                warn!("status for unknown spec #{} dropped", index);
                false
            }
        }
    }

    /// Record the task results for `index`. Same write-once rules as
    /// `record_status`.
    pub fn record_results(&self, index: usize, results: Vec<TaskResult>) -> bool {
        match self.slots.get(index) {
            Some(slot) => {
                let written = slot.results.set(results).is_ok();
                if !written {
                    warn!("results for spec #{} recorded twice; keeping the first", index);
                }
                written
            }
            None => {
                warn!("results for unknown spec #{} dropped", index);
                false
            }
        }
    }

    /// Build the ordered report.
    ///
    /// A slot without a status (its worker died before reporting) becomes a
    /// `Failed` status so every spec in the batch appears exactly once.
    pub fn into_report(self, batch: &Batch) -> BatchReport {
        let mut slots = self.slots.into_iter();
        let repos = batch
            .iter()
            .map(|spec| {
                let slot = slots.next().unwrap_or_default();
                let status = slot.status.into_inner().unwrap_or_else(|| {
                    OperationStatus::failed(spec.clone(), "no outcome was recorded for this spec")
                });
                let results = slot.results.into_inner().unwrap_or_default();
                RepoReport::new(status, results)
            })
            .collect();
        BatchReport::new(repos)
    }
}
