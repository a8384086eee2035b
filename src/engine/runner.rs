//! Sequential, best-effort batch execution.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::applier::Applier;
use crate::types::catalog::Catalog;
use crate::types::import::{ImportBatch, OperationOutcome};

/// Raw output of a batch run, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub outcomes: Vec<OperationOutcome>,
    pub categories_modified: BTreeSet<String>,
    pub elapsed: Duration,
}

/// Applies every operation of a batch in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchRunner {
    applier: Applier,
}

impl BatchRunner {
    pub fn new(applier: Applier) -> Self {
        Self { applier }
    }

    /// Runs `batch` against `catalog`. Operations are applied strictly in list
    /// order and a failed operation never stops the loop.
    pub fn run(&self, catalog: &mut Catalog, batch: ImportBatch) -> BatchRun {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(batch.operations.len());
        let mut categories_modified = BTreeSet::new();

        for (index, op) in batch.operations.iter().enumerate() {
            let applied = self.applier.apply(catalog, op);
            if applied.outcome.status.is_failed() {
                warn!(
                    index,
                    operation = %op.operation,
                    target = %op.target,
                    message = %applied.outcome.message,
                    "import operation failed"
                );
            } else {
                categories_modified.extend(applied.touched_roots);
            }
            outcomes.push(applied.outcome);
        }

        let elapsed = started.elapsed();
        debug!(
            operations = outcomes.len(),
            modified = categories_modified.len(),
            ?elapsed,
            "batch run finished"
        );

        BatchRun {
            outcomes,
            categories_modified,
            elapsed,
        }
    }
}
