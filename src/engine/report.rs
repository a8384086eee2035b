//! Aggregates per-operation outcomes into an [`ImportResult`].

use super::runner::BatchRun;
use crate::types::import::{ImportResult, OperationStatus};

/// Builds the final report. Pure aggregation over `run`.
pub fn build(run: BatchRun) -> ImportResult {
    let (mut successful, mut failed, mut skipped) = (0, 0, 0);
    for outcome in &run.outcomes {
        match outcome.status {
            OperationStatus::Succeeded => successful += 1,
            OperationStatus::Failed(_) => failed += 1,
            OperationStatus::Skipped(_) => skipped += 1,
        }
    }

    ImportResult {
        total_operations: run.outcomes.len(),
        successful,
        failed,
        skipped,
        success: failed == 0,
        outcomes: run.outcomes,
        categories_modified: run.categories_modified,
        import_duration: run.elapsed,
    }
}
