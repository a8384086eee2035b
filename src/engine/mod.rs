//! Category import operation engine.
//!
//! Applies a declarative batch of Add/Update/Delete operations to a
//! caller-owned [`Catalog`] and reports a per-operation outcome for each.
//!
//! # Usage
//!
//! ```
//! use linkcatalog::engine::ImportEngine;
//! use linkcatalog::types::catalog::Catalog;
//! use linkcatalog::types::import::{
//!     Identifier, ImportBatch, ImportOperation, OperationKind, TargetKind,
//! };
//!
//! let mut catalog = Catalog::default();
//! let batch = ImportBatch::new(vec![ImportOperation::new(
//!     OperationKind::Add,
//!     TargetKind::Category,
//!     Identifier::path("Work"),
//! )]);
//!
//! let result = ImportEngine::default().run(&mut catalog, batch);
//! assert!(result.success);
//! assert!(result.categories_modified.contains("Work"));
//! ```

pub mod applier;
pub mod report;
pub mod resolver;
pub mod runner;

use tracing::info;

use crate::types::catalog::Catalog;
use crate::types::import::{ImportBatch, ImportResult};
use crate::types::settings::{ImportSettings, NameMatchPolicy};

pub use applier::{Applied, Applier};
pub use resolver::{NodeAddress, ResolveError, Resolver};
pub use runner::{BatchRun, BatchRunner};

/// Resolver, applier, runner and report builder wired together.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportEngine {
    runner: BatchRunner,
}

impl ImportEngine {
    pub fn new(policy: NameMatchPolicy) -> Self {
        Self {
            runner: BatchRunner::new(Applier::new(Resolver::new(policy))),
        }
    }

    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(settings.name_match)
    }

    /// Runs `batch` to completion against `catalog` and builds the report.
    ///
    /// The catalog is only borrowed for the duration of the call; the caller
    /// persists every root listed in `categories_modified` afterwards.
    pub fn run(&self, catalog: &mut Catalog, batch: ImportBatch) -> ImportResult {
        let description = batch.description.clone();
        let result = report::build(self.runner.run(catalog, batch));
        info!(
            batch = %description,
            total = result.total_operations,
            successful = result.successful,
            failed = result.failed,
            skipped = result.skipped,
            duration_ms = result.import_duration.as_millis() as u64,
            "import batch completed"
        );
        result
    }
}
