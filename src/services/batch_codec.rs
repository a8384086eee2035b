// Linkcatalog batch codec
// Decodes import batches from JSON, encodes them back, and summarizes them for preview.

use serde::Serialize;
use tracing::debug;

use crate::types::errors::CodecError;
use crate::types::import::{ImportBatch, OperationKind, TargetKind};

/// Format versions this build can read.
pub const SUPPORTED_VERSIONS: &[&str] = &["1", "1.0"];

/// Operation counts shown before a batch is run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchPreview {
    pub version: String,
    pub description: String,
    pub total: usize,
    pub adds: usize,
    pub updates: usize,
    pub deletes: usize,
    pub category_targets: usize,
    pub link_targets: usize,
}

/// Decodes a batch document.
///
/// `max_operations` of 0 disables the size check.
pub fn decode_batch(json: &str, max_operations: usize) -> Result<ImportBatch, CodecError> {
    let batch: ImportBatch =
        serde_json::from_str(json).map_err(|e| CodecError::Malformed(e.to_string()))?;
    validate(&batch, max_operations)?;
    debug!(
        version = %batch.version,
        operations = batch.operations.len(),
        "decoded import batch"
    );
    Ok(batch)
}

/// Same as [`decode_batch`] for an already-parsed JSON value (RPC params).
pub fn decode_value(value: serde_json::Value, max_operations: usize) -> Result<ImportBatch, CodecError> {
    let batch: ImportBatch =
        serde_json::from_value(value).map_err(|e| CodecError::Malformed(e.to_string()))?;
    validate(&batch, max_operations)?;
    Ok(batch)
}

/// Serializes a batch as pretty-printed JSON.
pub fn encode_batch(batch: &ImportBatch) -> Result<String, CodecError> {
    serde_json::to_string_pretty(batch).map_err(|e| CodecError::SerializationError(e.to_string()))
}

/// Counts operations by kind and target.
pub fn preview(batch: &ImportBatch) -> BatchPreview {
    let mut preview = BatchPreview {
        version: batch.version.clone(),
        description: batch.description.clone(),
        total: batch.operations.len(),
        ..BatchPreview::default()
    };
    for op in &batch.operations {
        match op.operation {
            OperationKind::Add => preview.adds += 1,
            OperationKind::Update => preview.updates += 1,
            OperationKind::Delete => preview.deletes += 1,
        }
        match op.target {
            TargetKind::Category => preview.category_targets += 1,
            TargetKind::Link => preview.link_targets += 1,
        }
    }
    preview
}

fn validate(batch: &ImportBatch, max_operations: usize) -> Result<(), CodecError> {
    let version = batch.version.trim();
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(CodecError::UnsupportedVersion(batch.version.clone()));
    }
    if max_operations > 0 && batch.operations.len() > max_operations {
        return Err(CodecError::TooManyOperations {
            count: batch.operations.len(),
            limit: max_operations,
        });
    }
    Ok(())
}
