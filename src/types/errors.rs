use thiserror::Error;

// === CatalogStoreError ===

/// Errors raised while persisting or loading catalog trees.
#[derive(Debug, Error)]
pub enum CatalogStoreError {
    /// Root category with the given name was not found.
    #[error("Category not found: {0}")]
    NotFound(String),
    /// The stored tree could not be serialized or parsed.
    #[error("Category serialization error: {0}")]
    SerializationError(String),
    /// Database operation failed.
    #[error("Catalog database error: {0}")]
    DatabaseError(String),
}

// === CodecError ===

/// Errors raised while decoding or encoding an import batch.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not a well-formed batch document.
    #[error("Malformed import batch: {0}")]
    Malformed(String),
    /// The batch declares a format version this build cannot read.
    #[error("Unsupported import format version: {0}")]
    UnsupportedVersion(String),
    /// The batch holds more operations than allowed by the settings.
    #[error("Import batch too large: {count} operations (limit {limit})")]
    TooManyOperations { count: usize, limit: usize },
    /// Failed to serialize a batch.
    #[error("Import batch serialization error: {0}")]
    SerializationError(String),
}

// === ImportLogError ===

/// Errors related to the import history log.
#[derive(Debug, Error)]
pub enum ImportLogError {
    /// Database operation failed.
    #[error("Import log database error: {0}")]
    DatabaseError(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AppError ===

/// Errors surfaced by the application layer that drives imports.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] CatalogStoreError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    ImportLog(#[from] ImportLogError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Database open failed: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(String),
}
