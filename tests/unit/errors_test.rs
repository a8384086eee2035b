use std::error::Error;

use linkcatalog::types::errors::*;
use linkcatalog::types::import::{FailureReason, SkipReason};

// === CatalogStoreError Tests ===

#[test]
fn catalog_store_error_display_variants() {
    assert_eq!(
        CatalogStoreError::NotFound("Work".to_string()).to_string(),
        "Category not found: Work"
    );
    assert_eq!(
        CatalogStoreError::SerializationError("bad json".to_string()).to_string(),
        "Category serialization error: bad json"
    );
    assert_eq!(
        CatalogStoreError::DatabaseError("locked".to_string()).to_string(),
        "Catalog database error: locked"
    );
}

// === CodecError Tests ===

#[test]
fn codec_error_display_variants() {
    assert_eq!(
        CodecError::UnsupportedVersion("2.0".to_string()).to_string(),
        "Unsupported import format version: 2.0"
    );
    assert_eq!(
        CodecError::TooManyOperations { count: 10, limit: 5 }.to_string(),
        "Import batch too large: 10 operations (limit 5)"
    );
    assert_eq!(
        CodecError::Malformed("eof".to_string()).to_string(),
        "Malformed import batch: eof"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::InvalidKey("x".to_string()).to_string(),
        "Invalid settings key: x"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

// === AppError Tests ===

#[test]
fn app_error_is_transparent_over_sources() {
    let err: AppError = CodecError::UnsupportedVersion("9".to_string()).into();
    assert_eq!(err.to_string(), "Unsupported import format version: 9");

    let err: AppError = ImportLogError::DatabaseError("full".to_string()).into();
    assert_eq!(err.to_string(), "Import log database error: full");
}

#[test]
fn errors_implement_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(CatalogStoreError::NotFound("id".to_string()));
    assert!(err.source().is_none());
}

// === Outcome reasons ===

#[test]
fn failure_reason_messages() {
    assert_eq!(
        FailureReason::ParentNotFound("Work".to_string()).to_string(),
        "parent category not found: Work"
    );
    assert_eq!(
        FailureReason::TargetNotFound("category 'Ghost'".to_string()).to_string(),
        "target not found: category 'Ghost'"
    );
    assert_eq!(
        FailureReason::AmbiguousTarget { name: "Misc".to_string(), matches: 3 }.to_string(),
        "ambiguous target: 3 nodes match 'Misc'"
    );
    assert_eq!(
        FailureReason::NameConflict("Work".to_string()).to_string(),
        "a sibling named 'Work' already exists"
    );
}

#[test]
fn skip_reason_messages() {
    assert_eq!(
        SkipReason::Duplicate("category 'Work'".to_string()).to_string(),
        "duplicate; not re-added: category 'Work'"
    );
    assert_eq!(
        SkipReason::AlreadyAbsent("link 'Site'".to_string()).to_string(),
        "already absent: link 'Site'"
    );
}
