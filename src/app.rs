//! App Core for Linkcatalog.
//!
//! Owns the database and settings, and drives a full import: load the stored
//! catalog, run the engine, persist the modified roots, log the run.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::database::connection::Database;
use crate::engine::ImportEngine;
use crate::managers::catalog_store::{CatalogStore, CatalogStoreTrait, PersistSummary};
use crate::managers::import_log_manager::{ImportLogManager, ImportLogManagerTrait};
use crate::services::batch_codec;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::AppError;
use crate::types::import::{ImportBatch, ImportResult};

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling it twice is a no-op.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Everything a completed import produced.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRun {
    pub result: ImportResult,
    pub persisted: PersistSummary,
    pub log_id: String,
}

/// Central application struct.
///
/// `CatalogStore` and `ImportLogManager` borrow the connection with a
/// lifetime, so they are created on demand from `db.connection()`.
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database at `db_path` (creating its directory) with already-loaded settings.
    pub fn new(db_path: &Path, settings_engine: SettingsEngine) -> Result<Self, AppError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }
        let db = Database::open(db_path)?;
        info!(path = %db_path.display(), "catalog database opened");
        Ok(Self { db, settings_engine })
    }

    /// Loads settings from the platform config path.
    ///
    /// Binaries call this before `open` so logging can be configured from the
    /// settings before the database is touched.
    pub fn load_default_settings() -> Result<SettingsEngine, AppError> {
        let mut settings_engine = SettingsEngine::new(None);
        settings_engine.load()?;
        Ok(settings_engine)
    }

    /// Opens the database configured in `settings_engine`.
    pub fn open(settings_engine: SettingsEngine) -> Result<Self, AppError> {
        let db_path = settings_engine.database_path();
        Self::new(&db_path, settings_engine)
    }

    /// Uses an in-memory database; settings are taken as given.
    pub fn in_memory(settings_engine: SettingsEngine) -> Result<Self, AppError> {
        let db = Database::open_in_memory()?;
        Ok(Self { db, settings_engine })
    }

    /// Engine configured from the current import settings.
    pub fn engine(&self) -> ImportEngine {
        ImportEngine::from_settings(&self.settings_engine.get_settings().import)
    }

    /// Decodes a batch document, enforcing the configured size limit.
    pub fn decode_batch(&self, json: &str) -> Result<ImportBatch, AppError> {
        let limit = self.settings_engine.get_settings().import.max_operations;
        Ok(batch_codec::decode_batch(json, limit)?)
    }

    /// Runs `batch` against the stored catalog and persists what it changed.
    pub fn run_import(&self, batch: ImportBatch) -> Result<ImportRun, AppError> {
        let conn = self.db.connection();
        let mut store = CatalogStore::new(conn);
        let mut catalog = store.load_catalog()?;

        let description = batch.description.clone();
        let version = batch.version.clone();
        let result = self.engine().run(&mut catalog, batch);

        let persisted = store.persist_modified(&catalog, &result.categories_modified)?;
        let log_id = ImportLogManager::new(conn).record(&description, &version, &result)?;

        Ok(ImportRun {
            result,
            persisted,
            log_id,
        })
    }
}
