//! Import Log Manager for Linkcatalog.
//!
//! Records one row per completed import run so the caller can show what
//! earlier imports changed.

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::types::catalog::now;
use crate::types::errors::ImportLogError;
use crate::types::import::{ImportLogEntry, ImportResult};

/// Trait defining import history operations.
pub trait ImportLogManagerTrait {
    fn record(&mut self, description: &str, version: &str, result: &ImportResult) -> Result<String, ImportLogError>;
    fn list_recent(&self, limit: i64) -> Result<Vec<ImportLogEntry>, ImportLogError>;
    fn clear_all(&mut self) -> Result<(), ImportLogError>;
}

/// Import log backed by a SQLite connection.
pub struct ImportLogManager<'a> {
    conn: &'a Connection,
}

impl<'a> ImportLogManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<ImportLogEntry> {
        let modified: String = row.get(8)?;
        let categories_modified: Vec<String> = serde_json::from_str(&modified).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(ImportLogEntry {
            id: row.get(0)?,
            description: row.get(1)?,
            version: row.get(2)?,
            total: row.get(3)?,
            successful: row.get(4)?,
            failed: row.get(5)?,
            skipped: row.get(6)?,
            success: row.get(7)?,
            categories_modified,
            duration_ms: row.get(9)?,
            imported_at: row.get(10)?,
        })
    }
}

impl<'a> ImportLogManagerTrait for ImportLogManager<'a> {
    /// Stores a summary of `result`. Returns the generated entry ID.
    fn record(&mut self, description: &str, version: &str, result: &ImportResult) -> Result<String, ImportLogError> {
        let id = Uuid::new_v4().to_string();
        let modified = serde_json::to_string(&result.categories_modified)
            .map_err(|e| ImportLogError::DatabaseError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO import_log (id, description, version, total, successful, failed, skipped, \
                 success, categories_modified, duration_ms, imported_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    description,
                    version,
                    result.total_operations as i64,
                    result.successful as i64,
                    result.failed as i64,
                    result.skipped as i64,
                    result.success,
                    modified,
                    result.import_duration.as_millis() as i64,
                    now(),
                ],
            )
            .map_err(|e| ImportLogError::DatabaseError(e.to_string()))?;

        Ok(id)
    }

    /// Most recent runs first.
    fn list_recent(&self, limit: i64) -> Result<Vec<ImportLogEntry>, ImportLogError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, description, version, total, successful, failed, skipped, success, \
                 categories_modified, duration_ms, imported_at \
                 FROM import_log ORDER BY imported_at DESC, rowid DESC LIMIT ?1",
            )
            .map_err(|e| ImportLogError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit], Self::row_to_entry)
            .map_err(|e| ImportLogError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| ImportLogError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    fn clear_all(&mut self) -> Result<(), ImportLogError> {
        self.conn
            .execute("DELETE FROM import_log", [])
            .map_err(|e| ImportLogError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
