//! Catalog Store for Linkcatalog.
//!
//! Implements `CatalogStoreTrait`: saving and loading root category trees,
//! backed by SQLite via `rusqlite`. Each root is one row holding its whole
//! subtree as JSON.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::types::catalog::{now, Catalog, TreeNode};
use crate::types::errors::CatalogStoreError;

/// What `persist_modified` wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistSummary {
    pub saved: usize,
    pub removed: usize,
}

/// Trait defining catalog persistence operations.
pub trait CatalogStoreTrait {
    fn save_category(&mut self, root: &TreeNode, position: usize) -> Result<(), CatalogStoreError>;
    fn load_category(&self, name: &str) -> Result<TreeNode, CatalogStoreError>;
    fn delete_category(&mut self, name: &str) -> Result<(), CatalogStoreError>;
    fn list_category_names(&self) -> Result<Vec<String>, CatalogStoreError>;
    fn load_catalog(&self) -> Result<Catalog, CatalogStoreError>;
    /// Saves every root named in `modified`; names with no matching root are deleted.
    fn persist_modified(
        &mut self,
        catalog: &Catalog,
        modified: &BTreeSet<String>,
    ) -> Result<PersistSummary, CatalogStoreError>;
}

/// Catalog store backed by a SQLite connection.
pub struct CatalogStore<'a> {
    conn: &'a Connection,
}

impl<'a> CatalogStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn db_err(e: rusqlite::Error) -> CatalogStoreError {
        CatalogStoreError::DatabaseError(e.to_string())
    }

    fn parse_tree(name: &str, json: &str) -> Result<TreeNode, CatalogStoreError> {
        serde_json::from_str(json).map_err(|e| {
            CatalogStoreError::SerializationError(format!("category '{}': {}", name, e))
        })
    }

    fn upsert(conn: &Connection, root: &TreeNode, position: usize) -> Result<(), CatalogStoreError> {
        if !root.is_category() {
            return Err(CatalogStoreError::SerializationError(format!(
                "root '{}' is not a category",
                root.label()
            )));
        }
        let json = serde_json::to_string(root)
            .map_err(|e| CatalogStoreError::SerializationError(e.to_string()))?;
        conn.execute(
            "INSERT INTO categories (name, tree_json, position, updated_at) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(name) DO UPDATE SET tree_json = excluded.tree_json, \
             position = excluded.position, updated_at = excluded.updated_at",
            params![root.label(), json, position as i64, now()],
        )
        .map_err(Self::db_err)?;
        Ok(())
    }
}

impl<'a> CatalogStoreTrait for CatalogStore<'a> {
    fn save_category(&mut self, root: &TreeNode, position: usize) -> Result<(), CatalogStoreError> {
        Self::upsert(self.conn, root, position)?;
        debug!(category = root.label(), nodes = root.subtree_len(), "saved category");
        Ok(())
    }

    fn load_category(&self, name: &str) -> Result<TreeNode, CatalogStoreError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT tree_json FROM categories WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(Self::db_err)?;
        match json {
            Some(json) => Self::parse_tree(name, &json),
            None => Err(CatalogStoreError::NotFound(name.to_string())),
        }
    }

    fn delete_category(&mut self, name: &str) -> Result<(), CatalogStoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM categories WHERE name = ?1", params![name])
            .map_err(Self::db_err)?;
        if affected == 0 {
            return Err(CatalogStoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    fn list_category_names(&self) -> Result<Vec<String>, CatalogStoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories ORDER BY position, name")
            .map_err(Self::db_err)?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(Self::db_err)?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row.map_err(Self::db_err)?);
        }
        Ok(names)
    }

    fn load_catalog(&self) -> Result<Catalog, CatalogStoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, tree_json FROM categories ORDER BY position, name")
            .map_err(Self::db_err)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(Self::db_err)?;

        let mut roots = Vec::new();
        for row in rows {
            let (name, json) = row.map_err(Self::db_err)?;
            roots.push(Self::parse_tree(&name, &json)?);
        }
        Ok(Catalog::new(roots))
    }

    fn persist_modified(
        &mut self,
        catalog: &Catalog,
        modified: &BTreeSet<String>,
    ) -> Result<PersistSummary, CatalogStoreError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;
        let mut summary = PersistSummary::default();

        for name in modified {
            let position = catalog
                .roots
                .iter()
                .position(|r| r.as_category().is_some_and(|c| &c.name == name));
            match position {
                Some(pos) => {
                    Self::upsert(&tx, &catalog.roots[pos], pos)?;
                    summary.saved += 1;
                }
                None => {
                    summary.removed += tx
                        .execute("DELETE FROM categories WHERE name = ?1", params![name])
                        .map_err(Self::db_err)?;
                }
            }
        }

        // Deletions shift surviving roots; keep stored order equal to forest order.
        for (pos, root) in catalog.roots.iter().enumerate() {
            tx.execute(
                "UPDATE categories SET position = ?1 WHERE name = ?2",
                params![pos as i64, root.label()],
            )
            .map_err(Self::db_err)?;
        }

        tx.commit().map_err(Self::db_err)?;
        info!(saved = summary.saved, removed = summary.removed, "persisted modified categories");
        Ok(summary)
    }
}
