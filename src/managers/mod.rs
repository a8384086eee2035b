// Linkcatalog persistence managers
// Managers own the SQLite-backed state: stored category trees and the import history.

pub mod catalog_store;
pub mod import_log_manager;
