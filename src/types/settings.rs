use serde::{Deserialize, Serialize};

/// Top-level engine settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    pub catalog: CatalogSettings,
    pub import: ImportSettings,
    pub logging: LoggingSettings,
}

/// Where the catalog database lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSettings {
    /// Database file name, relative to the platform data directory unless absolute.
    pub database_file: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            database_file: "catalog.db".to_string(),
        }
    }
}

/// How name/title lookups behave when several nodes match outside a path.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NameMatchPolicy {
    /// The first match of a pre-order traversal wins.
    #[default]
    FirstMatch,
    /// More than one match fails the operation as ambiguous.
    RejectAmbiguous,
}

/// Import engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportSettings {
    pub name_match: NameMatchPolicy,
    /// Upper bound on operations per batch; 0 disables the check.
    pub max_operations: usize,
}

/// Log output settings. `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
