//! Import batch, operation and result types.
//!
//! A batch is decoded from JSON by `services::batch_codec`, consumed once by
//! the engine, and turned into an [`ImportResult`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::catalog::ProtectionMode;

/// Mutation requested by an operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum OperationKind {
    Add,
    Update,
    Delete,
}

impl FromStr for OperationKind {
    type Err = String;

    /// Case-insensitive: `add`, `Add` and `ADD` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("add") {
            Ok(OperationKind::Add)
        } else if s.eq_ignore_ascii_case("update") {
            Ok(OperationKind::Update)
        } else if s.eq_ignore_ascii_case("delete") {
            Ok(OperationKind::Delete)
        } else {
            Err(format!("unknown operation '{}'", s))
        }
    }
}

impl TryFrom<String> for OperationKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Add => write!(f, "Add"),
            OperationKind::Update => write!(f, "Update"),
            OperationKind::Delete => write!(f, "Delete"),
        }
    }
}

/// Kind of node an operation targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum TargetKind {
    Category,
    Link,
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("category") {
            Ok(TargetKind::Category)
        } else if s.eq_ignore_ascii_case("link") {
            Ok(TargetKind::Link)
        } else {
            Err(format!("unknown target '{}'", s))
        }
    }
}

impl TryFrom<String> for TargetKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Category => write!(f, "Category"),
            TargetKind::Link => write!(f, "Link"),
        }
    }
}

/// Locates a node: a category path, a category name, and/or a link title.
///
/// When `category_path` is set it takes precedence over name/title lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Identifier {
    pub fn path(path: &str) -> Self {
        Self {
            category_path: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// `category_path` with blank values treated as absent.
    pub fn path_str(&self) -> Option<&str> {
        non_blank(&self.category_path)
    }

    pub fn name_str(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn title_str(&self) -> Option<&str> {
        non_blank(&self.title)
    }
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(p) = self.path_str() {
            parts.push(format!("path '{}'", p));
        }
        if let Some(n) = self.name_str() {
            parts.push(format!("name '{}'", n));
        }
        if let Some(t) = self.title_str() {
            parts.push(format!("title '{}'", t));
        }
        if parts.is_empty() {
            write!(f, "<empty identifier>")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// New field values for Add/Update. Absent fields are left untouched on Update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_directory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<ProtectionMode>,
}

/// One instruction of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportOperation {
    pub operation: OperationKind,
    pub target: TargetKind,
    #[serde(default)]
    pub identifier: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<OperationPayload>,
}

impl ImportOperation {
    pub fn new(operation: OperationKind, target: TargetKind, identifier: Identifier) -> Self {
        Self {
            operation,
            target,
            identifier,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: OperationPayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// An ordered list of operations plus format metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportBatch {
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_date: Option<String>,
    #[serde(default)]
    pub operations: Vec<ImportOperation>,
}

impl ImportBatch {
    pub fn new(operations: Vec<ImportOperation>) -> Self {
        Self {
            version: "1.0".to_string(),
            description: String::new(),
            import_date: None,
            operations,
        }
    }
}

/// Why an operation failed. The `Display` text is the outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FailureReason {
    #[error("parent category not found: {0}")]
    ParentNotFound(String),
    #[error("target not found: {0}")]
    TargetNotFound(String),
    #[error("ambiguous target: {matches} nodes match '{name}'")]
    AmbiguousTarget { name: String, matches: usize },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("a sibling named '{0}' already exists")]
    NameConflict(String),
}

/// Why an operation was skipped without touching the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SkipReason {
    #[error("duplicate; not re-added: {0}")]
    Duplicate(String),
    #[error("already absent: {0}")]
    AlreadyAbsent(String),
}

/// Per-operation status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason")]
pub enum OperationStatus {
    Succeeded,
    Failed(FailureReason),
    Skipped(SkipReason),
}

impl OperationStatus {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, OperationStatus::Succeeded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OperationStatus::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, OperationStatus::Skipped(_))
    }
}

/// Immutable record of what happened to one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub operation: OperationKind,
    pub target: TargetKind,
    pub status: OperationStatus,
    pub message: String,
    pub identifier: Identifier,
}

/// Aggregate report of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub total_operations: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// `true` iff no operation failed.
    pub success: bool,
    pub outcomes: Vec<OperationOutcome>,
    /// Distinct root category paths touched by a succeeded operation.
    pub categories_modified: BTreeSet<String>,
    pub import_duration: Duration,
}

impl ImportResult {
    /// Outcomes with `Failed` status, for diagnostic display.
    pub fn failed_outcomes(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed())
    }
}

/// A completed import run as recorded in the import log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLogEntry {
    pub id: String,
    pub description: String,
    pub version: String,
    pub total: i64,
    pub successful: i64,
    pub failed: i64,
    pub skipped: i64,
    pub success: bool,
    pub categories_modified: Vec<String>,
    pub duration_ms: i64,
    pub imported_at: i64,
}
