//! Applies a single import operation to the catalog.
//!
//! Every check runs before the first mutation, so a Failed or Skipped
//! outcome leaves the tree exactly as it was.

use tracing::debug;

use super::resolver::{NodeAddress, ResolveError, Resolver};
use crate::types::catalog::{
    join_path, now, split_path, Catalog, Category, Link, NodePayload, TreeNode, PATH_SEPARATOR,
};
use crate::types::import::{
    non_blank, FailureReason, ImportOperation, OperationKind, OperationOutcome, OperationPayload,
    OperationStatus, SkipReason, TargetKind,
};

/// Outcome of one operation plus the root categories it modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub outcome: OperationOutcome,
    /// Root category paths touched; empty unless the outcome succeeded.
    pub touched_roots: Vec<String>,
}

/// A successful mutation.
struct Change {
    message: String,
    touched_roots: Vec<String>,
}

enum Rejection {
    Failed(FailureReason),
    Skipped(SkipReason),
}

impl From<FailureReason> for Rejection {
    fn from(reason: FailureReason) -> Self {
        Rejection::Failed(reason)
    }
}

/// Performs Add/Update/Delete mutations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Applier {
    resolver: Resolver,
}

impl Applier {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Applies `op` to `catalog`. Never panics on bad data: every problem
    /// becomes a Failed or Skipped outcome.
    pub fn apply(&self, catalog: &mut Catalog, op: &ImportOperation) -> Applied {
        let result = match op.operation {
            OperationKind::Add => self.add(catalog, op),
            OperationKind::Update => self.update(catalog, op),
            OperationKind::Delete => self.delete(catalog, op),
        };

        let (status, message, touched_roots) = match result {
            Ok(change) => (OperationStatus::Succeeded, change.message, change.touched_roots),
            Err(Rejection::Failed(reason)) => {
                let message = reason.to_string();
                (OperationStatus::Failed(reason), message, Vec::new())
            }
            Err(Rejection::Skipped(reason)) => {
                let message = reason.to_string();
                (OperationStatus::Skipped(reason), message, Vec::new())
            }
        };

        debug!(
            operation = %op.operation,
            target = %op.target,
            identifier = %op.identifier,
            %message,
            "applied import operation"
        );

        Applied {
            outcome: OperationOutcome {
                operation: op.operation,
                target: op.target,
                status,
                message,
                identifier: op.identifier.clone(),
            },
            touched_roots,
        }
    }

    // ─── Add ───

    fn add(&self, catalog: &mut Catalog, op: &ImportOperation) -> Result<Change, Rejection> {
        let payload = op.payload.clone().unwrap_or_default();
        check_fields_for(op.target, &payload)?;
        match op.target {
            TargetKind::Category => self.add_category(catalog, op, &payload),
            TargetKind::Link => self.add_link(catalog, op, &payload),
        }
    }

    fn add_category(
        &self,
        catalog: &mut Catalog,
        op: &ImportOperation,
        payload: &OperationPayload,
    ) -> Result<Change, Rejection> {
        let payload_name = match &payload.name {
            Some(raw) => {
                validate_label("category name", raw)?;
                Some(raw.trim())
            }
            None => None,
        };
        let explicit_name = payload_name.or_else(|| op.identifier.name_str());
        let (parent_path, name) = match (explicit_name, op.identifier.path_str()) {
            (Some(name), path) => (path.unwrap_or_default().to_string(), name.to_string()),
            (None, Some(path)) => {
                let segments = split_path(path);
                let (last, parents) = segments.split_last().ok_or_else(|| {
                    FailureReason::InvalidPayload("category name missing".to_string())
                })?;
                (join_path(parents), last.to_string())
            }
            (None, None) => {
                return Err(
                    FailureReason::InvalidPayload("category name missing".to_string()).into(),
                )
            }
        };
        validate_label("category name", &name)?;

        let parent = Resolver::resolve_category_path(catalog, &parent_path)
            .map_err(|_| FailureReason::ParentNotFound(parent_path.clone()))?;
        let canonical_parent = catalog.path_of(&parent).unwrap_or_default();
        let full_path = child_path(&canonical_parent, &name);

        let siblings = catalog
            .children(&parent)
            .ok_or_else(|| FailureReason::ParentNotFound(parent_path.clone()))?;
        if siblings
            .iter()
            .any(|n| n.as_category().is_some_and(|c| same_label(&c.name, &name)))
        {
            return Err(Rejection::Skipped(SkipReason::Duplicate(format!(
                "category '{}'",
                full_path
            ))));
        }

        let mut category = Category::new(&name);
        if let Some(description) = &payload.description {
            category.description = description.clone();
        }
        category.protection = payload.protection;

        let root = match parent.first() {
            Some(_) => catalog.root_name_of(&parent).unwrap_or_default(),
            None => name.clone(),
        };
        catalog
            .children_mut(&parent)
            .ok_or_else(|| FailureReason::ParentNotFound(parent_path.clone()))?
            .push(TreeNode::category(category));

        Ok(Change {
            message: format!("added category '{}'", full_path),
            touched_roots: vec![root],
        })
    }

    fn add_link(
        &self,
        catalog: &mut Catalog,
        op: &ImportOperation,
        payload: &OperationPayload,
    ) -> Result<Change, Rejection> {
        let parent_path = op
            .identifier
            .path_str()
            .ok_or_else(|| FailureReason::ParentNotFound("no category path given".to_string()))?;
        let parent = Resolver::resolve_category_path(catalog, parent_path)
            .map_err(|_| FailureReason::ParentNotFound(parent_path.to_string()))?;
        if parent.is_empty() {
            return Err(FailureReason::ParentNotFound(parent_path.to_string()).into());
        }

        if let Some(raw) = &payload.title {
            validate_label("link title", raw)?;
        }
        let title = non_blank(&payload.title)
            .or_else(|| op.identifier.title_str())
            .ok_or_else(|| FailureReason::InvalidPayload("link title missing".to_string()))?
            .to_string();
        let url = non_blank(&payload.url)
            .ok_or_else(|| FailureReason::InvalidPayload(format!("link '{}' has no url", title)))?
            .to_string();

        let canonical_parent = catalog.path_of(&parent).unwrap_or_default();
        let siblings = catalog
            .children(&parent)
            .ok_or_else(|| FailureReason::ParentNotFound(parent_path.to_string()))?;
        if siblings
            .iter()
            .any(|n| n.as_link().is_some_and(|l| same_label(&l.title, &title)))
        {
            return Err(Rejection::Skipped(SkipReason::Duplicate(format!(
                "link '{}' in '{}'",
                title, canonical_parent
            ))));
        }

        let mut link = Link::new(&title, &url, &canonical_parent);
        if let Some(description) = &payload.description {
            link.description = description.clone();
        }
        link.is_directory = payload.is_directory.unwrap_or(false);

        let root = catalog.root_name_of(&parent).unwrap_or_default();
        catalog
            .children_mut(&parent)
            .ok_or_else(|| FailureReason::ParentNotFound(parent_path.to_string()))?
            .push(TreeNode::link(link));

        Ok(Change {
            message: format!("added link '{}' to '{}'", title, canonical_parent),
            touched_roots: vec![root],
        })
    }

    // ─── Update ───

    fn update(&self, catalog: &mut Catalog, op: &ImportOperation) -> Result<Change, Rejection> {
        let payload = op.payload.as_ref().ok_or_else(|| {
            FailureReason::InvalidPayload("update requires a payload".to_string())
        })?;
        check_fields_for(op.target, payload)?;

        let address = self
            .resolver
            .resolve(catalog, op.target, &op.identifier)
            .map_err(|e| target_failure(e, op))?;

        match op.target {
            TargetKind::Category => update_category(catalog, &address, payload),
            TargetKind::Link => update_link(catalog, &address, payload),
        }
    }

    // ─── Delete ───

    fn delete(&self, catalog: &mut Catalog, op: &ImportOperation) -> Result<Change, Rejection> {
        let address = match self.resolver.resolve(catalog, op.target, &op.identifier) {
            Ok(address) => address,
            Err(ResolveError::NotFound(what)) => {
                return Err(Rejection::Skipped(SkipReason::AlreadyAbsent(what)))
            }
            Err(other) => return Err(target_failure(other, op).into()),
        };

        let (parent, index) = split_address(&address)?;
        let root = catalog.root_name_of(&address).unwrap_or_default();
        let path = catalog.path_of(&address).unwrap_or_default();

        let removed = catalog
            .children_mut(parent)
            .filter(|children| index < children.len())
            .map(|children| children.remove(index))
            .ok_or_else(|| FailureReason::TargetNotFound(op.identifier.to_string()))?;

        let message = match &removed.payload {
            NodePayload::Category(_) => format!(
                "deleted category '{}' ({} nodes)",
                path,
                removed.subtree_len()
            ),
            NodePayload::Link(link) => format!("deleted link '{}' from '{}'", link.title, path),
        };

        Ok(Change {
            message,
            touched_roots: vec![root],
        })
    }
}

fn update_category(
    catalog: &mut Catalog,
    address: &NodeAddress,
    payload: &OperationPayload,
) -> Result<Change, Rejection> {
    let (parent, index) = split_address(address)?;
    let old_root = catalog.root_name_of(address).unwrap_or_default();

    let rename = match payload.name.as_deref() {
        Some(raw) => {
            validate_label("category name", raw)?;
            let name = raw.trim();
            let siblings = catalog
                .children(parent)
                .ok_or_else(|| FailureReason::TargetNotFound(old_root.clone()))?;
            let conflict = siblings.iter().enumerate().any(|(i, n)| {
                i != index && n.as_category().is_some_and(|c| same_label(&c.name, name))
            });
            if conflict {
                return Err(FailureReason::NameConflict(name.to_string()).into());
            }
            Some(name.to_string())
        }
        None => None,
    };

    let node = catalog
        .node_mut(address)
        .ok_or_else(|| FailureReason::TargetNotFound(old_root.clone()))?;
    if let NodePayload::Category(category) = &mut node.payload {
        if let Some(name) = &rename {
            category.name = name.clone();
        }
        if let Some(description) = &payload.description {
            category.description = description.clone();
        }
        if payload.protection.is_some() {
            category.protection = payload.protection;
        }
        category.updated_at = now();
    }

    let path = catalog.path_of(address).unwrap_or_default();
    if rename.is_some() {
        if let Some(node) = catalog.node_mut(address) {
            refresh_link_paths(node, &path);
        }
    }

    let new_root = catalog.root_name_of(address).unwrap_or_default();
    let mut touched_roots = vec![new_root];
    if !touched_roots.contains(&old_root) {
        touched_roots.push(old_root);
    }

    Ok(Change {
        message: format!("updated category '{}'", path),
        touched_roots,
    })
}

fn update_link(
    catalog: &mut Catalog,
    address: &NodeAddress,
    payload: &OperationPayload,
) -> Result<Change, Rejection> {
    let (parent, index) = split_address(address)?;
    let root = catalog.root_name_of(address).unwrap_or_default();

    if let Some(title) = &payload.title {
        validate_label("link title", title)?;
        let siblings = catalog
            .children(parent)
            .ok_or_else(|| FailureReason::TargetNotFound(root.clone()))?;
        let conflict = siblings.iter().enumerate().any(|(i, n)| {
            i != index && n.as_link().is_some_and(|l| same_label(&l.title, title))
        });
        if conflict {
            return Err(FailureReason::NameConflict(title.to_string()).into());
        }
    }
    if let Some(url) = &payload.url {
        if url.trim().is_empty() {
            return Err(FailureReason::InvalidPayload("link url cannot be empty".to_string()).into());
        }
    }

    let node = catalog
        .node_mut(address)
        .ok_or_else(|| FailureReason::TargetNotFound(root.clone()))?;
    let NodePayload::Link(link) = &mut node.payload else {
        return Err(FailureReason::TargetNotFound(root).into());
    };
    if let Some(title) = &payload.title {
        link.title = title.trim().to_string();
    }
    if let Some(url) = &payload.url {
        link.url = url.trim().to_string();
    }
    if let Some(description) = &payload.description {
        link.description = description.clone();
    }
    if let Some(is_directory) = payload.is_directory {
        link.is_directory = is_directory;
    }
    link.updated_at = now();
    let message = format!("updated link '{}' in '{}'", link.title, link.category_path);

    Ok(Change {
        message,
        touched_roots: vec![root],
    })
}

/// Rewrites the denormalized `category_path` of every link below `node`.
fn refresh_link_paths(node: &mut TreeNode, path: &str) {
    for child in &mut node.children {
        let sub_path = child.as_category().map(|c| child_path(path, &c.name));
        match sub_path {
            Some(sub_path) => refresh_link_paths(child, &sub_path),
            None => {
                if let NodePayload::Link(link) = &mut child.payload {
                    link.category_path = path.to_string();
                }
            }
        }
    }
}

/// Rejects fields that belong to the other node kind.
fn check_fields_for(target: TargetKind, payload: &OperationPayload) -> Result<(), FailureReason> {
    let foreign = match target {
        TargetKind::Category => vec![
            ("title", payload.title.is_some()),
            ("url", payload.url.is_some()),
            ("is_directory", payload.is_directory.is_some()),
        ],
        TargetKind::Link => vec![
            ("name", payload.name.is_some()),
            ("protection", payload.protection.is_some()),
        ],
    };
    match foreign.iter().find(|(_, present)| *present) {
        Some((field, _)) => Err(FailureReason::InvalidPayload(format!(
            "field '{}' does not apply to a {}",
            field,
            target.to_string().to_lowercase()
        ))),
        None => Ok(()),
    }
}

fn validate_label(what: &str, value: &str) -> Result<(), FailureReason> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FailureReason::InvalidPayload(format!("{} cannot be empty", what)));
    }
    if what == "category name" && trimmed.contains(PATH_SEPARATOR) {
        return Err(FailureReason::InvalidPayload(format!(
            "{} '{}' contains '{}'",
            what, trimmed, PATH_SEPARATOR
        )));
    }
    Ok(())
}

fn target_failure(err: ResolveError, op: &ImportOperation) -> FailureReason {
    match err {
        ResolveError::NotFound(what) => FailureReason::TargetNotFound(what),
        ResolveError::Incomplete(msg) => {
            FailureReason::TargetNotFound(format!("{} ({})", op.identifier, msg))
        }
        ResolveError::Ambiguous { name, matches } => {
            FailureReason::AmbiguousTarget { name, matches }
        }
    }
}

fn split_address(address: &[usize]) -> Result<(&[usize], usize), FailureReason> {
    address
        .split_last()
        .map(|(last, parent)| (parent, *last))
        .ok_or_else(|| FailureReason::TargetNotFound("catalog root".to_string()))
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, name)
    }
}

fn same_label(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
