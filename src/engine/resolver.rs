//! Identifier resolution against the catalog forest.
//!
//! Resolution never creates nodes and never holds on to tree references: it
//! returns a [`NodeAddress`], the child-index path from the forest down to the
//! node, which the applier re-borrows mutably.

use crate::types::catalog::{split_path, Catalog, TreeNode};
use crate::types::import::{Identifier, TargetKind};
use crate::types::settings::NameMatchPolicy;

/// Child indices from the forest to a node. Empty means the forest itself.
pub type NodeAddress = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{0}")]
    NotFound(String),
    #[error("{matches} nodes match '{name}'")]
    Ambiguous { name: String, matches: usize },
    #[error("{0}")]
    Incomplete(String),
}

/// Locates categories and links by path, name or title.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    policy: NameMatchPolicy,
}

impl Resolver {
    pub fn new(policy: NameMatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NameMatchPolicy {
        self.policy
    }

    /// Resolves an existing node of `target` kind.
    ///
    /// A path takes precedence over name/title. For links the path names the
    /// owning category and the title picks a direct child of it.
    pub fn resolve(
        &self,
        catalog: &Catalog,
        target: TargetKind,
        identifier: &Identifier,
    ) -> Result<NodeAddress, ResolveError> {
        match (target, identifier.path_str()) {
            (TargetKind::Category, Some(path)) => {
                if split_path(path).is_empty() {
                    return Err(ResolveError::NotFound(format!("category path '{}'", path)));
                }
                Self::resolve_category_path(catalog, path)
            }
            (TargetKind::Link, Some(path)) => {
                let title = identifier.title_str().ok_or_else(|| {
                    ResolveError::Incomplete(format!("link under '{}' has no title", path))
                })?;
                let mut address = Self::resolve_category_path(catalog, path)?;
                let children = catalog
                    .children(&address)
                    .ok_or_else(|| ResolveError::NotFound(format!("category path '{}'", path)))?;
                let idx = children
                    .iter()
                    .position(|c| c.as_link().is_some_and(|l| l.title == title))
                    .ok_or_else(|| {
                        ResolveError::NotFound(format!("link '{}' in '{}'", title, path))
                    })?;
                address.push(idx);
                Ok(address)
            }
            (TargetKind::Category, None) => {
                let name = identifier.name_str().ok_or_else(|| {
                    ResolveError::Incomplete("category identifier has neither path nor name".into())
                })?;
                self.find_by_label(catalog, name, |n| {
                    n.as_category().is_some_and(|c| c.name == name)
                })
                .map_err(|e| match e {
                    ResolveError::NotFound(_) => {
                        ResolveError::NotFound(format!("category '{}'", name))
                    }
                    other => other,
                })
            }
            (TargetKind::Link, None) => {
                let title = identifier.title_str().ok_or_else(|| {
                    ResolveError::Incomplete("link identifier has neither path nor title".into())
                })?;
                self.find_by_label(catalog, title, |n| {
                    n.as_link().is_some_and(|l| l.title == title)
                })
                .map_err(|e| match e {
                    ResolveError::NotFound(_) => ResolveError::NotFound(format!("link '{}'", title)),
                    other => other,
                })
            }
        }
    }

    /// Walks `path` segment by segment, matching category names case-sensitively.
    ///
    /// An empty path resolves to the forest (empty address).
    pub fn resolve_category_path(catalog: &Catalog, path: &str) -> Result<NodeAddress, ResolveError> {
        let mut address = NodeAddress::new();
        let mut nodes = &catalog.roots;
        for segment in split_path(path) {
            let idx = nodes
                .iter()
                .position(|n| n.as_category().is_some_and(|c| c.name == segment))
                .ok_or_else(|| {
                    ResolveError::NotFound(format!(
                        "category path '{}' (missing segment '{}')",
                        path, segment
                    ))
                })?;
            address.push(idx);
            nodes = &nodes[idx].children;
        }
        Ok(address)
    }

    /// Pre-order search across the whole forest.
    fn find_by_label<F>(
        &self,
        catalog: &Catalog,
        label: &str,
        matches: F,
    ) -> Result<NodeAddress, ResolveError>
    where
        F: Fn(&TreeNode) -> bool,
    {
        let limit = match self.policy {
            NameMatchPolicy::FirstMatch => 1,
            NameMatchPolicy::RejectAmbiguous => usize::MAX,
        };
        let mut found = Vec::new();
        let mut prefix = NodeAddress::new();
        collect_preorder(&catalog.roots, &mut prefix, &matches, &mut found, limit);

        match found.len() {
            0 => Err(ResolveError::NotFound(label.to_string())),
            1 => Ok(found.swap_remove(0)),
            n => Err(ResolveError::Ambiguous {
                name: label.to_string(),
                matches: n,
            }),
        }
    }
}

fn collect_preorder<F>(
    nodes: &[TreeNode],
    prefix: &mut NodeAddress,
    matches: &F,
    found: &mut Vec<NodeAddress>,
    limit: usize,
) where
    F: Fn(&TreeNode) -> bool,
{
    for (idx, node) in nodes.iter().enumerate() {
        if found.len() >= limit {
            return;
        }
        prefix.push(idx);
        if matches(node) {
            found.push(prefix.clone());
        }
        collect_preorder(&node.children, prefix, matches, found, limit);
        prefix.pop();
    }
}
