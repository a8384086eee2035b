//! Catalog tree types: categories, links and the root-level forest.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Separator between category names in a path (`Work/Tools`).
pub const PATH_SEPARATOR: char = '/';

/// Returns the current UNIX timestamp in seconds.
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Splits a category path into trimmed, non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Joins path segments back into the canonical `a/b/c` form.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}

/// How a password-protected category behaves when opened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionMode {
    /// Contents are listed but opening a link asks for the password.
    RequirePassword,
    /// Contents stay hidden until the password is entered.
    HideContents,
}

/// Where a category came from when it was created by a browser bookmark import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkSource {
    pub browser: String,
    pub profile: Option<String>,
    pub imported_at: i64,
}

/// A named container of links and nested categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub protection: Option<ProtectionMode>,
    #[serde(default)]
    pub bookmark_source: Option<BookmarkSource>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        let ts = now();
        Self {
            name: name.to_string(),
            description: String::new(),
            created_at: ts,
            updated_at: ts,
            protection: None,
            bookmark_source: None,
        }
    }
}

/// A leaf entry referencing a URL or a filesystem path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_directory: bool,
    /// Full path of the owning category, kept for display.
    pub category_path: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Link {
    pub fn new(title: &str, url: &str, category_path: &str) -> Self {
        let ts = now();
        Self {
            title: title.to_string(),
            url: url.to_string(),
            description: String::new(),
            is_directory: false,
            category_path: category_path.to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }
}

/// Node payload: exactly one of a category or a link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePayload {
    Category(Category),
    Link(Link),
}

/// A node of the catalog tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub payload: NodePayload,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn category(category: Category) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            payload: NodePayload::Category(category),
            children: Vec::new(),
        }
    }

    pub fn link(link: Link) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            payload: NodePayload::Link(link),
            children: Vec::new(),
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match &self.payload {
            NodePayload::Category(c) => Some(c),
            NodePayload::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match &self.payload {
            NodePayload::Link(l) => Some(l),
            NodePayload::Category(_) => None,
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self.payload, NodePayload::Category(_))
    }

    /// Category name or link title.
    pub fn label(&self) -> &str {
        match &self.payload {
            NodePayload::Category(c) => &c.name,
            NodePayload::Link(l) => &l.title,
        }
    }

    /// Finds a direct category child by exact name.
    pub fn child_category(&self, name: &str) -> Option<&TreeNode> {
        self.children
            .iter()
            .find(|c| c.as_category().is_some_and(|cat| cat.name == name))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }
}

/// The root-level forest of category trees handed to the import engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub roots: Vec<TreeNode>,
}

impl Catalog {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    /// Finds a root category by exact name.
    pub fn root(&self, name: &str) -> Option<&TreeNode> {
        self.roots
            .iter()
            .find(|r| r.as_category().is_some_and(|c| c.name == name))
    }

    /// Looks up a category by its `/`-separated path.
    pub fn category_at(&self, path: &str) -> Option<&TreeNode> {
        let segments = split_path(path);
        let (first, rest) = segments.split_first()?;
        let mut node = self.root(first)?;
        for segment in rest {
            node = node.child_category(segment)?;
        }
        Some(node)
    }

    /// Returns the node at an index address (see `engine::resolver::NodeAddress`).
    pub fn node(&self, address: &[usize]) -> Option<&TreeNode> {
        let (first, rest) = address.split_first()?;
        let mut node = self.roots.get(*first)?;
        for idx in rest {
            node = node.children.get(*idx)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, address: &[usize]) -> Option<&mut TreeNode> {
        let (first, rest) = address.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for idx in rest {
            node = node.children.get_mut(*idx)?;
        }
        Some(node)
    }

    /// Children of the node at `address`, or the roots for an empty address.
    pub fn children_mut(&mut self, address: &[usize]) -> Option<&mut Vec<TreeNode>> {
        if address.is_empty() {
            return Some(&mut self.roots);
        }
        self.node_mut(address).map(|n| &mut n.children)
    }

    pub fn children(&self, address: &[usize]) -> Option<&Vec<TreeNode>> {
        if address.is_empty() {
            return Some(&self.roots);
        }
        self.node(address).map(|n| &n.children)
    }

    /// Full category path of the node at `address` (labels of all category ancestors
    /// and, if it is a category, the node itself).
    pub fn path_of(&self, address: &[usize]) -> Option<String> {
        let mut segments = Vec::with_capacity(address.len());
        let mut nodes = &self.roots;
        for idx in address {
            let node = nodes.get(*idx)?;
            if let Some(cat) = node.as_category() {
                segments.push(cat.name.as_str());
            }
            nodes = &node.children;
        }
        Some(join_path(&segments))
    }

    /// Name of the root category that owns the node at `address`.
    pub fn root_name_of(&self, address: &[usize]) -> Option<String> {
        let first = address.first()?;
        self.roots.get(*first).map(|r| r.label().to_string())
    }

    /// Total number of nodes across every root.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
