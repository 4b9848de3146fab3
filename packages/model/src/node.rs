//! # Document Tree
//!
//! A page is an ordered sequence of top-level [`Node`]s. Container nodes
//! (sections, columns) hold further nodes in `children`; sibling order is
//! the visual order and every read path preserves it.
//!
//! ## Sharing
//!
//! Children are stored as `Arc<Node>`. Cloning a [`Tree`] is therefore cheap
//! and an edit only copies the nodes on the path from the top level down to
//! the edited node (see `Arc::make_mut`). Every other subtree stays shared
//! with whatever snapshot still references it.

use crate::registry::BlockKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Globally unique node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Attribute value: string, number, boolean or list of strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the value counts as "set" for style generation.
    ///
    /// Zero, `false`, empty strings and empty lists are not.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Number(n) => *n != 0.0 && !n.is_nan(),
            AttrValue::Text(s) => !s.is_empty(),
            AttrValue::List(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(f64::from(n))
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(items: Vec<String>) -> Self {
        AttrValue::List(items)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(items: Vec<&str>) -> Self {
        AttrValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Attribute name → value. Iteration order is by key, which keeps
/// serialized pages stable; the mapping itself carries no order.
pub type Attributes = BTreeMap<String, AttrValue>;

/// One content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Block type name (`heading`, `section`, ...). Unknown names are kept
    /// as-is and rendered through the fallback path.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default)]
    pub attributes: Attributes,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<Node>>,
}

impl Node {
    /// Parsed block kind, `None` for unknown types
    pub fn block_kind(&self) -> Option<BlockKind> {
        BlockKind::parse(&self.kind)
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn is_container(&self) -> bool {
        crate::registry::is_container(&self.kind)
    }

    /// Pre-order search of this node's subtree (the node itself included)
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id.as_str() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes strictly below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Ids of this node and all of its descendants, pre-order
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![self.id.clone()];
        for child in &self.children {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}

// Children are released iteratively so that dropping a very deep tree
// does not recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(child) {
                pending.append(&mut node.children);
            }
        }
    }
}

/// Where a node sits: its parent (`None` at top level) and sibling index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub parent: Option<NodeId>,
    pub index: usize,
}

/// The whole document: an ordered top-level sequence of nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<Arc<Node>>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(nodes: Vec<Arc<Node>>) -> Self {
        Self { nodes }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Top-level nodes in order
    pub fn roots(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Mutable access to the top-level sequence of this tree value.
    ///
    /// Nodes are shared with other trees; edit them through
    /// `Arc::make_mut` so that only this value observes the change.
    pub fn roots_mut(&mut self) -> &mut Vec<Arc<Node>> {
        &mut self.nodes
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(|n| 1 + n.descendant_count()).sum()
    }

    /// Pre-order depth-first iteration, siblings in stored order
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: self.nodes.iter().rev().collect(),
        }
    }

    /// First node with `id` in pre-order
    pub fn find(&self, id: &str) -> Option<&Arc<Node>> {
        self.depth_first().find(|node| node.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// All ids in pre-order
    pub fn ids(&self) -> Vec<NodeId> {
        self.depth_first().map(|node| node.id.clone()).collect()
    }

    /// Ids that occur more than once, each reported once
    pub fn duplicate_ids(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for node in self.depth_first() {
            if !seen.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
                duplicates.push(node.id.clone());
            }
        }
        duplicates
    }

    /// Parent and sibling index of the node with `id`
    pub fn locate(&self, id: &str) -> Option<Location> {
        fn search(nodes: &[Arc<Node>], parent: Option<&NodeId>, id: &str) -> Option<Location> {
            for (index, node) in nodes.iter().enumerate() {
                if node.id.as_str() == id {
                    return Some(Location {
                        parent: parent.cloned(),
                        index,
                    });
                }
                if let Some(found) = search(&node.children, Some(&node.id), id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.nodes, None, id)
    }

    /// True when `id` lies strictly inside the subtree rooted at `ancestor`
    pub fn is_descendant(&self, ancestor: &str, id: &str) -> bool {
        self.find(ancestor)
            .map(|node| node.children.iter().any(|child| child.find(id).is_some()))
            .unwrap_or(false)
    }
}

/// Pre-order iterator over a [`Tree`]
pub struct DepthFirst<'a> {
    stack: Vec<&'a Arc<Node>>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Arc<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
