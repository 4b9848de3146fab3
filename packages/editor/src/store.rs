//! # Tree Store
//!
//! Structural operations on a [`Tree`]. Every function takes the current
//! tree by reference and returns a new tree value; the input is never
//! modified. Unchanged subtrees are shared between input and output, only
//! the path from the top level to the edited node is copied.
//!
//! ## Semantics
//!
//! - Lookup is pre-order depth-first, siblings in stored order.
//! - Insertion indices are clamped to `[0, len]`; `None` appends.
//! - Failures ([`MutationError`]) mean "tree unchanged". They are returned,
//!   never swallowed, so callers can tell a no-op from a success.
//! - A move is one operation (remove + reinsert of the same shared
//!   subtree), so it yields a single history entry.

use crate::errors::MutationError;
use pagesmith_model::{backfill_defaults, default_content, Attributes, Node, NodeId, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Build a node of `kind`, back-filling registry defaults.
///
/// `content` falls back to the registry default only when `None`;
/// caller-supplied attributes win over defaults key by key.
pub fn create_node(
    id: NodeId,
    kind: &str,
    content: Option<String>,
    mut attributes: Attributes,
    children: Vec<Arc<Node>>,
) -> Node {
    backfill_defaults(kind, &mut attributes);
    Node {
        id,
        kind: kind.to_string(),
        content: Some(content.unwrap_or_else(|| default_content(kind))),
        attributes,
        children,
    }
}

/// Field replacements for [`update`]. Attributes are merged key by key;
/// `id` and `children` change only when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<Node>>>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<pagesmith_model::AttrValue>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }
}

/// Insert `node` (and its subtree) under `parent`, or at top level.
///
/// The node keeps its id, which lets callers re-insert a node they removed.
/// Every id in the inserted subtree must be absent from `tree`.
pub fn insert(
    tree: &Tree,
    node: Node,
    parent: Option<&NodeId>,
    index: Option<usize>,
) -> Result<(Tree, Arc<Node>), MutationError> {
    let incoming = node.subtree_ids();
    let mut seen = HashSet::new();
    for id in &incoming {
        if !seen.insert(id) || tree.contains(id.as_str()) {
            return Err(MutationError::DuplicateId(id.clone()));
        }
    }

    let node = Arc::new(node);
    let next = insert_shared(tree, Arc::clone(&node), parent, index)?;
    debug!(node_id = %node.id, kind = %node.kind, parent = ?parent, "Inserted node");
    Ok((next, node))
}

/// Replace fields of the node with `id`
pub fn update(tree: &Tree, id: &NodeId, patch: &NodePatch) -> Result<Tree, MutationError> {
    let path = path_to(tree.roots(), id.as_str())
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let current = tree
        .find(id.as_str())
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;

    let final_id = patch.id.as_ref().unwrap_or(id);
    if final_id != id && tree.contains(final_id.as_str()) {
        return Err(MutationError::DuplicateId(final_id.clone()));
    }

    if let Some(children) = &patch.children {
        if !children.is_empty() && !current.is_container() {
            return Err(MutationError::NotAContainer(id.clone()));
        }
        // New children may reuse ids from the subtree they replace, but
        // nothing else in the tree.
        let replaced: HashSet<NodeId> = current.subtree_ids().into_iter().collect();
        let mut seen = HashSet::new();
        seen.insert(final_id.clone());
        for child in children {
            for child_id in child.subtree_ids() {
                let clashes_outside = !replaced.contains(&child_id) && tree.contains(child_id.as_str());
                if clashes_outside || !seen.insert(child_id.clone()) {
                    return Err(MutationError::DuplicateId(child_id));
                }
            }
        }
    }

    let mut next = tree.clone();
    let node = node_mut(next.roots_mut(), &path)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;

    if let Some(content) = &patch.content {
        node.content = Some(content.clone());
    }
    for (key, value) in &patch.attributes {
        node.attributes.insert(key.clone(), value.clone());
    }
    if let Some(children) = &patch.children {
        node.children = children.clone();
        for child in &mut node.children {
            backfill_subtree(child);
        }
    }
    if let Some(new_id) = &patch.id {
        node.id = new_id.clone();
    }

    debug!(node_id = %id, "Updated node");
    Ok(next)
}

/// Remove the node with `id` and its whole subtree, returning the removed
/// subtree alongside the new tree.
pub fn delete(tree: &Tree, id: &NodeId) -> Result<(Tree, Arc<Node>), MutationError> {
    let path = path_to(tree.roots(), id.as_str())
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    let (index, parent_path) = path
        .split_last()
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;

    let mut next = tree.clone();
    let siblings = siblings_mut(&mut next, parent_path)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
    if *index >= siblings.len() {
        return Err(MutationError::NodeNotFound(id.clone()));
    }
    let removed = siblings.remove(*index);

    debug!(node_id = %id, descendants = removed.descendant_count(), "Deleted node");
    Ok((next, removed))
}

/// Move the node with `id` under `new_parent` (or to top level) at `index`.
///
/// `index` refers to the target sibling list after the node has been taken
/// out of its old position, and is clamped like an insertion index.
pub fn move_node(
    tree: &Tree,
    id: &NodeId,
    new_parent: Option<&NodeId>,
    index: Option<usize>,
) -> Result<Tree, MutationError> {
    if !tree.contains(id.as_str()) {
        return Err(MutationError::NodeNotFound(id.clone()));
    }
    if let Some(parent_id) = new_parent {
        let parent = tree
            .find(parent_id.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
        if parent_id == id || tree.is_descendant(id.as_str(), parent_id.as_str()) {
            return Err(MutationError::CycleDetected(id.clone()));
        }
        if !parent.is_container() {
            return Err(MutationError::NotAContainer(parent_id.clone()));
        }
    }

    let (detached, node) = delete(tree, id)?;
    let next = insert_shared(&detached, node, new_parent, index)?;
    debug!(node_id = %id, parent = ?new_parent, index = ?index, "Moved node");
    Ok(next)
}

fn insert_shared(
    tree: &Tree,
    node: Arc<Node>,
    parent: Option<&NodeId>,
    index: Option<usize>,
) -> Result<Tree, MutationError> {
    let mut next = tree.clone();
    let siblings = match parent {
        None => next.roots_mut(),
        Some(parent_id) => {
            let path = path_to(tree.roots(), parent_id.as_str())
                .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            let target = node_mut(next.roots_mut(), &path)
                .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            if !target.is_container() {
                return Err(MutationError::NotAContainer(parent_id.clone()));
            }
            &mut target.children
        }
    };
    let at = index.unwrap_or(siblings.len()).min(siblings.len());
    siblings.insert(at, node);
    Ok(next)
}

/// Give every node of the subtree its type's default attribute keys.
/// Values already present are kept.
pub(crate) fn backfill_subtree(node: &mut Arc<Node>) {
    let node = Arc::make_mut(node);
    backfill_defaults(&node.kind, &mut node.attributes);
    for child in &mut node.children {
        backfill_subtree(child);
    }
}

/// Sibling indices from the top level down to the node with `id`
fn path_to(nodes: &[Arc<Node>], id: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id.as_str() == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_to(&node.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Unshare the nodes along `path` and return the last one
fn node_mut<'a>(roots: &'a mut [Arc<Node>], path: &[usize]) -> Option<&'a mut Node> {
    let (first, rest) = path.split_first()?;
    let mut node = Arc::make_mut(roots.get_mut(*first)?);
    for index in rest {
        node = Arc::make_mut(node.children.get_mut(*index)?);
    }
    Some(node)
}

fn siblings_mut<'a>(tree: &'a mut Tree, parent_path: &[usize]) -> Option<&'a mut Vec<Arc<Node>>> {
    if parent_path.is_empty() {
        return Some(tree.roots_mut());
    }
    node_mut(tree.roots_mut(), parent_path).map(|parent| &mut parent.children)
}
