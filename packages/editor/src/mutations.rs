//! # Page Mutations
//!
//! Serializable form of every structural edit a collaborator can request.
//! A [`Mutation`] is applied against the current tree and yields the next
//! tree; the session records exactly one history snapshot per applied
//! mutation.
//!
//! ### Insert
//! - Builds the node through the registry (defaults back-filled)
//! - Fresh id unless one is supplied
//! - Fails if the parent is missing or cannot hold children
//!
//! ### Update
//! - Attributes merged key by key, content replaced
//! - `id` / `children` untouched unless part of the patch
//!
//! ### Delete
//! - Removes the node and all descendants
//!
//! ### Move
//! - Atomic relocation, one undo step
//! - Fails if it would place a node inside itself
//!
//! ### ReplaceAll
//! - Installs a pre-built tree wholesale (template application)
//! - Registry defaults back-filled on every installed node

use crate::errors::MutationError;
use crate::store::{self, NodePatch};
use pagesmith_model::{Attributes, IdGenerator, Node, NodeId, Tree};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Create a node of `kind` under `parent_id` (top level when absent)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Pre-existing id to reuse instead of generating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
}

impl InsertNode {
    /// Registry defaults, generated id, appended at top level
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            content: None,
            attributes: Attributes::new(),
            parent_id: None,
            index: None,
            id: None,
        }
    }

    /// Build the node through the registry and place it. Every node the
    /// editor creates goes through here.
    pub fn apply(&self, tree: &Tree, ids: &mut IdGenerator) -> Result<(Tree, Arc<Node>), MutationError> {
        let id = match &self.id {
            Some(id) => id.clone(),
            None => fresh_id(tree, ids, &self.kind),
        };
        let node = store::create_node(
            id,
            &self.kind,
            self.content.clone(),
            self.attributes.clone(),
            vec![],
        );
        store::insert(tree, node, self.parent_id.as_ref(), self.index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    Insert(InsertNode),

    #[serde(rename_all = "camelCase")]
    Update { node_id: NodeId, patch: NodePatch },

    #[serde(rename_all = "camelCase")]
    Delete { node_id: NodeId },

    #[serde(rename_all = "camelCase")]
    Move {
        node_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_parent_id: Option<NodeId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    /// Replace the whole page (template application)
    ReplaceAll { nodes: Tree },
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// The next authoritative tree
    pub tree: Tree,

    /// Inserted node for `Insert`, removed subtree for `Delete`
    pub node: Option<Arc<Node>>,
}

impl Mutation {
    /// Insert with registry defaults and a generated id
    pub fn insert(kind: impl Into<String>) -> Self {
        Mutation::Insert(InsertNode::new(kind))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Insert(_) => "insert",
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
            Mutation::Move { .. } => "move",
            Mutation::ReplaceAll { .. } => "replace_all",
        }
    }

    /// Short human description, recorded with the history snapshot
    pub fn label(&self) -> String {
        match self {
            Mutation::Insert(insert) => format!("insert {}", insert.kind),
            Mutation::Update { node_id, .. } => format!("update {}", node_id),
            Mutation::Delete { node_id } => format!("delete {}", node_id),
            Mutation::Move { node_id, .. } => format!("move {}", node_id),
            Mutation::ReplaceAll { .. } => "replace page".to_string(),
        }
    }

    /// Apply to `tree`, producing the next tree. `tree` itself is untouched.
    pub fn apply(&self, tree: &Tree, ids: &mut IdGenerator) -> Result<MutationResult, MutationError> {
        match self {
            Mutation::Insert(insert) => {
                let (tree, node) = insert.apply(tree, ids)?;
                Ok(MutationResult {
                    tree,
                    node: Some(node),
                })
            }

            Mutation::Update { node_id, patch } => Ok(MutationResult {
                tree: store::update(tree, node_id, patch)?,
                node: None,
            }),

            Mutation::Delete { node_id } => {
                let (tree, removed) = store::delete(tree, node_id)?;
                Ok(MutationResult {
                    tree,
                    node: Some(removed),
                })
            }

            Mutation::Move {
                node_id,
                new_parent_id,
                index,
            } => Ok(MutationResult {
                tree: store::move_node(tree, node_id, new_parent_id.as_ref(), *index)?,
                node: None,
            }),

            Mutation::ReplaceAll { nodes } => {
                if let Some(duplicate) = nodes.duplicate_ids().into_iter().next() {
                    return Err(MutationError::DuplicateId(duplicate));
                }
                let mut tree = nodes.clone();
                for root in tree.roots_mut() {
                    store::backfill_subtree(root);
                }
                Ok(MutationResult { tree, node: None })
            }
        }
    }
}

/// Generate an id not yet present in `tree`
pub(crate) fn fresh_id(tree: &Tree, ids: &mut IdGenerator, kind: &str) -> NodeId {
    loop {
        let id = ids.new_id(kind);
        if !tree.contains(id.as_str()) {
            return id;
        }
    }
}
