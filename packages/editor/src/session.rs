//! # Edit Session
//!
//! The context object for one editing session: the authoritative tree, its
//! undo/redo history, the id generator and the current selection. UI panels
//! drive the page exclusively through the methods here.
//!
//! Every applied structural mutation pushes exactly one history snapshot.
//! Selection changes never push. Mutations that cannot apply (unknown id,
//! missing parent, ...) leave everything unchanged and come back as
//! [`MutationOutcome::Noop`].

use crate::errors::{EditorError, MutationError};
use crate::history::{History, HistoryStep, DEFAULT_HISTORY_LIMIT};
use crate::mutations::{fresh_id, InsertNode, Mutation};
use crate::store::{self, NodePatch};
use pagesmith_model::{IdGenerator, Node, NodeId, Template, Tree};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of a structural mutation requested through the session
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Applied(T),

    /// The tree is unchanged and no history entry was recorded
    Noop { reason: MutationError },
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            MutationOutcome::Applied(value) => Some(value),
            MutationOutcome::Noop { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<T, MutationError> {
        match self {
            MutationOutcome::Applied(value) => Ok(value),
            MutationOutcome::Noop { reason } => Err(reason),
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        match self {
            MutationOutcome::Applied(value) => MutationOutcome::Applied(f(value)),
            MutationOutcome::Noop { reason } => MutationOutcome::Noop { reason },
        }
    }
}

/// Outcome of undo/redo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    Applied,

    /// Already at the oldest (undo) or newest (redo) snapshot
    Nothing,
}

/// Extract the block type carried by a drag-and-drop payload
pub fn parse_drop_payload(payload: &str) -> Option<&str> {
    let kind = payload.trim();
    (!kind.is_empty()).then_some(kind)
}

/// Single editing session
pub struct EditSession {
    tree: Tree,
    history: History,
    ids: IdGenerator,
    selected: Option<NodeId>,
}

impl EditSession {
    /// Session over an empty page
    pub fn new() -> Self {
        Self::with_tree(Tree::new())
    }

    pub fn with_tree(tree: Tree) -> Self {
        Self::with_history_limit(tree, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(tree: Tree, limit: usize) -> Self {
        Self {
            history: History::with_limit(tree.clone(), limit),
            tree,
            ids: IdGenerator::new(),
            selected: None,
        }
    }

    /// Replace the id generator (seeded generators make ids reproducible)
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Open a session on a page stored as JSON. Pages with duplicate ids
    /// are refused.
    pub fn from_json(json: &str, history_limit: usize) -> Result<Self, EditorError> {
        let tree = Tree::from_json(json)?;
        if let Some(duplicate) = tree.duplicate_ids().into_iter().next() {
            return Err(MutationError::DuplicateId(duplicate).into());
        }
        Ok(Self::with_history_limit(tree, history_limit))
    }

    /// The authoritative tree
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Create a block of `kind`. The new node becomes the selection.
    pub fn insert(
        &mut self,
        kind: &str,
        content: Option<&str>,
        parent: Option<&NodeId>,
        index: Option<usize>,
    ) -> MutationOutcome<Arc<Node>> {
        let insert = InsertNode {
            content: content.map(str::to_string),
            parent_id: parent.cloned(),
            index,
            id: Some(fresh_id(&self.tree, &mut self.ids, kind)),
            ..InsertNode::new(kind)
        };
        let result = insert.apply(&self.tree, &mut self.ids);
        self.commit(&Mutation::Insert(insert), result)
    }

    /// Handle a drop of a sidebar block. `None` when the payload names no
    /// block type.
    pub fn drop_block(
        &mut self,
        payload: &str,
        parent: Option<&NodeId>,
        index: Option<usize>,
    ) -> Option<MutationOutcome<Arc<Node>>> {
        let kind = parse_drop_payload(payload)?.to_string();
        Some(self.insert(&kind, None, parent, index))
    }

    pub fn update(&mut self, id: &NodeId, patch: NodePatch) -> MutationOutcome<()> {
        self.apply(Mutation::Update {
            node_id: id.clone(),
            patch,
        })
        .map(|_| ())
    }

    /// Remove a node and its subtree, returning the removed subtree
    pub fn delete(&mut self, id: &NodeId) -> MutationOutcome<Arc<Node>> {
        let result = store::delete(&self.tree, id);
        self.commit(&Mutation::Delete { node_id: id.clone() }, result)
    }

    /// Relocate a node in one undoable step
    pub fn move_node(
        &mut self,
        id: &NodeId,
        new_parent: Option<&NodeId>,
        index: Option<usize>,
    ) -> MutationOutcome<()> {
        self.apply(Mutation::Move {
            node_id: id.clone(),
            new_parent_id: new_parent.cloned(),
            index,
        })
        .map(|_| ())
    }

    /// Install a pre-built tree as the whole page
    pub fn replace_all(&mut self, nodes: Tree) -> MutationOutcome<()> {
        self.apply(Mutation::ReplaceAll { nodes }).map(|_| ())
    }

    pub fn apply_template(&mut self, template: &Template) -> MutationOutcome<()> {
        info!(template = %template.id, "Applying template");
        self.replace_all(template.nodes.clone())
    }

    /// Apply any mutation. Yields the inserted node for inserts and the
    /// removed subtree for deletes.
    pub fn apply(&mut self, mut mutation: Mutation) -> MutationOutcome<Option<Arc<Node>>> {
        if let Mutation::Insert(insert) = &mut mutation {
            if insert.id.is_none() {
                insert.id = Some(fresh_id(&self.tree, &mut self.ids, &insert.kind));
            }
        }
        let result = mutation
            .apply(&self.tree, &mut self.ids)
            .map(|result| (result.tree, result.node));
        self.commit(&mutation, result)
    }

    /// On success the tree is replaced, one snapshot is pushed and the
    /// selection is kept consistent with the new tree.
    #[instrument(skip_all, fields(op = mutation.name()))]
    fn commit<T>(
        &mut self,
        mutation: &Mutation,
        result: Result<(Tree, T), MutationError>,
    ) -> MutationOutcome<T> {
        let (tree, value) = match result {
            Ok(applied) => applied,
            Err(reason) => {
                warn!(%reason, "Mutation left the page unchanged");
                return MutationOutcome::Noop { reason };
            }
        };

        self.tree = tree;
        self.history
            .push_labeled(self.tree.clone(), Some(mutation.label()));

        match mutation {
            Mutation::Insert(InsertNode { id: Some(id), .. }) => self.selected = Some(id.clone()),
            Mutation::Update {
                node_id,
                patch: NodePatch { id: Some(new_id), .. },
            } if self.selected.as_ref() == Some(node_id) => {
                self.selected = Some(new_id.clone());
            }
            Mutation::ReplaceAll { .. } => self.selected = None,
            _ => {}
        }
        self.drop_stale_selection();

        MutationOutcome::Applied(value)
    }

    pub fn undo(&mut self) -> HistoryOutcome {
        let step = self.history.undo();
        self.restore(step)
    }

    pub fn redo(&mut self) -> HistoryOutcome {
        let step = self.history.redo();
        self.restore(step)
    }

    fn restore(&mut self, step: HistoryStep) -> HistoryOutcome {
        match step {
            HistoryStep::Moved(tree) => {
                self.tree = tree;
                self.selected = None;
                HistoryOutcome::Applied
            }
            HistoryStep::Exhausted => HistoryOutcome::Nothing,
        }
    }

    /// Select the node with `id`. Returns false (selection unchanged) when
    /// no such node exists.
    pub fn select(&mut self, id: &NodeId) -> bool {
        if !self.tree.contains(id.as_str()) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Arc<Node>> {
        self.selected
            .as_ref()
            .and_then(|id| self.tree.find(id.as_str()))
    }

    fn drop_stale_selection(&mut self) {
        let stale = self
            .selected
            .as_ref()
            .is_some_and(|id| !self.tree.contains(id.as_str()));
        if stale {
            self.selected = None;
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
