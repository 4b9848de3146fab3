//! # Undo/Redo History
//!
//! Linear, bounded sequence of whole-tree snapshots plus a cursor marking
//! the active one.
//!
//! ## Design
//!
//! - Each applied mutation pushes one snapshot of the resulting tree
//! - Undo/redo only move the cursor and hand back the snapshot there
//! - A push after undo discards every snapshot past the cursor
//! - At most `limit` snapshots are kept; the oldest is evicted first
//! - Snapshots share structure with the live tree (`Arc` children), so a
//!   push costs the path that changed, not the whole page
//!
//! ## Example
//!
//! ```rust
//! use pagesmith_editor::{History, HistoryStep};
//! use pagesmith_model::Tree;
//!
//! let mut history = History::new(Tree::new());
//! assert_eq!(history.undo(), HistoryStep::Exhausted);
//!
//! history.push(Tree::new());
//! assert!(matches!(history.undo(), HistoryStep::Moved(_)));
//! assert!(history.can_redo());
//! ```

use chrono::{DateTime, Utc};
use pagesmith_model::Tree;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Snapshots kept before the oldest is evicted
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Immutable copy of the page at one point in the session
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tree: Tree,
    pub timestamp: DateTime<Utc>,

    /// Description of the mutation that produced this state
    pub label: Option<String>,
}

/// Result of an undo or redo request
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryStep {
    /// The cursor moved; this is the tree at the new cursor
    Moved(Tree),

    /// Nothing to undo/redo; the cursor did not move
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// History seeded with `initial`, keeping [`DEFAULT_HISTORY_LIMIT`] snapshots
    pub fn new(initial: Tree) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    /// `limit` is clamped to at least one snapshot
    pub fn with_limit(initial: Tree, limit: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(Snapshot {
            tree: initial,
            timestamp: Utc::now(),
            label: None,
        });
        Self {
            snapshots,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record `tree` as the new current state
    pub fn push(&mut self, tree: Tree) {
        self.push_labeled(tree, None);
    }

    pub fn push_labeled(&mut self, tree: Tree, label: Option<String>) {
        let discarded = self.snapshots.len() - (self.cursor + 1);
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(Snapshot {
            tree,
            timestamp: Utc::now(),
            label,
        });

        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
            info!(limit = self.limit, "History full, evicted oldest snapshot");
        }
        self.cursor = self.snapshots.len() - 1;

        debug!(
            cursor = self.cursor,
            len = self.snapshots.len(),
            discarded_redo = discarded,
            "Pushed history snapshot"
        );
    }

    pub fn undo(&mut self) -> HistoryStep {
        if self.cursor == 0 {
            return HistoryStep::Exhausted;
        }
        self.cursor -= 1;
        HistoryStep::Moved(self.current().tree.clone())
    }

    pub fn redo(&mut self) -> HistoryStep {
        if self.cursor + 1 >= self.snapshots.len() {
            return HistoryStep::Exhausted;
        }
        self.cursor += 1;
        HistoryStep::Moved(self.current().tree.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: the initial snapshot is never evicted without a replacement
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Label of the change an undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.current().label.as_deref()
    }

    /// Label of the change a redo would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.snapshots
            .get(self.cursor + 1)
            .and_then(|snapshot| snapshot.label.as_deref())
    }

    /// Oldest first
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{Attributes, Node, NodeId};

    fn tree_of(n: usize) -> Tree {
        Tree::from_nodes(
            (0..n)
                .map(|i| Node {
                    id: NodeId::new(format!("n{}", i)),
                    kind: "text".to_string(),
                    content: None,
                    attributes: Attributes::new(),
                    children: vec![],
                })
                .collect(),
        )
    }

    #[test]
    fn test_history_creation() {
        let history = History::new(Tree::new());
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_move_cursor() {
        let mut history = History::new(tree_of(0));
        history.push(tree_of(1));
        history.push(tree_of(2));

        assert_eq!(history.undo(), HistoryStep::Moved(tree_of(1)));
        assert_eq!(history.undo(), HistoryStep::Moved(tree_of(0)));
        assert_eq!(history.undo(), HistoryStep::Exhausted);
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.redo(), HistoryStep::Moved(tree_of(1)));
        assert_eq!(history.redo(), HistoryStep::Moved(tree_of(2)));
        assert_eq!(history.redo(), HistoryStep::Exhausted);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn test_push_after_undo_truncates_future() {
        let mut history = History::new(tree_of(0));
        history.push(tree_of(1));
        history.push(tree_of(2));
        history.undo();
        history.undo();

        history.push(tree_of(5));

        assert_eq!(history.len(), 2);
        assert_eq!(history.redo(), HistoryStep::Exhausted);
        assert_eq!(history.undo(), HistoryStep::Moved(tree_of(0)));
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(tree_of(0), 3);
        for n in 1..=5 {
            history.push(tree_of(n));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current().tree, tree_of(5));
        assert_eq!(history.undo(), HistoryStep::Moved(tree_of(4)));
        assert_eq!(history.undo(), HistoryStep::Moved(tree_of(3)));
        assert_eq!(history.undo(), HistoryStep::Exhausted);
    }

    #[test]
    fn test_limit_is_at_least_one() {
        let mut history = History::with_limit(tree_of(0), 0);
        history.push(tree_of(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.undo(), HistoryStep::Exhausted);
    }

    #[test]
    fn test_descriptions() {
        let mut history = History::new(tree_of(0));
        assert_eq!(history.undo_description(), None);

        history.push_labeled(tree_of(1), Some("insert text".to_string()));
        assert_eq!(history.undo_description(), Some("insert text"));
        assert_eq!(history.redo_description(), None);

        history.undo();
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), Some("insert text"));
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 1);
    }
}
