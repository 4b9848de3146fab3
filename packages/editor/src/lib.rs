//! # Pagesmith Editor
//!
//! Document editing engine for Pagesmith pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: node registry, node tree, templates  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + mutations + history       │
//! │  - Pure tree store (insert/update/delete/   │
//! │    move), structurally shared snapshots     │
//! │  - One history entry per applied mutation   │
//! │  - Selection kept consistent with the tree  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: tree → standalone HTML       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: panels read it, only the session writes it
//! 2. **Values, not edits in place**: every operation returns a new tree
//! 3. **Failures are observable**: a mutation that cannot apply is a `Noop`, never a silent success
//!
//! ## Usage
//!
//! ```rust
//! use pagesmith_editor::{EditSession, HistoryOutcome, NodePatch};
//!
//! let mut session = EditSession::new();
//! let heading = session.insert("heading", Some("Welcome"), None, Some(0));
//! let heading = heading.applied().unwrap();
//!
//! session.update(&heading.id, NodePatch::new().attribute("color", "#1f2937"));
//! assert_eq!(session.undo(), HistoryOutcome::Applied);
//! ```

mod errors;
mod history;
mod mutations;
mod session;
pub mod store;

pub use errors::{EditorError, MutationError};
pub use history::{History, HistoryStep, Snapshot, DEFAULT_HISTORY_LIMIT};
pub use mutations::{InsertNode, Mutation, MutationResult};
pub use session::{parse_drop_payload, EditSession, HistoryOutcome, MutationOutcome};
pub use store::NodePatch;

pub use pagesmith_model::{Attributes, AttrValue, Node, NodeId, Tree};
