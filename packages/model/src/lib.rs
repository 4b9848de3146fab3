//! # Pagesmith Model
//!
//! Data model shared by the editor, the HTML compiler and the CLI.
//!
//! ## Contents
//!
//! - [`Node`] / [`Tree`]: the document tree. Children are held behind
//!   [`std::sync::Arc`] so that history snapshots share every subtree a
//!   mutation did not touch.
//! - [`registry`]: the static table of content-block kinds, their default
//!   payloads, default attributes and labels.
//! - [`IdGenerator`]: node id generation (`<type>-<millis>-<suffix>`).
//! - [`templates`]: pre-built trees that can be installed wholesale.

pub mod id_generator;
pub mod node;
pub mod registry;
pub mod templates;

pub use id_generator::IdGenerator;
pub use node::{AttrValue, Attributes, DepthFirst, Location, Node, NodeId, Tree};
pub use registry::{
    backfill_defaults, default_attributes, default_content, display_name, effective_attributes,
    is_container, BlockKind,
};
pub use templates::Template;
