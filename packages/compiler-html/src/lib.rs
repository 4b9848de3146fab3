//! # Pagesmith HTML Compiler
//!
//! Turns a page tree into a standalone HTML document. Compilation is a
//! pure function of the tree and is total: unknown block kinds and
//! unexpected attribute values degrade to a generic `div`, never an error.
//! Recognized attributes a node lacks are read as their registry default.

mod compiler;
mod styles;

#[cfg(test)]
mod tests;

pub use compiler::{compile_node_to_string, compile_to_html, escape_html, serialize, CompileOptions};
pub use styles::{font_size_px, inline_styles};
