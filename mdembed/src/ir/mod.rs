//! Intermediate Representation (IR) of a parsed Markdown document.
//!
//! The parser produces a [`nodes::Document`] that owns every node exclusively.
//! Renderers only borrow it, so the same document can be rendered any number of
//! times with different renderers.

pub mod nodes;
