//! Markdown output tests
//!
//! Rendered output is checked both as text and by parsing it again with comrak.

mod export;
mod math;
mod table;
