//! Math-aware Markdown re-rendering with self-contained images
//!
//!     This crate takes the Markdown source of a notebook cell and writes it back out as
//!     canonical Markdown. LaTeX math survives untouched, and local images can be inlined as
//!     `data:` URIs so the result no longer depends on the files next to it.
//!
//!     This is a pure lib: it powers the mdembed CLI but makes no assumption about a shell
//!     environment. Nothing here prints, reads env vars or exits.
//!
//! Architecture
//!
//!     .
//!     ├── codec.rs        # Length-prefixed chunks carrying list items and table rows
//!     ├── error.rs        # RenderError
//!     ├── ir              # The parsed document tree
//!     ├── parser          # Block and inline grammars, math rules, lowering to the IR
//!     ├── render          # Renderer trait, the render walk, canonical Markdown output
//!     └── embed           # Renderer that inlines images, asset resolution, SVG rasterizing
//!
//!     Parsing and rendering are separate steps: [`parser::Parser`] produces an
//!     [`ir::nodes::Document`] and [`render::render_document`] walks it with any
//!     [`render::Renderer`]. [`render::Markdown`] pairs the two.
//!
//! Grammars
//!
//!     Both grammars are ordered lists of rules tried first to last. Math support is three
//!     extra rules put in front of the defaults by `with_math()`, which is how
//!     [`parser::Parser::default`] is built. Custom rules are added the same way with
//!     `insert`.
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs          # Single integration test binary
//!     ├── common          # comrak helpers and image fixtures
//!     ├── markdown        # Rendered output, checked against comrak as an independent parser
//!     └── embed           # Image embedding with on-disk fixtures
//!
//!     Unit tests live next to the code. Renderer output uses insta inline snapshots and the
//!     codec has proptest round trips.
//!
//! Usage
//!
//! ```ignore
//! use mdembed::{embed_images, EmbedOptions};
//!
//! let options = EmbedOptions { root_path: "notebooks/L1".into(), convert_svgs: true };
//! let markdown = embed_images("![plot](plot.svg)\n\n$$x^2$$", &options)?;
//! ```

pub mod codec;
pub mod embed;
pub mod error;
pub mod ir;
pub mod parser;
pub mod render;

pub use embed::{EmbedImagesRenderer, EmbedOptions};
pub use error::{RenderError, RenderResult};
pub use ir::nodes::Document;
pub use parser::{parse, Parser};
pub use render::{render_document, Markdown, MarkdownRenderer, Renderer};

/// Re-render `source` with every local image embedded.
pub fn embed_images(source: &str, options: &EmbedOptions) -> RenderResult<String> {
    Markdown::new(EmbedImagesRenderer::new(options.clone())).render(source)
}

/// Re-render `source` as canonical Markdown, images left as references.
pub fn to_markdown(source: &str) -> RenderResult<String> {
    Markdown::new(MarkdownRenderer).render(source)
}
