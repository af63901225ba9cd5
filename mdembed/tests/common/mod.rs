//! Shared helpers: comrak parsing of rendered output and image fixtures.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use std::fs;
use std::path::Path;

/// PNG signature plus filler; only ever read and base64-encoded.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

/// A 100x50 SVG.
pub const RECT_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50" viewBox="0 0 100 50">
  <rect x="0" y="0" width="100" height="50" fill="steelblue"/>
</svg>
"#;

/// A temporary notebook directory holding `img.png`, `plot.svg` and `img.xyz`.
pub fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "img.png", PNG_BYTES);
    write(dir.path(), "plot.svg", RECT_SVG.as_bytes());
    write(dir.path(), "img.xyz", b"unknown");
    dir
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// Parse rendered Markdown with comrak and call `f` on the root node.
pub fn with_comrak<T>(markdown: &str, f: impl for<'a> FnOnce(&'a AstNode<'a>) -> T) -> T {
    let arena = Arena::new();
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    let root = parse_document(&arena, markdown, &options);
    f(root)
}

/// Names of the top level comrak blocks, in order.
pub fn block_kinds(markdown: &str) -> Vec<&'static str> {
    with_comrak(markdown, |root| {
        root.children()
            .map(|node| kind(&node.data.borrow().value))
            .collect()
    })
}

pub fn kind(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::Paragraph => "paragraph",
        NodeValue::Heading(_) => "heading",
        NodeValue::List(_) => "list",
        NodeValue::Item(_) => "item",
        NodeValue::CodeBlock(_) => "code_block",
        NodeValue::BlockQuote => "block_quote",
        NodeValue::HtmlBlock(_) => "html_block",
        NodeValue::ThematicBreak => "thematic_break",
        NodeValue::Table(_) => "table",
        _ => "other",
    }
}
