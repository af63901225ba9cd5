//! Canonical Markdown output for the non-math constructs

use crate::common::{block_kinds, kind, with_comrak};
use comrak::nodes::NodeValue;
use insta::assert_snapshot;
use mdembed::to_markdown;

fn render(source: &str) -> String {
    to_markdown(source).unwrap()
}

#[test]
fn test_heading_levels_shift_down() {
    let md = render("# Title\n\nBody text.");
    assert_eq!(md, "## Title\n\nBody text.\n\n");

    let levels = with_comrak(&md, |root| {
        root.children()
            .filter_map(|node| match &node.data.borrow().value {
                NodeValue::Heading(heading) => Some(heading.level),
                _ => None,
            })
            .collect::<Vec<_>>()
    });
    assert_eq!(levels, vec![2]);
}

#[test]
fn test_setext_heading() {
    assert_eq!(render("Title\n=====\n"), "## Title\n\n");
}

#[test]
fn test_document_structure_survives() {
    let md = render(
        "# Notes\n\nSome **bold** text.\n\n* one\n* two\n\n```python\nprint(1)\n```\n\n> quote\n\n---\n",
    );
    assert_eq!(
        block_kinds(&md),
        vec![
            "heading",
            "paragraph",
            "list",
            "code_block",
            "block_quote",
            "thematic_break"
        ]
    );
}

#[test]
fn test_code_block_language_is_kept() {
    let md = render("```python\nx = 1\n```");
    let info = with_comrak(&md, |root| {
        root.children()
            .find_map(|node| match &node.data.borrow().value {
                NodeValue::CodeBlock(code) => Some((code.info.clone(), code.literal.clone())),
                _ => None,
            })
    });
    assert_eq!(info, Some(("python".to_string(), "x = 1\n".to_string())));
}

#[test]
fn test_inline_spans_get_a_trailing_space() {
    assert_eq!(
        render("*it* **bold** ~~gone~~ `code`"),
        "*it*  **bold**  ~~gone~~  `code`\n\n"
    );
}

#[test]
fn test_unordered_list_items() {
    let md = render("- one\n- two\n- three\n");
    let items = with_comrak(&md, |root| {
        root.children()
            .flat_map(|list| list.children())
            .filter(|node| kind(&node.data.borrow().value) == "item")
            .count()
    });
    assert_eq!(items, 3);
}

#[test]
fn test_loose_list() {
    assert_snapshot!(render("- first\n\n- second\n  continued\n"), @r"
    * first
    * second
      continued
    ");
}

#[test]
fn test_ordered_list_uses_hash_marker() {
    assert_eq!(render("1. first\n2. second\n"), "# first\n# second\n\n");
}

#[test]
fn test_links() {
    assert_eq!(
        render("[site](http://example.com \"Home\") and <me@example.com>"),
        "[site](http://example.com)\"Home\" and <me@example.com>\n\n"
    );
}

#[test]
fn test_reference_link_is_inlined() {
    assert_eq!(
        render("Read [the docs][docs].\n\n[docs]: http://example.com/docs\n"),
        "Read [the docs](http://example.com/docs).\n\n"
    );
}

#[test]
fn test_deeply_nested_links_render_back() {
    let source = format!("{}x{}", "[".repeat(10_000), "](u)".repeat(10_000));
    assert_eq!(render(&source), format!("{source}\n\n"));
}

#[test]
fn test_escapes_round_trip() {
    assert_eq!(render(r"1\. not a list \*x\*"), "1\\. not a list \\*x\\*\n\n");
}

#[test]
fn test_remote_image_is_untouched() {
    assert_eq!(
        render("![alt](http://example.com/x.png)"),
        "![alt](http://example.com/x.png)\n\n"
    );
}

#[test]
fn test_footnotes_render_after_the_body() {
    assert_snapshot!(
        render("First[^1], second[^2].\n\n[^2]: Two.\n[^1]: One.\n"),
        @r"
    First[^1], second[^2].

    [^1]:
      One.
    [^2]:
      Two.
    "
    );
}

#[test]
fn test_unreferenced_footnote_is_dropped() {
    assert_eq!(render("Text.\n\n[^x]: Never used.\n"), "Text.\n\n");
}

#[test]
fn test_html_block_passes_through() {
    assert_eq!(
        render("<div class=\"note\">\n*raw*\n</div>\n\nafter"),
        "<div class=\"note\">\n*raw*\n</div>\n\nafter\n\n"
    );
}

#[test]
fn test_crlf_input() {
    assert_eq!(render("# T\r\n\r\ntext\r\n"), "## T\n\ntext\n\n");
}
