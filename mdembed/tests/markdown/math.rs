//! LaTeX math is reproduced verbatim

use insta::assert_snapshot;
use mdembed::ir::nodes::{Block, Inline, Math};
use mdembed::{parse, to_markdown};

fn render(source: &str) -> String {
    to_markdown(source).unwrap()
}

#[test]
fn test_display_inline_and_environment() {
    assert_eq!(render("$$x^2$$"), "$$x^2$$\n\n");
    assert_eq!(render("Let $y$ be"), "Let $y$ be\n\n");
    assert_eq!(
        render("\\begin{align}z\\end{align}"),
        "\\begin{align}z\\end{align}\n\n"
    );
}

#[test]
fn test_markdown_inside_math_is_literal() {
    assert_eq!(
        render("$$\n\\sum_{i=1}^n *a_i* \\\\ b_i\n$$"),
        "$$\n\\sum_{i=1}^n *a_i* \\\\ b_i\n$$\n\n"
    );
    assert_eq!(
        render("where $a_1 * b_2 = [c](d)$ holds"),
        "where $a_1 * b_2 = [c](d)$ holds\n\n"
    );
}

#[test]
fn test_starred_environment() {
    let doc = parse("\\begin{equation*}\ne = mc^2\n\\end{equation*}\n");
    assert_eq!(
        doc.blocks,
        vec![Block::Math(Math::Environment {
            name: "equation*".to_string(),
            body: "\ne = mc^2\n".to_string(),
        })]
    );
}

#[test]
fn test_unterminated_math_falls_through() {
    assert_eq!(render("costs $5 or more"), "costs $5 or more\n\n");
    assert_eq!(render("$$ open"), "$$ open\n\n");
}

#[test]
fn test_math_in_list_items() {
    assert_snapshot!(render("- $a$ first\n- $b$ second\n"), @r"
    * $a$ first
    * $b$ second
    ");
}

#[test]
fn test_inline_math_node() {
    let doc = parse("$E=mc^2$");
    assert_eq!(
        doc.blocks,
        vec![Block::Paragraph {
            content: vec![Inline::Math(Math::Inline {
                text: "E=mc^2".to_string()
            })]
        }]
    );
}

#[test]
fn test_math_between_paragraphs() {
    assert_snapshot!(render("Before.\n\n$$\na + b\n$$\n\nAfter."), @r"
    Before.

    $$
    a + b
    $$

    After.
    ");
}

#[test]
fn test_inline_math_does_not_span_lines() {
    assert_eq!(
        parse("$a\nb$").blocks,
        vec![Block::Paragraph {
            content: vec![Inline::text("$a\nb$")]
        }]
    );
    assert_eq!(render("$a\nb$"), "$a\nb$\n\n");
}

#[test]
fn test_display_math_inside_block_quote() {
    assert_eq!(
        parse("> $$x$$").blocks,
        vec![Block::BlockQuote {
            children: vec![Block::Math(Math::Display {
                text: "x".to_string()
            })]
        }]
    );
    assert!(render("> $$x$$").starts_with("> $$x$$\n"));
}

#[test]
fn test_inline_math_inside_footnote() {
    let doc = parse("See[^n].\n\n[^n]: $y$\n");
    let content = match &doc.footnotes[0].children[..] {
        [Block::Paragraph { content }] | [Block::Text { content }] => content,
        other => panic!("unexpected footnote body {other:?}"),
    };
    assert_eq!(
        content,
        &vec![Inline::Math(Math::Inline {
            text: "y".to_string()
        })]
    );
    assert!(render("See[^n].\n\n[^n]: $y$\n").contains("[^n]:\n  $y$\n"));
}

#[test]
fn test_display_math_does_not_interrupt_a_paragraph() {
    let source = "text\n$$x$$\nmore";
    let doc = parse(source);
    assert_eq!(doc.blocks.len(), 1);
    assert!(matches!(doc.blocks[0], Block::Paragraph { .. }));
    assert_eq!(render(source), "text\n$$x$$\nmore\n\n");
}
