//! Table layout tests

use crate::common::with_comrak;
use comrak::nodes::{NodeValue, TableAlignment};
use insta::assert_snapshot;
use mdembed::to_markdown;

fn render(source: &str) -> String {
    to_markdown(source).unwrap()
}

fn comrak_alignments(md: &str) -> Vec<TableAlignment> {
    with_comrak(md, |root| {
        root.children()
            .find_map(|node| match &node.data.borrow().value {
                NodeValue::Table(table) => Some(table.alignments.clone()),
                _ => None,
            })
            .unwrap_or_default()
    })
}

#[test]
fn test_left_aligned_second_column() {
    let md = render("| A | Long |\n|---|:---|\n| 1 | 2 |\n");
    assert_eq!(md.lines().nth(1), Some("- | :---"));
    assert_snapshot!(md, @r"
    A | Long
    - | :---
    1 | 2
    ");
}

#[test]
fn test_alignments_survive_comrak() {
    let md = render("| l | c | r | n |\n|:--|:-:|--:|---|\n| 1 | 2 | 3 | 4 |\n");
    assert_eq!(
        comrak_alignments(&md),
        vec![
            TableAlignment::Left,
            TableAlignment::Center,
            TableAlignment::Right,
            TableAlignment::None,
        ]
    );
}

#[test]
fn test_columns_are_padded_to_the_widest_cell() {
    assert_snapshot!(render("Name | Qty\n--- | ---\nApple | 100\nFig | 120\n"), @r"
    Name  | Qty
    ----- | ---
    Apple | 100
    Fig   | 120
    ");
}

#[test]
fn test_inline_content_in_cells() {
    let md = render("| a | b |\n|---|---|\n| **x** | $y$ |\n");
    assert_eq!(md.lines().nth(2), Some("**x**  | $y$"));
}

#[test]
fn test_escaped_pipe_in_cell() {
    let md = render("| a | b |\n|---|---|\n| x \\| y | z |\n");
    assert_eq!(md.lines().nth(2), Some("x \\| y | z"));
}

#[test]
fn test_ragged_rows() {
    let md = render("| a | b | c |\n|---|---|---|\n| 1 |\n");
    assert_eq!(md, "a | b | c\n- | - | -\n1\n\n");
}
