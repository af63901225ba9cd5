//! Markdown parsing
//!
//!     source --preprocess--> block lexer --> RawBlock tree + Definitions
//!                                               |
//!                                  inline lexer (lowering)
//!                                               v
//!                                          ir::Document
//!
//! Parsing runs in two passes because links and footnotes may be used before
//! they are defined. The block pass collects every definition, the lowering
//! pass runs the inline lexer over the text of each block.
//!
//! Both grammars are plain rule lists, see [`BlockGrammar`] and
//! [`InlineGrammar`]. [`Parser::default`] enables the math rules.

pub mod block;
pub mod inline;
pub mod math;
mod tags;

pub use block::{BlockContext, BlockGrammar, BlockLexer, BlockMatch, BlockRule, RawBlock};
pub use inline::{FootnoteRefs, InlineGrammar, InlineLexer, InlineRule};

use crate::ir::nodes::{
    Block, CodeBlock, Document, Footnote, Heading, List, ListItem, Table, TableCell,
};
use block::{Definitions, RawItem, RawTable};
use std::collections::HashMap;

const TAB_WIDTH: usize = 4;

/// A Markdown parser built from a block and an inline grammar.
#[derive(Debug)]
pub struct Parser {
    block: BlockGrammar,
    inline: InlineGrammar,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(
            BlockGrammar::default().with_math(),
            InlineGrammar::default().with_math(),
        )
    }
}

impl Parser {
    pub fn new(block: BlockGrammar, inline: InlineGrammar) -> Self {
        Self { block, inline }
    }

    pub fn parse(&self, source: &str) -> Document {
        let source = preprocess(source);
        let mut definitions = Definitions::default();
        let raw = self.block.tokenize(&source, &mut definitions);
        log::trace!(
            "lexed {} blocks, {} link and {} footnote definitions",
            raw.len(),
            definitions.links.len(),
            definitions.footnotes.len()
        );

        let Definitions { links, footnotes } = definitions;
        let mut refs = FootnoteRefs::new(footnotes);
        let mut lowering = Lowering {
            lexer: InlineLexer::new(&self.inline, &links, &mut refs),
            footnotes: HashMap::new(),
        };
        let blocks = lowering.blocks(raw, false);
        let footnotes = lowering.referenced_footnotes();
        Document { blocks, footnotes }
    }
}

/// Parse `source` with the default grammars.
pub fn parse(source: &str) -> Document {
    Parser::default().parse(source)
}

/// Normalise line endings and whitespace before lexing.
///
/// `\r\n`, `\r` and U+2424 become `\n`, tabs expand to the next multiple of
/// four columns and lines holding only spaces become empty.
pub fn preprocess(source: &str) -> String {
    let source = source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{2424}', "\n");

    let mut out = String::with_capacity(source.len());
    for (idx, line) in source.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let expanded = expand_tabs(line);
        if !expanded.trim_start_matches(' ').is_empty() {
            out.push_str(&expanded);
        }
    }
    out
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let width = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(width));
            column += width;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Turns raw blocks into IR blocks, parsing their inline text.
struct Lowering<'a> {
    lexer: InlineLexer<'a>,
    /// Footnote bodies, lowered only once referenced
    footnotes: HashMap<String, Vec<RawBlock>>,
}

impl Lowering<'_> {
    fn blocks(&mut self, raw: Vec<RawBlock>, loose: bool) -> Vec<Block> {
        raw.into_iter()
            .filter_map(|block| self.block(block, loose))
            .collect()
    }

    fn block(&mut self, raw: RawBlock, loose: bool) -> Option<Block> {
        let block = match raw {
            RawBlock::Heading { level, text } => Block::Heading(Heading {
                level,
                content: self.lexer.tokenize(&text),
            }),
            RawBlock::Paragraph(text) => Block::Paragraph {
                content: self.lexer.tokenize(&text),
            },
            RawBlock::Text(text) if loose => Block::Paragraph {
                content: self.lexer.tokenize(&text),
            },
            RawBlock::Text(text) => Block::Text {
                content: self.lexer.tokenize(&text),
            },
            RawBlock::List { ordered, items } => Block::List(List {
                ordered,
                items: items.into_iter().map(|item| self.item(item)).collect(),
            }),
            RawBlock::Table(table) => Block::Table(self.table(table)),
            RawBlock::BlockQuote(children) => Block::BlockQuote {
                children: self.blocks(children, false),
            },
            RawBlock::Code { language, code } => Block::Code(CodeBlock { language, code }),
            RawBlock::Math(math) => Block::Math(math),
            RawBlock::Html(html) => Block::Html { html },
            RawBlock::Rule => Block::Rule,
            RawBlock::Footnote { key, children } => {
                self.footnotes.insert(key, children);
                return None;
            }
        };
        Some(block)
    }

    fn item(&mut self, item: RawItem) -> ListItem {
        ListItem {
            loose: item.loose,
            children: self.blocks(item.children, item.loose),
        }
    }

    fn table(&mut self, table: RawTable) -> Table {
        let RawTable { header, align, rows } = table;
        let mut row = |cells: Vec<String>, header: bool| -> Vec<TableCell> {
            cells
                .iter()
                .enumerate()
                .map(|(idx, cell)| TableCell {
                    content: self.lexer.tokenize(cell),
                    header,
                    align: align.get(idx).copied().unwrap_or_default(),
                })
                .collect()
        };
        let header = row(header, true);
        let rows = rows.into_iter().map(|cells| row(cells, false)).collect();
        Table { header, rows }
    }

    /// Lower the bodies of referenced footnotes in reference order.
    ///
    /// A footnote body may reference further footnotes, which are then
    /// numbered after every reference made from the document body.
    fn referenced_footnotes(&mut self) -> Vec<Footnote> {
        let mut footnotes = Vec::new();
        loop {
            let next = self
                .footnotes
                .keys()
                .filter_map(|key| {
                    let index = self.lexer.footnote_index(key)?;
                    Some((index, key.clone()))
                })
                .min();
            let Some((_, key)) = next else {
                break;
            };
            let Some(children) = self.footnotes.remove(&key) else {
                break;
            };
            let children = self.blocks(children, false);
            footnotes.push(Footnote { key, children });
        }
        footnotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::{Alignment, Inline, Math};

    #[test]
    fn test_preprocess() {
        assert_eq!(preprocess("a\r\nb\rc\u{2424}d"), "a\nb\nc\nd");
        assert_eq!(preprocess("ab\tc\n\td"), "ab  c\n    d");
        assert_eq!(preprocess("a\n   \nb"), "a\n\nb");
    }

    #[test]
    fn test_parse_paragraph_with_math() {
        let doc = parse("Energy is $E=mc^2$.");
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph {
                content: vec![
                    Inline::text("Energy is "),
                    Inline::Math(Math::Inline {
                        text: "E=mc^2".to_string()
                    }),
                    Inline::text("."),
                ]
            }]
        );
    }

    #[test]
    fn test_link_defined_after_use() {
        let doc = parse("See [docs][d].\n\n[d]: http://example.com \"Docs\"");
        let Block::Paragraph { content } = &doc.blocks[0] else {
            panic!("expected a paragraph");
        };
        assert!(matches!(
            &content[1],
            Inline::Link(link) if link.url == "http://example.com"
                && link.title.as_deref() == Some("Docs")
        ));
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_loose_list_items_hold_paragraphs() {
        let doc = parse("- a\n\n- b\n");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected a list");
        };
        assert!(list.items.iter().all(|item| item.loose));
        assert!(matches!(list.items[0].children[0], Block::Paragraph { .. }));

        let doc = parse("- a\n- b\n");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected a list");
        };
        assert!(matches!(list.items[0].children[0], Block::Text { .. }));
    }

    #[test]
    fn test_table_cells_carry_alignment() {
        let doc = parse("| a | b |\n|:-:|--:|\n| 1 | 2 |\n");
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected a table");
        };
        assert_eq!(table.header[0].align, Alignment::Center);
        assert!(table.header.iter().all(|cell| cell.header));
        assert_eq!(table.rows[0][1].align, Alignment::Right);
        assert_eq!(table.rows[0][1].content, vec![Inline::text("2")]);
    }

    #[test]
    fn test_footnotes_in_reference_order() {
        let doc = parse("B[^b] then A[^a].\n\n[^a]: Alpha.\n[^b]: Beta.\n[^c]: Unused.\n");
        let keys: Vec<_> = doc.footnotes.iter().map(|note| note.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(doc.blocks.len(), 1);
    }
}
