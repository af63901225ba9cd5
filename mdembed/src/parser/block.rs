//! Block-level lexing
//!
//! The block lexer walks the source top to bottom. At each position it tries
//! the rules of a [`BlockGrammar`] in order; the first rule that matches
//! consumes its text and may emit a [`RawBlock`]. Inline text is kept as
//! source here and only parsed once every link and footnote definition of the
//! document is known.
//!
//! Default rule order:
//!
//! 1. newline - blank lines, emit nothing
//! 2. hrule
//! 3. block_code - four-space indented code
//! 4. fences - backtick or tilde fences
//! 5. heading - ATX `#` headings
//! 6. nptable - tables without leading pipes
//! 7. lheading - setext headings
//! 8. block_quote
//! 9. list
//! 10. block_html
//! 11. def_links - `[key]: url "title"`
//! 12. def_footnotes - `[^key]: text`
//! 13. table - pipe tables
//! 14. paragraph
//! 15. text - a single bare line, only inside list items
//!
//! Rules declare the contexts they apply in, so list items skip headings,
//! tables and paragraphs, and definitions are only recognised at the top
//! level.

use super::tags::{find_closing_tag, is_inline_tag, scan_open_tag, starts_block_tag};
use crate::ir::nodes::{Alignment, Math};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Nesting limit for block quotes and lists; deeper content is kept as text.
const MAX_DEPTH: usize = 6;

static NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\n+").unwrap());
static HRULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}[-*_](?: *[-*_]){2,} *(?:\n+|$)").unwrap());
static HRULE_AHEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*_] *){3,}(?:\n|$)").unwrap());
static BLOCK_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?: {4}[^\n]+\n*)+").unwrap());
static CODE_INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ {4}").unwrap());
static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *(`{3,}|~{3,}) *([^`\s]+)? *\n").unwrap());
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *(#{1,6}) *([^\n]+?) *#* *(?:\n+|$)").unwrap());
static LHEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\n]+)\n *(=|-)+ *(?:\n+|$)").unwrap());
static BLOCK_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?: *>[^\n]+(?:\n[^\n]+)*\n*)+").unwrap());
static QUOTE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ *> ?").unwrap());
static LIST_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^( *)([*+-]|\d+\.) ").unwrap());
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[*+-]|\d+\.) ").unwrap());
static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+-] ").unwrap());
static ORDERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. ").unwrap());
static LIST_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ *(?:[*+-]|\d+\.) +").unwrap());
static DEF_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^ *\[([^\^\]]+)\]: *<?([^\s>]+)>?(?: +["(]([^\n]+)[")])? *(?:\n+|$)"#).unwrap()
});
static DEF_FOOTNOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\^([^\]]+)\]: *([^\n]*(?:\n+|$)(?: +[^\n]*(?:\n+|$))*)").unwrap()
});
static TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *\|(.+)\n *\|( *[-:]+[-| :]*)\n((?: *\|.*(?:\n|$))*)\n*").unwrap()
});
static NPTABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *(\S.*\|.*)\n *([-:]+ *\|[-| :]*)\n((?:.*\|.*(?:\n|$))*)\n*").unwrap()
});
static TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\n]+").unwrap());

/// A block as produced by the lexer, before inline parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    Text(String),
    List { ordered: bool, items: Vec<RawItem> },
    Table(RawTable),
    BlockQuote(Vec<RawBlock>),
    Code {
        language: Option<String>,
        code: String,
    },
    Math(Math),
    Html(String),
    Rule,
    Footnote { key: String, children: Vec<RawBlock> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub loose: bool,
    pub children: Vec<RawBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub align: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

/// Where a run of blocks is being lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContext {
    Document,
    ListItem,
    Footnote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    pub url: String,
    pub title: Option<String>,
}

/// Link and footnote definitions collected while lexing.
#[derive(Debug, Default)]
pub struct Definitions {
    pub links: HashMap<String, LinkDefinition>,
    pub footnotes: HashSet<String>,
}

/// Normalise a link or footnote key: lower case, whitespace collapsed.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result of a successful rule match.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatch {
    /// Bytes of source consumed, always greater than zero
    pub consumed: usize,
    pub block: Option<RawBlock>,
}

impl BlockMatch {
    pub fn new(consumed: usize, block: RawBlock) -> Self {
        Self {
            consumed,
            block: Some(block),
        }
    }

    /// A match that consumes source without emitting a block.
    pub fn skip(consumed: usize) -> Self {
        Self {
            consumed,
            block: None,
        }
    }
}

/// A block-level grammar rule.
pub trait BlockRule {
    fn name(&self) -> &'static str;

    fn applies_in(&self, _context: BlockContext) -> bool {
        true
    }

    /// Try to match at the start of `src`.
    fn parse(&self, src: &str, lexer: &mut BlockLexer<'_>) -> Option<BlockMatch>;
}

/// Ordered list of block rules.
pub struct BlockGrammar {
    rules: Vec<Box<dyn BlockRule>>,
}

impl Default for BlockGrammar {
    fn default() -> Self {
        Self::new(vec![
            Box::new(Newline),
            Box::new(HorizontalRule),
            Box::new(IndentedCode),
            Box::new(FencedCode),
            Box::new(AtxHeading),
            Box::new(NoPipeTable),
            Box::new(SetextHeading),
            Box::new(BlockQuote),
            Box::new(ListBlock),
            Box::new(BlockHtml),
            Box::new(LinkDefinitions),
            Box::new(FootnoteDefinitions),
            Box::new(PipeTable),
            Box::new(Paragraph),
            Box::new(Text),
        ])
    }
}

impl BlockGrammar {
    pub fn new(rules: Vec<Box<dyn BlockRule>>) -> Self {
        Self { rules }
    }

    /// Insert a rule at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, rule: Box<dyn BlockRule>) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Lex a whole document, collecting definitions into `definitions`.
    pub fn tokenize(&self, source: &str, definitions: &mut Definitions) -> Vec<RawBlock> {
        BlockLexer::new(self, definitions).parse(source, BlockContext::Document)
    }
}

impl fmt::Debug for BlockGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}

/// Lexer state shared by the rules of one document.
pub struct BlockLexer<'a> {
    grammar: &'a BlockGrammar,
    definitions: &'a mut Definitions,
    depth: usize,
}

impl<'a> BlockLexer<'a> {
    pub fn new(grammar: &'a BlockGrammar, definitions: &'a mut Definitions) -> Self {
        Self {
            grammar,
            definitions,
            depth: 0,
        }
    }

    pub fn definitions(&mut self) -> &mut Definitions {
        &mut *self.definitions
    }

    /// Lex `text` with the rules that apply in `context`.
    pub fn parse(&mut self, text: &str, context: BlockContext) -> Vec<RawBlock> {
        let grammar = self.grammar;
        let mut rest = text.trim_end_matches('\n');
        let mut blocks: Vec<RawBlock> = Vec::new();
        let mut text_open = false;

        while !rest.is_empty() {
            let found = grammar
                .rules
                .iter()
                .filter(|rule| rule.applies_in(context))
                .find_map(|rule| rule.parse(rest, self).filter(|m| m.consumed > 0));

            let BlockMatch { consumed, block } = found.unwrap_or_else(|| fallback_line(rest));
            let consumed = consumed.min(rest.len());

            match block {
                Some(RawBlock::Text(line)) => {
                    let merged = match blocks.last_mut() {
                        Some(RawBlock::Text(previous)) if text_open => {
                            previous.push('\n');
                            previous.push_str(&line);
                            true
                        }
                        _ => false,
                    };
                    if !merged {
                        blocks.push(RawBlock::Text(line));
                    }
                    text_open = true;
                }
                Some(block) => {
                    blocks.push(block);
                    text_open = false;
                }
                // a blank line ends a run of text lines
                None if consumed > 1 => text_open = false,
                None => {}
            }
            rest = &rest[consumed..];
        }
        blocks
    }

    /// Lex the content of a container one nesting level deeper.
    pub fn parse_nested(&mut self, text: &str, context: BlockContext) -> Vec<RawBlock> {
        if self.depth >= MAX_DEPTH {
            return vec![RawBlock::Text(text.trim_end_matches('\n').to_string())];
        }
        self.depth += 1;
        let blocks = self.parse(text, context);
        self.depth -= 1;
        blocks
    }
}

/// Used when no rule matches: take one line as text.
fn fallback_line(rest: &str) -> BlockMatch {
    match rest.find('\n') {
        Some(0) => BlockMatch::skip(1),
        Some(end) => BlockMatch::new(end, RawBlock::Text(rest[..end].to_string())),
        None => BlockMatch::new(rest.len(), RawBlock::Text(rest.to_string())),
    }
}

struct Newline;

impl BlockRule for Newline {
    fn name(&self) -> &'static str {
        "newline"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        NEWLINE.find(src).map(|m| BlockMatch::skip(m.end()))
    }
}

struct HorizontalRule;

impl BlockRule for HorizontalRule {
    fn name(&self) -> &'static str {
        "hrule"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        HRULE
            .find(src)
            .map(|m| BlockMatch::new(m.end(), RawBlock::Rule))
    }
}

struct IndentedCode;

impl BlockRule for IndentedCode {
    fn name(&self) -> &'static str {
        "block_code"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let m = BLOCK_CODE.find(src)?;
        let code = CODE_INDENT.replace_all(m.as_str(), "");
        Some(BlockMatch::new(
            m.end(),
            RawBlock::Code {
                language: None,
                code: code.trim_end_matches('\n').to_string(),
            },
        ))
    }
}

/// A fenced code block: `(consumed, language, code)`.
fn scan_fence(src: &str) -> Option<(usize, Option<String>, String)> {
    let caps = FENCE_OPEN.captures(src)?;
    let fence = caps.get(1)?.as_str();
    let language = caps.get(2).map(|m| m.as_str().to_string());
    let body_start = caps.get(0)?.end();
    let body = &src[body_start..];

    for (idx, _) in body.match_indices(fence) {
        if idx == 0 {
            continue;
        }
        let after = &body[idx + fence.len()..];
        let tail = after.trim_start_matches(' ');
        if tail.is_empty() || tail.starts_with('\n') {
            let newlines = tail.len() - tail.trim_start_matches('\n').len();
            let consumed = body_start + idx + fence.len() + (after.len() - tail.len()) + newlines;
            let code = body[..idx].trim_end().to_string();
            return Some((consumed, language, code));
        }
    }
    None
}

struct FencedCode;

impl BlockRule for FencedCode {
    fn name(&self) -> &'static str {
        "fences"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let (consumed, language, code) = scan_fence(src)?;
        Some(BlockMatch::new(consumed, RawBlock::Code { language, code }))
    }
}

struct AtxHeading;

impl BlockRule for AtxHeading {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn applies_in(&self, context: BlockContext) -> bool {
        context != BlockContext::ListItem
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let caps = HEADING.captures(src)?;
        let level = caps.get(1)?.as_str().len() as u8;
        Some(BlockMatch::new(
            caps.get(0)?.end(),
            RawBlock::Heading {
                level,
                text: caps.get(2)?.as_str().to_string(),
            },
        ))
    }
}

struct SetextHeading;

impl BlockRule for SetextHeading {
    fn name(&self) -> &'static str {
        "lheading"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let caps = LHEADING.captures(src)?;
        let level = if caps.get(2)?.as_str() == "=" { 1 } else { 2 };
        Some(BlockMatch::new(
            caps.get(0)?.end(),
            RawBlock::Heading {
                level,
                text: caps.get(1)?.as_str().to_string(),
            },
        ))
    }
}

struct BlockQuote;

impl BlockRule for BlockQuote {
    fn name(&self) -> &'static str {
        "block_quote"
    }

    fn parse(&self, src: &str, lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let m = BLOCK_QUOTE.find(src)?;
        let inner = QUOTE_MARKER.replace_all(m.as_str(), "");
        let children = lexer.parse_nested(&inner, BlockContext::Document);
        Some(BlockMatch::new(m.end(), RawBlock::BlockQuote(children)))
    }
}

/// Whether `src` opens a list: a marker, one space and at least one more character.
fn starts_list(src: &str) -> bool {
    LIST_START
        .find(src)
        .is_some_and(|m| m.end() < src.len())
}

/// End offset of the list that starts at the beginning of `src`.
///
/// The list runs until a blank-line break that is not followed by more
/// indented content or another item, or until a line that starts a rule, a
/// definition, or an item with the other kind of marker.
fn list_end(src: &str, body_start: usize, indent: &str, ordered: bool) -> usize {
    for (p, _) in src.match_indices('\n') {
        if p <= body_start {
            continue;
        }
        let run = src[p..].len() - src[p..].trim_start_matches('\n').len();
        let after = &src[p + run..];
        if after.is_empty() {
            return src.len();
        }

        let dedented = after.strip_prefix(indent);
        let other_marker = if ordered {
            &*BULLET_MARKER
        } else {
            &*ORDERED_MARKER
        };
        let ends = HRULE_AHEAD.is_match(after)
            || dedented.is_some_and(|line| HRULE_AHEAD.is_match(line))
            || DEF_LINK.is_match(after)
            || DEF_FOOTNOTE.is_match(after)
            || dedented.is_some_and(|line| other_marker.is_match(line))
            || run >= 3
            || (run == 2
                && !after.starts_with(' ')
                && !dedented.is_some_and(|line| LIST_MARKER.is_match(line)));
        if ends {
            return p + run;
        }
    }
    src.len()
}

/// Split a list into its items; every item starts at a marker with the list's indent.
fn split_items<'s>(list: &'s str, indent: &str) -> Vec<&'s str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in list.split_inclusive('\n') {
        if offset > start
            && line
                .strip_prefix(indent)
                .is_some_and(|rest| LIST_MARKER.is_match(rest))
        {
            items.push(&list[start..offset - 1]);
            start = offset;
        }
        offset += line.len();
    }
    items.push(&list[start..]);
    items
}

/// Remove up to `width` leading spaces from every line.
fn outdent(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|line| {
            let spaces = line.bytes().take(width).take_while(|b| *b == b' ').count();
            &line[spaces..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// An item is loose when it holds a blank line followed by more content.
fn has_inner_break(item: &str) -> bool {
    item.match_indices("\n\n")
        .any(|(idx, _)| !item[idx + 2..].trim().is_empty())
}

struct ListBlock;

impl BlockRule for ListBlock {
    fn name(&self) -> &'static str {
        "list"
    }

    fn parse(&self, src: &str, lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        if !starts_list(src) {
            return None;
        }
        let caps = LIST_START.captures(src)?;
        let indent = caps.get(1)?.as_str();
        let ordered = caps.get(2)?.as_str().ends_with('.');
        let end = list_end(src, caps.get(0)?.end(), indent, ordered);

        let sources = split_items(&src[..end], indent);
        let count = sources.len();
        let mut items = Vec::with_capacity(count);
        let mut next_loose = false;

        for (i, item) in sources.into_iter().enumerate() {
            let stripped = LIST_BULLET.replace(item, "");
            let width = item.len() - stripped.len();
            let body = if stripped.contains("\n ") {
                outdent(&stripped, width)
            } else {
                stripped.into_owned()
            };

            let mut loose = next_loose || has_inner_break(&body);
            if i + 1 != count && !body.is_empty() {
                next_loose = body.ends_with('\n');
                loose = loose || next_loose;
            }

            let children = lexer.parse_nested(&body, BlockContext::ListItem);
            items.push(RawItem { loose, children });
        }

        Some(BlockMatch::new(end, RawBlock::List { ordered, items }))
    }
}

/// Whitespace allowed after an HTML block: a blank line or the end of input.
fn html_block_tail(rest: &str) -> Option<usize> {
    let after_spaces = rest.trim_start_matches(' ');
    let spaces = rest.len() - after_spaces.len();
    if after_spaces.starts_with("\n\n") {
        let newlines = after_spaces.len() - after_spaces.trim_start_matches('\n').len();
        return Some(spaces + newlines);
    }
    after_spaces.trim().is_empty().then_some(rest.len())
}

struct BlockHtml;

impl BlockHtml {
    /// End of the HTML construct at the start of `src`, with the trailing blank lines.
    fn scan(src: &str) -> Option<(usize, usize)> {
        if src.starts_with("<!--") {
            let mut from = 4;
            while let Some(idx) = src[from..].find("-->") {
                let end = from + idx + 3;
                if let Some(tail) = html_block_tail(&src[end..]) {
                    return Some((end, end + tail));
                }
                from = end;
            }
            return None;
        }

        let tag = scan_open_tag(src)?;
        if is_inline_tag(tag.name) {
            return None;
        }
        if !tag.self_closing {
            let mut from = tag.end;
            while let Some(end) = find_closing_tag(src, from, tag.name) {
                if let Some(tail) = html_block_tail(&src[end..]) {
                    return Some((end, end + tail));
                }
                from = end;
            }
        }
        html_block_tail(&src[tag.end..]).map(|tail| (tag.end, tag.end + tail))
    }
}

impl BlockRule for BlockHtml {
    fn name(&self) -> &'static str {
        "block_html"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let trimmed = src.trim_start_matches(' ');
        let lead = src.len() - trimmed.len();
        let (end, consumed) = Self::scan(trimmed)?;
        Some(BlockMatch::new(
            lead + consumed,
            RawBlock::Html(trimmed[..end].to_string()),
        ))
    }
}

struct LinkDefinitions;

impl BlockRule for LinkDefinitions {
    fn name(&self) -> &'static str {
        "def_links"
    }

    fn applies_in(&self, context: BlockContext) -> bool {
        context == BlockContext::Document
    }

    fn parse(&self, src: &str, lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let caps = DEF_LINK.captures(src)?;
        let key = normalize_key(caps.get(1)?.as_str());
        let definition = LinkDefinition {
            url: caps.get(2)?.as_str().to_string(),
            title: caps.get(3).map(|m| m.as_str().to_string()),
        };
        lexer.definitions().links.insert(key, definition);
        Some(BlockMatch::skip(caps.get(0)?.end()))
    }
}

/// Remove the common indentation of continuation lines.
fn dedent_footnote(text: &str) -> String {
    let Some((first, rest)) = text.split_once('\n') else {
        return text.to_string();
    };
    let indent_of = |line: &str| line.chars().take_while(|c| c.is_whitespace()).count();
    let indent = rest
        .split('\n')
        .map(indent_of)
        .filter(|n| *n > 0)
        .min()
        .unwrap_or(0);

    let mut out = first.to_string();
    for line in rest.split('\n') {
        out.push('\n');
        if let Some((idx, _)) = line.char_indices().nth(indent) {
            out.push_str(&line[idx..]);
        } else if indent == 0 {
            out.push_str(line);
        }
    }
    out
}

struct FootnoteDefinitions;

impl BlockRule for FootnoteDefinitions {
    fn name(&self) -> &'static str {
        "def_footnotes"
    }

    fn applies_in(&self, context: BlockContext) -> bool {
        context == BlockContext::Document
    }

    fn parse(&self, src: &str, lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let caps = DEF_FOOTNOTE.captures(src)?;
        let consumed = caps.get(0)?.end();
        let key = normalize_key(caps.get(1)?.as_str());
        if !lexer.definitions().footnotes.insert(key.clone()) {
            // first definition wins
            return Some(BlockMatch::skip(consumed));
        }
        let text = dedent_footnote(caps.get(2)?.as_str());
        let children = lexer.parse_nested(&text, BlockContext::Footnote);
        Some(BlockMatch::new(consumed, RawBlock::Footnote { key, children }))
    }
}

fn alignment(spec: &str) -> Alignment {
    let (left, rest) = match spec.strip_prefix(':') {
        Some(rest) => (true, rest),
        None => (false, spec),
    };
    let (right, dashes) = match rest.strip_suffix(':') {
        Some(dashes) => (true, dashes),
        None => (false, rest),
    };
    if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
        return Alignment::None;
    }
    match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

fn parse_alignments(row: &str) -> Vec<Alignment> {
    let cleaned: String = row.chars().filter(|c| *c != ' ').collect();
    let cleaned = cleaned.strip_suffix('|').unwrap_or(&cleaned);
    cleaned.split('|').map(alignment).collect()
}

/// Split a table row into cells on unescaped pipes.
///
/// `\|` stays escaped so it is written back as an escape.
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim_matches(' ');
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push_str("\\|");
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim_matches(' ').to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim_matches(' ').to_string());
    cells
}

fn table_from(caps: &regex::Captures<'_>) -> Option<BlockMatch> {
    let rows = caps
        .get(3)?
        .as_str()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_row)
        .collect();
    let table = RawTable {
        header: split_row(caps.get(1)?.as_str()),
        align: parse_alignments(caps.get(2)?.as_str()),
        rows,
    };
    Some(BlockMatch::new(caps.get(0)?.end(), RawBlock::Table(table)))
}

struct NoPipeTable;

impl BlockRule for NoPipeTable {
    fn name(&self) -> &'static str {
        "nptable"
    }

    fn applies_in(&self, context: BlockContext) -> bool {
        context != BlockContext::ListItem
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        table_from(&NPTABLE.captures(src)?)
    }
}

struct PipeTable;

impl BlockRule for PipeTable {
    fn name(&self) -> &'static str {
        "table"
    }

    fn applies_in(&self, context: BlockContext) -> bool {
        context != BlockContext::ListItem
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        table_from(&TABLE.captures(src)?)
    }
}

/// Whether the line at the start of `src` ends the paragraph above it.
fn interrupts_paragraph(src: &str) -> bool {
    scan_fence(src).is_some()
        || starts_list(src)
        || HRULE.is_match(src)
        || HEADING.is_match(src)
        || LHEADING.is_match(src)
        || BLOCK_QUOTE.is_match(src)
        || DEF_LINK.is_match(src)
        || DEF_FOOTNOTE.is_match(src)
        || starts_block_tag(src)
}

struct Paragraph;

impl BlockRule for Paragraph {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn applies_in(&self, context: BlockContext) -> bool {
        context != BlockContext::ListItem
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        if src.starts_with('\n') {
            return None;
        }
        let mut end = 0;
        loop {
            end = src[end..].find('\n').map_or(src.len(), |idx| end + idx);
            if end >= src.len() {
                break;
            }
            let next = &src[end + 1..];
            if next.is_empty() || next.starts_with('\n') || interrupts_paragraph(next) {
                break;
            }
            end += 1;
        }
        let tail = &src[end..];
        let newlines = tail.len() - tail.trim_start_matches('\n').len();
        Some(BlockMatch::new(
            end + newlines,
            RawBlock::Paragraph(src[..end].to_string()),
        ))
    }
}

struct Text;

impl BlockRule for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        TEXT.find(src)
            .map(|m| BlockMatch::new(m.end(), RawBlock::Text(m.as_str().to_string())))
    }
}
