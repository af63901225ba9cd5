//! Inline lexing
//!
//! Inline rules are tried in order at every position of a block's text; the
//! first match wins and the text rule always consumes at least one character.
//! The text rule stops before every character another rule may start with,
//! so constructs such as `$x$` are never swallowed by plain text.

use super::block::{normalize_key, LinkDefinition};
use super::tags::{find_closing_tag, scan_comment, scan_open_tag};
use crate::ir::nodes::{Image, Inline, Link};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;

static ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\([\\`*{}\[\]()#+\-.!_>~|$])").unwrap());
static AUTOLINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<([^ >]+(@|:)[^ >]+)>").unwrap());
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(https?://[^\s<]+[^<.,:;"')\]\s])"#).unwrap());
static FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\^([^\]]+)\]").unwrap());
static LINEBREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {2,}\n").unwrap());

/// Nesting limit for links and spans; deeper content is kept as text.
const MAX_INLINE_DEPTH: usize = 16;

/// Numbering of footnote references.
///
/// Only keys with a definition can be referenced, and only the first
/// reference to a key is numbered.
#[derive(Debug, Default)]
pub struct FootnoteRefs {
    defined: HashSet<String>,
    indices: HashMap<String, usize>,
}

impl FootnoteRefs {
    pub fn new(defined: HashSet<String>) -> Self {
        Self {
            defined,
            indices: HashMap::new(),
        }
    }

    /// Number a reference to `key`; `None` for unknown keys and repeats.
    pub fn reference(&mut self, key: &str) -> Option<usize> {
        if !self.defined.contains(key) || self.indices.contains_key(key) {
            return None;
        }
        let index = self.indices.len() + 1;
        self.indices.insert(key.to_string(), index);
        Some(index)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.indices.get(key).copied()
    }
}

/// An inline grammar rule; returns the bytes consumed and the node produced.
pub trait InlineRule {
    fn name(&self) -> &'static str;

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)>;
}

/// Ordered list of inline rules.
pub struct InlineGrammar {
    rules: Vec<Box<dyn InlineRule>>,
}

impl Default for InlineGrammar {
    fn default() -> Self {
        Self::new(vec![
            Box::new(Escape),
            Box::new(InlineHtml),
            Box::new(Autolink),
            Box::new(BareUrl),
            Box::new(FootnoteRef),
            Box::new(LinkRule),
            Box::new(RefLink),
            Box::new(NoLink),
            Box::new(Strong),
            Box::new(Emphasis),
            Box::new(CodeSpan),
            Box::new(LineBreak),
            Box::new(Strikethrough),
            Box::new(Text),
        ])
    }
}

impl InlineGrammar {
    pub fn new(rules: Vec<Box<dyn InlineRule>>) -> Self {
        Self { rules }
    }

    /// Insert a rule at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, rule: Box<dyn InlineRule>) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl fmt::Debug for InlineGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}

pub struct InlineLexer<'a> {
    grammar: &'a InlineGrammar,
    links: &'a HashMap<String, LinkDefinition>,
    footnotes: &'a mut FootnoteRefs,
    in_link: bool,
    depth: usize,
}

impl<'a> InlineLexer<'a> {
    pub fn new(
        grammar: &'a InlineGrammar,
        links: &'a HashMap<String, LinkDefinition>,
        footnotes: &'a mut FootnoteRefs,
    ) -> Self {
        Self {
            grammar,
            links,
            footnotes,
            in_link: false,
            depth: 0,
        }
    }

    /// Tokenize `text`; past [`MAX_INLINE_DEPTH`] nested calls it is one text node.
    pub fn tokenize(&mut self, text: &str) -> Vec<Inline> {
        if text.is_empty() {
            return Vec::new();
        }
        if self.depth >= MAX_INLINE_DEPTH {
            return vec![Inline::text(text)];
        }
        self.depth += 1;
        let nodes = self.tokenize_at_depth(text);
        self.depth -= 1;
        nodes
    }

    fn tokenize_at_depth(&mut self, text: &str) -> Vec<Inline> {
        let grammar = self.grammar;
        let mut rest = text;
        let mut nodes: Vec<Inline> = Vec::new();

        while !rest.is_empty() {
            let found = grammar
                .rules
                .iter()
                .find_map(|rule| rule.parse(rest, self).filter(|(consumed, _)| *consumed > 0));
            let (consumed, node) = found.unwrap_or_else(|| {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                (len, Inline::text(&rest[..len]))
            });
            push_merged(&mut nodes, node);
            rest = &rest[consumed.min(rest.len())..];
        }
        nodes
    }

    /// Tokenize the text of a link; bare URLs inside it stay plain text.
    pub fn tokenize_link_text(&mut self, text: &str) -> Vec<Inline> {
        let outer = std::mem::replace(&mut self.in_link, true);
        let nodes = self.tokenize(text);
        self.in_link = outer;
        nodes
    }

    pub fn in_link(&self) -> bool {
        self.in_link
    }

    pub fn link_definition(&self, key: &str) -> Option<&'a LinkDefinition> {
        self.links.get(key)
    }

    pub fn footnote_index(&self, key: &str) -> Option<usize> {
        self.footnotes.index_of(key)
    }

    pub fn footnotes(&mut self) -> &mut FootnoteRefs {
        &mut *self.footnotes
    }
}

/// Append `node`, joining it with a preceding text node.
fn push_merged(nodes: &mut Vec<Inline>, node: Inline) {
    if let Inline::Text { text } = &node {
        if let Some(Inline::Text { text: previous }) = nodes.last_mut() {
            previous.push_str(text);
            return;
        }
    }
    nodes.push(node);
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Escape;

impl InlineRule for Escape {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let caps = ESCAPE.captures(src)?;
        let ch = caps.get(1)?.as_str().chars().next()?;
        Some((caps.get(0)?.end(), Inline::Escape { ch }))
    }
}

struct InlineHtml;

impl InlineRule for InlineHtml {
    fn name(&self) -> &'static str {
        "inline_html"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let end = match scan_comment(src) {
            Some(end) => end,
            None => {
                let tag = scan_open_tag(src)?;
                if tag.self_closing {
                    tag.end
                } else {
                    find_closing_tag(src, tag.end, tag.name).unwrap_or(tag.end)
                }
            }
        };
        Some((
            end,
            Inline::Html {
                html: src[..end].to_string(),
            },
        ))
    }
}

struct Autolink;

impl InlineRule for Autolink {
    fn name(&self) -> &'static str {
        "autolink"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let caps = AUTOLINK.captures(src)?;
        Some((
            caps.get(0)?.end(),
            Inline::Autolink {
                url: caps.get(1)?.as_str().to_string(),
                email: caps.get(2)?.as_str() == "@",
            },
        ))
    }
}

struct BareUrl;

impl InlineRule for BareUrl {
    fn name(&self) -> &'static str {
        "url"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let url = URL.find(src)?.as_str();
        let node = if lexer.in_link() {
            Inline::text(url)
        } else {
            Inline::Autolink {
                url: url.to_string(),
                email: false,
            }
        };
        Some((url.len(), node))
    }
}

struct FootnoteRef;

impl InlineRule for FootnoteRef {
    fn name(&self) -> &'static str {
        "footnote"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let caps = FOOTNOTE.captures(src)?;
        let key = normalize_key(caps.get(1)?.as_str());
        let index = lexer.footnotes().reference(&key)?;
        Some((caps.get(0)?.end(), Inline::FootnoteRef { key, index }))
    }
}

/// Offset of the `]` closing a label that starts at `start`; brackets nest.
fn scan_label(src: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = src[start..].char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => depth += 1,
            ']' if depth == 0 => return Some(start + idx),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Scan `url "title")` following the `(` of an inline link.
///
/// Returns the url, the optional title and the bytes consumed including the
/// closing `)`. Parentheses inside the url must balance.
fn scan_destination(s: &str) -> Option<(String, Option<String>, usize)> {
    let start = s.len() - s.trim_start().len();

    if let Some(bracketed) = s[start..].strip_prefix('<') {
        let close = bracketed.find('>')?;
        let url = bracketed[..close].to_string();
        let mut pos = start + 1 + close + 1;
        let (title, after_title) = scan_title(&s[pos..]).unwrap_or((None, 0));
        pos += after_title;
        pos += s[pos..].len() - s[pos..].trim_start().len();
        return s[pos..]
            .starts_with(')')
            .then(|| (url, title, pos + 1));
    }

    let mut depth = 0usize;
    for (idx, c) in s[start..].char_indices() {
        let pos = start + idx;
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                let url = s[start..pos].trim_end().to_string();
                return Some((url, None, pos + 1));
            }
            ')' => depth -= 1,
            c if c.is_whitespace() && depth == 0 => {
                if let Some((Some(title), len)) = scan_title(&s[pos..]) {
                    let after = pos + len;
                    let close = after + (s[after..].len() - s[after..].trim_start().len());
                    if s[close..].starts_with(')') {
                        let url = s[start..pos].to_string();
                        return Some((url, Some(title), close + 1));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Scan whitespace and a quoted title that is followed by the closing `)`.
fn scan_title(s: &str) -> Option<(Option<String>, usize)> {
    let body = s.trim_start();
    let lead = s.len() - body.len();
    if lead == 0 {
        return None;
    }
    let quote = body.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &body[1..];
    for (idx, _) in inner.match_indices(quote) {
        if inner[idx + 1..].trim_start().starts_with(')') {
            let title = inner[..idx].to_string();
            return Some((Some(title), lead + 1 + idx + 1));
        }
    }
    None
}

fn link_node(
    lexer: &mut InlineLexer<'_>,
    image: bool,
    text: &str,
    url: String,
    title: Option<String>,
) -> Inline {
    if image {
        Inline::Image(Image {
            src: url,
            title,
            alt: text.to_string(),
        })
    } else {
        Inline::Link(Link {
            url,
            title,
            children: lexer.tokenize_link_text(text),
        })
    }
}

/// `(image, label_start)` for text starting with `[` or `![`.
fn label_start(src: &str) -> Option<(bool, usize)> {
    if src.starts_with("![") {
        Some((true, 2))
    } else if src.starts_with('[') {
        Some((false, 1))
    } else {
        None
    }
}

struct LinkRule;

impl InlineRule for LinkRule {
    fn name(&self) -> &'static str {
        "link"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let (image, start) = label_start(src)?;
        let label_end = scan_label(src, start)?;
        let destination = src[label_end + 1..].strip_prefix('(')?;
        let (url, title, len) = scan_destination(destination)?;
        let consumed = label_end + 2 + len;
        let text = &src[start..label_end];
        Some((consumed, link_node(lexer, image, text, url, title)))
    }
}

struct RefLink;

impl InlineRule for RefLink {
    fn name(&self) -> &'static str {
        "reflink"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let (image, start) = label_start(src)?;
        let label_end = scan_label(src, start)?;
        let after = &src[label_end + 1..];
        let gap = after.len() - after.trim_start().len();
        let reference = after[gap..].strip_prefix('[')?;
        let close = reference.find(']')?;
        let raw_key = &reference[..close];
        if raw_key.contains(['[', '^']) {
            return None;
        }

        let text = &src[start..label_end];
        let key = normalize_key(if raw_key.is_empty() { text } else { raw_key });
        let definition = lexer.link_definition(&key)?;
        let consumed = label_end + 1 + gap + 1 + close + 1;
        let node = link_node(
            lexer,
            image,
            text,
            definition.url.clone(),
            definition.title.clone(),
        );
        Some((consumed, node))
    }
}

struct NoLink;

impl InlineRule for NoLink {
    fn name(&self) -> &'static str {
        "nolink"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let (image, start) = label_start(src)?;
        let label_end = scan_label(src, start)?;
        let text = &src[start..label_end];
        let definition = lexer.link_definition(&normalize_key(text))?;
        let node = link_node(
            lexer,
            image,
            text,
            definition.url.clone(),
            definition.title.clone(),
        );
        Some((label_end + 1, node))
    }
}

/// Find the first `delim` pair closing a span opened by the same pair.
///
/// The content must be at least one character long and the closing pair
/// must not be followed by a further delimiter character.
fn scan_double(src: &str, delim: &str) -> Option<usize> {
    let body = src.strip_prefix(delim)?;
    let first = body.chars().next()?.len_utf8();
    let marker = delim.chars().next()?;
    let mut from = first;
    while let Some(idx) = body[from..].find(delim) {
        let pos = from + idx;
        if !body[pos + delim.len()..].starts_with(marker) {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

struct Strong;

impl InlineRule for Strong {
    fn name(&self) -> &'static str {
        "double_emphasis"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let delim = if src.starts_with("**") {
            "**"
        } else if src.starts_with("__") {
            "__"
        } else {
            return None;
        };
        let end = scan_double(src, delim)?;
        let children = lexer.tokenize(&src[2..2 + end]);
        Some((2 + end + 2, Inline::Strong { children }))
    }
}

struct Emphasis;

impl Emphasis {
    /// Content length of a `*x*` or `_x_` span; doubled markers inside are content.
    fn scan(src: &str, marker: char) -> Option<usize> {
        let body = &src[1..];
        let mut pos = 0;
        loop {
            let rest = &body[pos..];
            let mut chars = rest.chars();
            let c = chars.next()?;
            let next = chars.next();
            if c == marker {
                let closes = match marker {
                    '*' => next != Some('*'),
                    _ => !next.is_some_and(is_word_char),
                };
                if pos > 0 && closes {
                    return Some(pos);
                }
                if next != Some(marker) {
                    return None;
                }
                pos += 2;
            } else {
                pos += c.len_utf8();
            }
        }
    }
}

impl InlineRule for Emphasis {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let marker = src.chars().next().filter(|c| *c == '*' || *c == '_')?;
        let len = Self::scan(src, marker)?;
        let children = lexer.tokenize(&src[1..1 + len]);
        Some((1 + len + 1, Inline::Emphasis { children }))
    }
}

struct CodeSpan;

impl InlineRule for CodeSpan {
    fn name(&self) -> &'static str {
        "code"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let run = src.len() - src.trim_start_matches('`').len();
        if run == 0 {
            return None;
        }
        let fence = &src[..run];
        let mut from = run;
        while let Some(idx) = src[from..].find(fence) {
            let pos = from + idx;
            let closing_run = src[pos..].len() - src[pos..].trim_start_matches('`').len();
            let code = src[run..pos].trim();
            if closing_run == run && !code.is_empty() && !src[..pos].ends_with('`') {
                return Some((
                    pos + run,
                    Inline::Code {
                        code: code.to_string(),
                    },
                ));
            }
            from = pos + closing_run;
        }
        None
    }
}

struct LineBreak;

impl InlineRule for LineBreak {
    fn name(&self) -> &'static str {
        "linebreak"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let end = LINEBREAK.find(src)?.end();
        if src[end..].trim().is_empty() {
            return None;
        }
        Some((end, Inline::LineBreak))
    }
}

struct Strikethrough;

impl InlineRule for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn parse(&self, src: &str, lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let body = src.strip_prefix("~~")?;
        let first = body.chars().next().filter(|c| !c.is_whitespace())?;
        let mut from = first.len_utf8();
        while let Some(idx) = body[from..].find("~~") {
            let pos = from + idx;
            if !body[..pos].ends_with(char::is_whitespace) {
                let children = lexer.tokenize(&body[..pos]);
                return Some((2 + pos + 2, Inline::Strikethrough { children }));
            }
            from = pos + 1;
        }
        None
    }
}

/// End of a plain text run: at least one character, then up to the next
/// character that may start another construct.
fn text_end(src: &str) -> usize {
    for (idx, c) in src.char_indices().skip(1) {
        if matches!(c, '\\' | '<' | '!' | '[' | '_' | '*' | '`' | '~' | '$') {
            return idx;
        }
        let rest = &src[idx..];
        if rest.starts_with("http://") || rest.starts_with("https://") {
            return idx;
        }
        if c == ' ' {
            let spaces = rest.len() - rest.trim_start_matches(' ').len();
            if spaces >= 2 && rest[spaces..].starts_with('\n') {
                return idx;
            }
        }
    }
    src.len()
}

struct Text;

impl InlineRule for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let end = text_end(src);
        Some((end, Inline::text(&src[..end])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_with(source: &str, links: &HashMap<String, LinkDefinition>) -> Vec<Inline> {
        let grammar = InlineGrammar::default();
        let mut footnotes = FootnoteRefs::new(HashSet::from(["note".to_string()]));
        InlineLexer::new(&grammar, links, &mut footnotes).tokenize(source)
    }

    fn tokenize(source: &str) -> Vec<Inline> {
        tokenize_with(source, &HashMap::new())
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(
            tokenize("a *b* __c__"),
            vec![
                Inline::text("a "),
                Inline::Emphasis {
                    children: vec![Inline::text("b")]
                },
                Inline::text(" "),
                Inline::Strong {
                    children: vec![Inline::text("c")]
                },
            ]
        );
    }

    #[test]
    fn test_underscore_inside_words_is_text() {
        assert_eq!(tokenize("snake_case_name"), vec![Inline::text("snake_case_name")]);
    }

    #[test]
    fn test_code_span() {
        assert_eq!(
            tokenize("use `` a`b `` here"),
            vec![
                Inline::text("use "),
                Inline::Code {
                    code: "a`b".to_string()
                },
                Inline::text(" here"),
            ]
        );
    }

    #[test]
    fn test_link_with_title_and_parens() {
        assert_eq!(
            tokenize(r#"[see](http://x.org/a_(b) "T")"#),
            vec![Inline::Link(Link {
                url: "http://x.org/a_(b)".to_string(),
                title: Some("T".to_string()),
                children: vec![Inline::text("see")],
            })]
        );
    }

    #[test]
    fn test_image_keeps_raw_alt() {
        assert_eq!(
            tokenize("![a *b*](img.png)"),
            vec![Inline::Image(Image {
                src: "img.png".to_string(),
                title: None,
                alt: "a *b*".to_string(),
            })]
        );
    }

    #[test]
    fn test_image_path_with_spaces() {
        assert_eq!(
            tokenize("![](my image.png)"),
            vec![Inline::Image(Image {
                src: "my image.png".to_string(),
                title: None,
                alt: String::new(),
            })]
        );
    }

    #[test]
    fn test_reference_links() {
        let links = HashMap::from([(
            "home".to_string(),
            LinkDefinition {
                url: "http://example.com".to_string(),
                title: None,
            },
        )]);
        let expected = Inline::Link(Link {
            url: "http://example.com".to_string(),
            title: None,
            children: vec![Inline::text("Home")],
        });
        assert_eq!(tokenize_with("[Home][]", &links), vec![expected.clone()]);
        assert_eq!(tokenize_with("[Home]", &links), vec![expected]);
        assert_eq!(tokenize_with("[other]", &links), vec![Inline::text("[other]")]);
    }

    #[test]
    fn test_urls_and_autolinks() {
        assert_eq!(
            tokenize("see https://example.com/x."),
            vec![
                Inline::text("see "),
                Inline::Autolink {
                    url: "https://example.com/x".to_string(),
                    email: false
                },
                Inline::text("."),
            ]
        );
        assert_eq!(
            tokenize("<me@example.com>"),
            vec![Inline::Autolink {
                url: "me@example.com".to_string(),
                email: true
            }]
        );
    }

    #[test]
    fn test_url_inside_link_text_is_text() {
        let nodes = tokenize("[http://a.org](http://a.org)");
        let [Inline::Link(link)] = nodes.as_slice() else {
            panic!("expected one link, got {nodes:?}");
        };
        assert_eq!(link.children, vec![Inline::text("http://a.org")]);
    }

    #[test]
    fn test_inline_html() {
        assert_eq!(
            tokenize(r#"a <span class="x">b</span> <img src="p.png">"#),
            vec![
                Inline::text("a "),
                Inline::Html {
                    html: r#"<span class="x">b</span>"#.to_string()
                },
                Inline::text(" "),
                Inline::Html {
                    html: r#"<img src="p.png">"#.to_string()
                },
            ]
        );
    }

    #[test]
    fn test_escapes_and_linebreak() {
        assert_eq!(
            tokenize("\\*a  \nb"),
            vec![
                Inline::Escape { ch: '*' },
                Inline::text("a"),
                Inline::LineBreak,
                Inline::text("b"),
            ]
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(
            tokenize("~~gone~~"),
            vec![Inline::Strikethrough {
                children: vec![Inline::text("gone")]
            }]
        );
    }

    #[test]
    fn test_footnote_only_first_reference_counts() {
        let nodes = tokenize("a[^note] b[^note] c[^missing]");
        let refs: Vec<_> = nodes
            .iter()
            .filter(|node| matches!(node, Inline::FootnoteRef { .. }))
            .collect();
        assert_eq!(
            refs,
            vec![&Inline::FootnoteRef {
                key: "note".to_string(),
                index: 1
            }]
        );
        assert_eq!(nodes.last(), Some(&Inline::text(" b[^note] c[^missing]")));
    }

    #[test]
    fn test_deeply_nested_links_stop_at_depth_limit() {
        let source = format!("{}x{}", "[".repeat(10_000), "](u)".repeat(10_000));
        let nodes = tokenize(&source);
        assert_eq!(nodes.len(), 1);

        let mut depth = 0;
        let mut node = &nodes[0];
        while let Inline::Link(link) = node {
            depth += 1;
            node = &link.children[0];
        }
        assert_eq!(depth, MAX_INLINE_DEPTH);
        let Inline::Text { text } = node else {
            panic!("expected text below the depth limit, got {node:?}");
        };
        assert!(text.starts_with("[[") && text.ends_with("](u)](u)"));
    }

    #[test]
    fn test_text_stops_before_dollar() {
        assert_eq!(text_end("cost $5"), 5);
        assert_eq!(text_end("a  \nb"), 1);
        assert_eq!(text_end("$"), 1);
    }
}
