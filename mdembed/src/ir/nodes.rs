//! Core data structures for the Intermediate Representation (IR).

use serde::Serialize;

/// The root of a parsed document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// Footnote definitions that were referenced, in first-reference order.
    pub footnotes: Vec<Footnote>,
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading(Heading),
    Paragraph { content: Vec<Inline> },
    /// A run of bare lines inside a list item or footnote.
    Text { content: Vec<Inline> },
    List(List),
    Table(Table),
    BlockQuote { children: Vec<Block> },
    Code(CodeBlock),
    Math(Math),
    Html { html: String },
    Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    /// Source level, 1 to 6
    pub level: u8,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    /// Loose items render their text as paragraphs.
    pub loose: bool,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

/// A table with one header row and any number of body rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub content: Vec<Inline>,
    pub header: bool,
    pub align: Alignment,
}

/// Alignment of a table column, taken from the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    #[default]
    None,
}

impl Alignment {
    /// Flag value used when the alignment travels through the token stream.
    pub fn as_flag(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::None => "",
        }
    }

    pub fn from_flag(value: &str) -> Self {
        match value.chars().next() {
            Some('l') => Alignment::Left,
            Some('c') => Alignment::Center,
            Some('r') => Alignment::Right,
            _ => Alignment::None,
        }
    }
}

/// LaTeX math, carried as raw literal text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Math {
    /// `$...$`
    Inline { text: String },
    /// `$$...$$`
    Display { text: String },
    /// `\begin{name}...\end{name}`
    Environment { name: String, body: String },
}

/// A footnote definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footnote {
    pub key: String,
    pub children: Vec<Block>,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    /// A backslash escape, kept so it can be written back as is.
    Escape { ch: char },
    Emphasis { children: Vec<Inline> },
    Strong { children: Vec<Inline> },
    Strikethrough { children: Vec<Inline> },
    Code { code: String },
    Link(Link),
    Image(Image),
    Autolink { url: String, email: bool },
    Math(Math),
    Html { html: String },
    LineBreak,
    FootnoteRef { key: String, index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub src: String,
    pub title: Option<String>,
    pub alt: String,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }
}
