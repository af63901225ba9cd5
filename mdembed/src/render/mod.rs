//! Rendering
//!
//!     A renderer is a set of string-valued callbacks, one per construct, driven by a walk over
//!     the parsed [`Document`]. Children are rendered first and handed to their parent's
//!     callback as text. Lists and tables need to see their items and cells individually, so
//!     `list_item`, `table_cell` and `table_row` encode their output as token stream chunks
//!     (see [`crate::codec`]) which `list` and `table` decode again.
//!
//!     Every callback has a default producing canonical Markdown ([`markdown`]). A renderer
//!     overrides only what it changes and may call back into [`markdown`] for the rest, which
//!     is how the image embedding renderer is built.
//!
//!     The walk never mutates the document, so one document can be rendered any number of
//!     times with different renderers.

pub mod markdown;

use crate::error::RenderResult;
use crate::ir::nodes::{Alignment, Block, Document, Inline, Math};
use crate::parser::Parser;

/// Output callbacks for every Markdown construct.
pub trait Renderer {
    fn text(&self, text: &str) -> String {
        text.to_string()
    }

    fn escape(&self, ch: char) -> String {
        markdown::escape(ch)
    }

    fn emphasis(&self, text: &str) -> String {
        markdown::emphasis(text)
    }

    fn strong(&self, text: &str) -> String {
        markdown::strong(text)
    }

    fn strikethrough(&self, text: &str) -> String {
        markdown::strikethrough(text)
    }

    fn codespan(&self, code: &str) -> String {
        markdown::codespan(code)
    }

    fn linebreak(&self) -> String {
        markdown::linebreak()
    }

    fn autolink(&self, url: &str, _email: bool) -> String {
        markdown::autolink(url)
    }

    fn link(&self, url: &str, title: Option<&str>, text: &str) -> String {
        markdown::link(url, title, text)
    }

    fn image(&self, src: &str, title: Option<&str>, alt: &str) -> RenderResult<String> {
        Ok(markdown::image(src, title, alt))
    }

    fn inline_html(&self, html: &str) -> RenderResult<String> {
        Ok(html.to_string())
    }

    fn footnote_ref(&self, key: &str, _index: usize) -> String {
        markdown::footnote_ref(key)
    }

    fn math(&self, text: &str) -> String {
        markdown::math(text)
    }

    /// `level` is the source heading level, 1 to 6.
    fn header(&self, text: &str, level: u8) -> String {
        markdown::header(text, level)
    }

    fn paragraph(&self, text: &str) -> String {
        markdown::paragraph(text)
    }

    fn hrule(&self) -> String {
        markdown::hrule()
    }

    fn block_code(&self, code: &str, language: Option<&str>) -> String {
        markdown::block_code(code, language)
    }

    fn block_quote(&self, text: &str) -> String {
        markdown::block_quote(text)
    }

    fn block_html(&self, html: &str) -> RenderResult<String> {
        Ok(markdown::block_html(html))
    }

    fn block_math(&self, text: &str) -> String {
        markdown::block_math(text)
    }

    fn block_latex(&self, name: &str, body: &str) -> String {
        markdown::block_latex(name, body)
    }

    fn list_item(&self, text: &str) -> String {
        markdown::list_item(text)
    }

    fn list(&self, body: &str, ordered: bool) -> RenderResult<String> {
        markdown::list(body, ordered)
    }

    fn table_cell(&self, content: &str, header: bool, align: Alignment) -> String {
        markdown::table_cell(content, header, align)
    }

    fn table_row(&self, content: &str) -> String {
        markdown::table_row(content)
    }

    fn table(&self, header: &str, body: &str) -> RenderResult<String> {
        markdown::table(header, body)
    }

    fn footnote_item(&self, key: &str, text: &str) -> String {
        markdown::footnote_item(key, text)
    }

    /// Wraps the rendered footnote definitions placed after the document.
    fn footnotes(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Plain Markdown output, every callback at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {}

/// Render a whole document; referenced footnotes follow the blocks.
pub fn render_document<R: Renderer + ?Sized>(doc: &Document, renderer: &R) -> RenderResult<String> {
    let mut out = render_blocks(&doc.blocks, renderer)?;
    if !doc.footnotes.is_empty() {
        let mut items = String::new();
        for footnote in &doc.footnotes {
            let body = render_blocks(&footnote.children, renderer)?;
            items.push_str(&renderer.footnote_item(&footnote.key, &body));
        }
        out.push_str(&renderer.footnotes(&items));
    }
    Ok(out)
}

fn render_blocks<R: Renderer + ?Sized>(blocks: &[Block], renderer: &R) -> RenderResult<String> {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&render_block(block, renderer)?);
    }
    Ok(out)
}

/// Item children are concatenated; a nested block always starts on a new line.
fn render_item<R: Renderer + ?Sized>(children: &[Block], renderer: &R) -> RenderResult<String> {
    let mut out = String::new();
    for child in children {
        let rendered = render_block(child, renderer)?;
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&rendered);
    }
    Ok(out)
}

fn render_block<R: Renderer + ?Sized>(block: &Block, renderer: &R) -> RenderResult<String> {
    let out = match block {
        Block::Heading(heading) => {
            renderer.header(&render_inlines(&heading.content, renderer)?, heading.level)
        }
        Block::Paragraph { content } => renderer.paragraph(&render_inlines(content, renderer)?),
        Block::Text { content } => render_inlines(content, renderer)?,
        Block::List(list) => {
            let mut body = String::new();
            for item in &list.items {
                body.push_str(&renderer.list_item(&render_item(&item.children, renderer)?));
            }
            renderer.list(&body, list.ordered)?
        }
        Block::Table(table) => {
            let header = render_row(&table.header, renderer)?;
            let mut body = String::new();
            for row in &table.rows {
                body.push_str(&render_row(row, renderer)?);
            }
            renderer.table(&header, &body)?
        }
        Block::BlockQuote { children } => {
            renderer.block_quote(&render_blocks(children, renderer)?)
        }
        Block::Code(code) => renderer.block_code(&code.code, code.language.as_deref()),
        Block::Math(Math::Display { text }) => renderer.block_math(text),
        Block::Math(Math::Environment { name, body }) => renderer.block_latex(name, body),
        Block::Math(Math::Inline { text }) => renderer.math(text),
        Block::Html { html } => renderer.block_html(html)?,
        Block::Rule => renderer.hrule(),
    };
    Ok(out)
}

fn render_row<R: Renderer + ?Sized>(
    cells: &[crate::ir::nodes::TableCell],
    renderer: &R,
) -> RenderResult<String> {
    let mut content = String::new();
    for cell in cells {
        let text = render_inlines(&cell.content, renderer)?;
        content.push_str(&renderer.table_cell(&text, cell.header, cell.align));
    }
    Ok(renderer.table_row(&content))
}

fn render_inlines<R: Renderer + ?Sized>(nodes: &[Inline], renderer: &R) -> RenderResult<String> {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&render_inline(node, renderer)?);
    }
    Ok(out)
}

fn render_inline<R: Renderer + ?Sized>(node: &Inline, renderer: &R) -> RenderResult<String> {
    let out = match node {
        Inline::Text { text } => renderer.text(text),
        Inline::Escape { ch } => renderer.escape(*ch),
        Inline::Emphasis { children } => renderer.emphasis(&render_inlines(children, renderer)?),
        Inline::Strong { children } => renderer.strong(&render_inlines(children, renderer)?),
        Inline::Strikethrough { children } => {
            renderer.strikethrough(&render_inlines(children, renderer)?)
        }
        Inline::Code { code } => renderer.codespan(code),
        Inline::Link(link) => renderer.link(
            &link.url,
            link.title.as_deref(),
            &render_inlines(&link.children, renderer)?,
        ),
        Inline::Image(image) => renderer.image(&image.src, image.title.as_deref(), &image.alt)?,
        Inline::Autolink { url, email } => renderer.autolink(url, *email),
        Inline::Math(Math::Inline { text } | Math::Display { text }) => renderer.math(text),
        Inline::Math(Math::Environment { name, body }) => renderer.block_latex(name, body),
        Inline::Html { html } => renderer.inline_html(html)?,
        Inline::LineBreak => renderer.linebreak(),
        Inline::FootnoteRef { key, index } => renderer.footnote_ref(key, *index),
    };
    Ok(out)
}

/// A parser paired with a renderer.
///
/// ```ignore
/// let md = Markdown::new(MarkdownRenderer);
/// let out = md.render("# Title\n\nText with $x^2$.")?;
/// ```
#[derive(Debug, Default)]
pub struct Markdown<R = MarkdownRenderer> {
    parser: Parser,
    renderer: R,
}

impl<R: Renderer> Markdown<R> {
    /// Uses the math-enabled default grammars.
    pub fn new(renderer: R) -> Self {
        Self::with_parser(Parser::default(), renderer)
    }

    pub fn with_parser(parser: Parser, renderer: R) -> Self {
        Self { parser, renderer }
    }

    pub fn parse(&self, source: &str) -> Document {
        self.parser.parse(source)
    }

    pub fn render_document(&self, doc: &Document) -> RenderResult<String> {
        render_document(doc, &self.renderer)
    }

    /// Parse and render `source`.
    pub fn render(&self, source: &str) -> RenderResult<String> {
        let doc = self.parse(source);
        self.render_document(&doc)
    }
}
