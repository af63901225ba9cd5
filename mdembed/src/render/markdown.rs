//! Canonical Markdown output
//!
//! These are the default bodies of the [`Renderer`](super::Renderer)
//! callbacks. Renderers that override a callback can still call the function
//! here to fall back to the plain Markdown form.

use crate::codec::{self, Tag};
use crate::error::RenderResult;
use crate::ir::nodes::Alignment;

pub fn header(text: &str, level: u8) -> String {
    format!("{} {}\n\n", "#".repeat(usize::from(level) + 1), text)
}

pub fn paragraph(text: &str) -> String {
    format!("{text}\n\n")
}

pub fn hrule() -> String {
    "---\n".to_string()
}

pub fn linebreak() -> String {
    "\n".to_string()
}

/// Fenced code block; the fence is longer than any backtick run in `code`.
pub fn block_code(code: &str, language: Option<&str>) -> String {
    let fence = "`".repeat(longest_run(code, '`').max(2) + 1);
    format!("{fence}{}\n{code}\n{fence}\n\n", language.unwrap_or_default())
}

pub fn block_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str("> ");
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn block_html(html: &str) -> String {
    format!("{html}\n\n")
}

pub fn block_math(text: &str) -> String {
    format!("$${text}$$\n\n")
}

pub fn block_latex(name: &str, body: &str) -> String {
    format!("\\begin{{{name}}}{body}\\end{{{name}}}\n\n")
}

pub fn math(text: &str) -> String {
    format!("${text}$")
}

/// Emphasis-style spans are followed by a single space.
fn span(text: &str, delimiter: &str) -> String {
    format!("{delimiter}{text}{delimiter} ")
}

pub fn emphasis(text: &str) -> String {
    span(text, "*")
}

pub fn strong(text: &str) -> String {
    span(text, "**")
}

pub fn strikethrough(text: &str) -> String {
    span(text, "~~")
}

pub fn codespan(code: &str) -> String {
    let fence = "`".repeat(longest_run(code, '`') + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

pub fn escape(ch: char) -> String {
    format!("\\{ch}")
}

pub fn autolink(url: &str) -> String {
    format!("<{url}>")
}

pub fn link(url: &str, title: Option<&str>, text: &str) -> String {
    with_title(format!("[{text}]({url})"), title)
}

pub fn image(src: &str, title: Option<&str>, alt: &str) -> String {
    with_title(format!("![{alt}]({src})"), title)
}

fn with_title(mut out: String, title: Option<&str>) -> String {
    if let Some(title) = title.filter(|title| !title.is_empty()) {
        out.push('"');
        out.push_str(title);
        out.push('"');
    }
    out
}

pub fn footnote_ref(key: &str) -> String {
    format!("[^{key}]")
}

/// A footnote definition; body lines are trimmed and indented two spaces.
pub fn footnote_item(key: &str, text: &str) -> String {
    let mut out = format!("[^{key}]:\n");
    for line in text.trim_end_matches('\n').split('\n') {
        let line = line.trim();
        if !line.is_empty() {
            out.push_str("  ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

pub fn list_item(text: &str) -> String {
    codec::encode(Tag::ListItem, text)
}

/// Decode the `l` chunks in `body` and write one marker line per item.
///
/// Continuation lines of an item are indented two spaces so nested lists
/// stay inside their parent item.
pub fn list(body: &str, ordered: bool) -> RenderResult<String> {
    let marker = if ordered { "# " } else { "* " };
    let mut out = String::with_capacity(body.len());
    for chunk in codec::Chunks::new(body) {
        let (tag, item) = chunk?;
        if tag != Tag::ListItem {
            continue;
        }
        let mut lines = item.trim().split('\n');
        out.push_str(marker);
        out.push_str(lines.next().unwrap_or_default());
        out.push('\n');
        for line in lines {
            if !line.is_empty() {
                out.push_str("  ");
                out.push_str(line);
            }
            out.push('\n');
        }
    }
    out.push('\n');
    Ok(out)
}

/// Encode a cell: a `header` flag, an `align` flag, then the cell text with
/// newlines flattened to spaces.
pub fn table_cell(content: &str, header: bool, align: Alignment) -> String {
    let mut out = String::new();
    codec::encode_into(
        &mut out,
        Tag::TableFlag,
        if header { "header=1" } else { "header=0" },
    );
    codec::encode_into(
        &mut out,
        Tag::TableFlag,
        &format!("align={}", align.as_flag()),
    );
    codec::encode_into(&mut out, Tag::TableCell, &content.replace('\n', " "));
    out
}

pub fn table_row(content: &str) -> String {
    codec::encode(Tag::TableRow, content)
}

#[derive(Debug)]
struct Cell<'a> {
    text: &'a str,
    align: Alignment,
}

/// Decode a run of `r` chunks into rows of cells.
fn decode_rows(buffer: &str) -> RenderResult<Vec<Vec<Cell<'_>>>> {
    let mut rows = Vec::new();
    for chunk in codec::Chunks::new(buffer) {
        let (tag, payload) = chunk?;
        if tag != Tag::TableRow {
            continue;
        }
        let mut row = Vec::new();
        let mut align = Alignment::None;
        for chunk in codec::decode_all(payload)? {
            match chunk {
                (Tag::TableFlag, flag) => {
                    if let Some(("align", value)) = flag.split_once('=') {
                        align = Alignment::from_flag(value);
                    }
                }
                (Tag::TableCell, text) => row.push(Cell {
                    text,
                    align: std::mem::take(&mut align),
                }),
                _ => {}
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Lay out the header and body rows as an aligned pipe table.
pub fn table(header: &str, body: &str) -> RenderResult<String> {
    let header = decode_rows(header)?;
    let body = decode_rows(body)?;

    let mut widths: Vec<usize> = Vec::new();
    let mut aligns: Vec<Alignment> = Vec::new();
    for row in header.iter().chain(&body) {
        if row.len() > widths.len() {
            widths.resize(row.len(), 0);
            aligns.resize(row.len(), Alignment::None);
        }
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.text.chars().count());
            if aligns[idx] == Alignment::None {
                aligns[idx] = cell.align;
            }
        }
    }

    let mut out = String::new();
    for row in &header {
        write_row(&mut out, row, &widths);
    }
    let separator: Vec<String> = widths
        .iter()
        .zip(&aligns)
        .map(|(width, align)| separator_cell(*width, *align))
        .collect();
    out.push_str(&separator.join(" | "));
    out.push('\n');
    for row in &body {
        write_row(&mut out, row, &widths);
    }
    out.push('\n');
    Ok(out)
}

fn write_row(out: &mut String, row: &[Cell<'_>], widths: &[usize]) {
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.text, width = *width))
        .collect();
    out.push_str(&cells.join(" | "));
    out.push('\n');
}

fn separator_cell(width: usize, align: Alignment) -> String {
    let dashes = |n: usize| "-".repeat(n.max(1));
    match align {
        Alignment::Center => format!(":{}:", dashes(width.saturating_sub(2))),
        Alignment::Left => format!(":{}", dashes(width.saturating_sub(1))),
        Alignment::Right => format!("{}:", dashes(width.saturating_sub(1))),
        Alignment::None => dashes(width),
    }
}

fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
