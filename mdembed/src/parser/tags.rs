//! Raw HTML tag scanning shared by the block and inline HTML rules.

/// Tags that are phrasing content and therefore never open an HTML block.
const INLINE_TAGS: &[&str] = &[
    "a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "data", "time", "code", "var",
    "samp", "kbd", "sub", "sup", "i", "b", "u", "mark", "ruby", "rt", "rp", "bdi", "bdo", "span",
    "br", "wbr", "ins", "del", "img", "font",
];

/// An opening tag found at the start of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenTag<'a> {
    pub name: &'a str,
    /// Byte offset just past the closing `>`
    pub end: usize,
    pub self_closing: bool,
}

pub(crate) fn is_inline_tag(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    INLINE_TAGS.contains(&lower.as_str())
}

/// Length of a `<!-- ... -->` comment at the start of `s`.
pub(crate) fn scan_comment(s: &str) -> Option<usize> {
    let body = s.strip_prefix("<!--")?;
    body.find("-->").map(|idx| 4 + idx + 3)
}

/// Scan an opening tag such as `<img src="a.png" width=40 />` at the start of `s`.
///
/// Names that look like URLs (`<http://...>`) or e-mail addresses
/// (`<me@example.com>`) are rejected so the autolink rule can claim them.
pub(crate) fn scan_open_tag(s: &str) -> Option<OpenTag<'_>> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'<') || !bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }

    let mut pos = 1;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    let name = &s[1..pos];

    let rest = &s[pos..];
    if rest.starts_with(":/") || looks_like_email_tail(rest) {
        return None;
    }

    loop {
        let ws = skip_whitespace(bytes, pos);
        match bytes.get(ws) {
            Some(b'>') => {
                return Some(OpenTag {
                    name,
                    end: ws + 1,
                    self_closing: false,
                })
            }
            Some(b'/') if bytes.get(ws + 1) == Some(&b'>') => {
                return Some(OpenTag {
                    name,
                    end: ws + 2,
                    self_closing: true,
                })
            }
            Some(c) if ws > pos && is_attr_name_start(*c) => {
                pos = scan_attribute(bytes, ws)?;
            }
            _ => return None,
        }
    }
}

/// Whether `s` starts with `<name` for a tag that may open an HTML block.
pub(crate) fn starts_block_tag(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('<') else {
        return false;
    };
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let (name, tail) = rest.split_at(end);
    !name.is_empty()
        && !is_inline_tag(name)
        && !tail.starts_with(":/")
        && !looks_like_email_tail(tail)
}

/// Offset just past the first `</name>` in `s`, searching from `from`.
pub(crate) fn find_closing_tag(s: &str, from: usize, name: &str) -> Option<usize> {
    let closing = format!("</{name}>");
    s[from..].find(&closing).map(|idx| from + idx + closing.len())
}

fn looks_like_email_tail(rest: &str) -> bool {
    for c in rest.chars() {
        match c {
            '@' => return true,
            c if c.is_alphanumeric() || c == '_' || c.is_whitespace() => return false,
            _ => {}
        }
    }
    false
}

fn is_attr_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'-' || c == b'_' || c == b':'
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Scan `name`, `name=value`, `name="value"` or `name='value'`; returns the end offset.
fn scan_attribute(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while pos < bytes.len()
        && (bytes[pos].is_ascii_alphanumeric() || matches!(bytes[pos], b'-' | b'_' | b':' | b'.'))
    {
        pos += 1;
    }

    let after_name = skip_whitespace(bytes, pos);
    if bytes.get(after_name) != Some(&b'=') {
        return Some(pos);
    }

    let value_start = skip_whitespace(bytes, after_name + 1);
    match bytes.get(value_start)? {
        quote @ (b'"' | b'\'') => {
            let close = bytes[value_start + 1..].iter().position(|b| b == quote)?;
            Some(value_start + 1 + close + 1)
        }
        _ => {
            let mut end = value_start;
            while end < bytes.len()
                && !bytes[end].is_ascii_whitespace()
                && !matches!(bytes[end], b'"' | b'\'' | b'>' | b'<' | b'=' | b'`')
            {
                end += 1;
            }
            (end > value_start).then_some(end)
        }
    }
}
