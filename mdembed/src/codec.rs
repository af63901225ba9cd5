//! Token stream codec
//!
//! Renderer callbacks only exchange strings, so list items and table rows are
//! handed to their parent callback as self-describing chunks:
//!
//! ```text
//! <tag><decimal byte length of payload>:<payload>
//! ```
//!
//! Chunks are concatenated without separators. Because the payload is
//! length-prefixed its content never affects parsing: digits, `:` and nested
//! chunks are all carried through untouched. A table row, for example, is an
//! `r` chunk whose payload is itself a run of `f` and `c` chunks.
//!
//! The encoded form never leaves a single render pass.

use std::fmt;
use thiserror::Error;

/// Kind of a chunk, written as its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `l`: a rendered list item
    ListItem,
    /// `r`: a table row; the payload holds the row's cell and flag chunks
    TableRow,
    /// `c`: rendered table cell text
    TableCell,
    /// `f`: a cell formatting flag, `name=value`
    TableFlag,
}

impl Tag {
    pub fn as_char(self) -> char {
        match self {
            Tag::ListItem => 'l',
            Tag::TableRow => 'r',
            Tag::TableCell => 'c',
            Tag::TableFlag => 'f',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'l' => Some(Tag::ListItem),
            'r' => Some(Tag::TableRow),
            'c' => Some(Tag::TableCell),
            'f' => Some(Tag::TableFlag),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Reasons a buffer fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected a chunk but the buffer is empty")]
    Empty,
    #[error("unknown chunk tag '{0}'")]
    UnknownTag(char),
    #[error("chunk '{tag}' has no length delimiter")]
    MissingDelimiter { tag: Tag },
    #[error("chunk '{tag}' has an invalid length '{length}'")]
    InvalidLength { tag: Tag, length: String },
    #[error("chunk '{tag}' declares {declared} bytes but only {available} remain")]
    Truncated {
        tag: Tag,
        declared: usize,
        available: usize,
    },
    #[error("chunk '{tag}' length {declared} splits a character")]
    SplitCharacter { tag: Tag, declared: usize },
}

/// Encode one chunk.
pub fn encode(tag: Tag, payload: &str) -> String {
    let mut out = String::with_capacity(payload.len() + 8);
    encode_into(&mut out, tag, payload);
    out
}

/// Append one chunk to `out`.
pub fn encode_into(out: &mut String, tag: Tag, payload: &str) {
    out.push(tag.as_char());
    out.push_str(&payload.len().to_string());
    out.push(':');
    out.push_str(payload);
}

/// Decode the first chunk of `buffer`, returning `(tag, payload, remainder)`.
pub fn decode_one(buffer: &str) -> Result<(Tag, &str, &str), DecodeError> {
    let mut chars = buffer.chars();
    let tag_char = chars.next().ok_or(DecodeError::Empty)?;
    let tag = Tag::from_char(tag_char).ok_or(DecodeError::UnknownTag(tag_char))?;
    let rest = chars.as_str();

    let colon = rest
        .find(':')
        .ok_or(DecodeError::MissingDelimiter { tag })?;
    let digits = &rest[..colon];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidLength {
            tag,
            length: digits.to_string(),
        });
    }
    let declared: usize = digits.parse().map_err(|_| DecodeError::InvalidLength {
        tag,
        length: digits.to_string(),
    })?;

    let body = &rest[colon + 1..];
    if declared > body.len() {
        return Err(DecodeError::Truncated {
            tag,
            declared,
            available: body.len(),
        });
    }
    if !body.is_char_boundary(declared) {
        return Err(DecodeError::SplitCharacter { tag, declared });
    }

    Ok((tag, &body[..declared], &body[declared..]))
}

/// Iterator over the chunks of a concatenated buffer.
///
/// Yields an error at most once; iteration stops after it.
pub struct Chunks<'a> {
    rest: &'a str,
    failed: bool,
}

impl<'a> Chunks<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self {
            rest: buffer,
            failed: false,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<(Tag, &'a str), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match decode_one(self.rest) {
            Ok((tag, payload, rest)) => {
                self.rest = rest;
                Some(Ok((tag, payload)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Decode every chunk in `buffer`.
pub fn decode_all(buffer: &str) -> Result<Vec<(Tag, &str)>, DecodeError> {
    Chunks::new(buffer).collect()
}
