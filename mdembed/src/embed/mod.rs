//! Image embedding
//!
//!     [`EmbedImagesRenderer`] is the Markdown renderer with three callbacks overridden so the
//!     output no longer depends on files next to it:
//!
//!     - `image`: local Markdown images become `<img>` tags with a `data:` URI source;
//!     - `inline_html` and `block_html`: `<img>` tags in raw HTML get their `src` embedded
//!       (see [`html`]).
//!
//!     Remote references (anything that parses as an absolute URL) are left as they are.
//!     Local references resolve against [`EmbedOptions::root_path`]; a missing file or an
//!     unknown extension aborts the render. SVGs are rasterized to PNG unless
//!     [`EmbedOptions::convert_svgs`] is off.
//!
//!     Assets are read, encoded and dropped per reference; nothing is cached.

pub mod asset;
pub mod html;
pub mod mime;
pub mod svg;

use crate::error::RenderResult;
use crate::render::{markdown, Renderer};
use std::path::PathBuf;

/// Where and how local images are embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Base directory for relative image paths
    pub root_path: PathBuf,
    /// Rasterize SVGs to PNG
    pub convert_svgs: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            convert_svgs: true,
        }
    }
}

/// Markdown renderer that inlines local images as `data:` URIs.
#[derive(Debug, Clone, Default)]
pub struct EmbedImagesRenderer {
    options: EmbedOptions,
}

impl EmbedImagesRenderer {
    pub fn new(options: EmbedOptions) -> Self {
        Self { options }
    }
}

impl Renderer for EmbedImagesRenderer {
    fn image(&self, src: &str, title: Option<&str>, alt: &str) -> RenderResult<String> {
        match asset::resolve(src, &self.options)? {
            Some(embedded) => Ok(html_image(&embedded.data_uri, title, alt, embedded.size)),
            None => Ok(markdown::image(src, title, alt)),
        }
    }

    fn inline_html(&self, html: &str) -> RenderResult<String> {
        html::embed_fragment(html, &self.options)
    }

    fn block_html(&self, html: &str) -> RenderResult<String> {
        let html = html::embed_fragment(html, &self.options)?;
        Ok(markdown::block_html(&html))
    }
}

/// An `<img>` tag; `alt`, the size and `title` are written only when known.
fn html_image(src: &str, title: Option<&str>, alt: &str, size: Option<(u32, u32)>) -> String {
    let mut out = format!(r#"<img src="{}""#, escape_link(src));
    if !alt.is_empty() {
        out.push_str(&format!(r#" alt="{}""#, escape_html(alt)));
    }
    if let Some((width, height)) = size {
        out.push_str(&format!(r#" width="{width}" height="{height}""#));
    }
    if let Some(title) = title.filter(|title| !title.is_empty()) {
        out.push_str(&format!(r#" title="{}""#, escape_html(title)));
    }
    out.push_str(" />");
    out
}

/// Escape text for use in an HTML attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape a link target; `javascript:` and `vbscript:` targets are dropped.
pub fn escape_link(url: &str) -> String {
    let scheme: String = url
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':'))
        .collect::<String>()
        .to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") {
        return String::new();
    }
    escape_html(url)
}
