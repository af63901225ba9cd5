//! Resolving image references to `data:` URIs

use super::{mime, svg, EmbedOptions};
use crate::error::{RenderError, RenderResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;

/// Image content ready to be inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// Display size, known only for rasterized SVGs
    pub size: Option<(u32, u32)>,
}

impl ResolvedAsset {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// An image reference replaced by its inlined form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub data_uri: String,
    pub size: Option<(u32, u32)>,
}

/// Whether `src` is an absolute URL (`http:`, `data:`, ...) rather than a path.
pub fn is_remote(src: &str) -> bool {
    url::Url::parse(src).is_ok()
}

/// Load the image `src` refers to.
///
/// Returns `Ok(None)` for remote references, which are left alone. Local
/// paths resolve against the configured root.
pub fn load(src: &str, options: &EmbedOptions) -> RenderResult<Option<ResolvedAsset>> {
    if is_remote(src) {
        log::debug!("not embedding remote image {src}");
        return Ok(None);
    }

    let path = options.root_path.join(src);
    if !path.exists() {
        return Err(RenderError::ImageNotFound { path });
    }
    let mime_type = mime::from_path(src).ok_or_else(|| RenderError::UnknownMimeType {
        src: src.to_string(),
    })?;

    let bytes = fs::read(&path).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;

    let asset = if options.convert_svgs && mime_type == mime::SVG {
        let raster = svg::rasterize(&path, &bytes)?;
        ResolvedAsset {
            bytes: raster.png,
            mime_type: mime::PNG,
            size: Some(raster.display),
        }
    } else {
        ResolvedAsset {
            bytes,
            mime_type,
            size: None,
        }
    };
    log::debug!(
        "embedding {} as {} ({} bytes)",
        path.display(),
        asset.mime_type,
        asset.bytes.len()
    );
    Ok(Some(asset))
}

/// Resolve `src` to a `data:` URI, `None` for remote references.
pub fn resolve(src: &str, options: &EmbedOptions) -> RenderResult<Option<EmbeddedImage>> {
    Ok(load(src, options)?.map(|asset| EmbeddedImage {
        data_uri: asset.data_uri(),
        size: asset.size,
    }))
}
