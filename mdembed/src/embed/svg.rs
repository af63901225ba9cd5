//! SVG rasterization
//!
//! SVGs are rendered to PNG at [`SVG_SCALE`] times their intrinsic size so they
//! stay sharp on high density displays. The reported display size is the
//! pixel size divided by the same factor.

use crate::error::{RenderError, RenderResult};
use once_cell::sync::Lazy;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use std::path::Path;
use std::sync::Arc;

pub const SVG_SCALE: f32 = 2.5;

/// System fonts, loaded on first use and shared by every rasterization.
static FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} font faces", db.len());
    Arc::new(db)
});

/// A rasterized SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub png: Vec<u8>,
    /// Pixel size of the PNG
    pub pixels: (u32, u32),
    /// Size to display the PNG at
    pub display: (u32, u32),
}

/// Rasterize the SVG `data` read from `path`.
///
/// Relative references inside the SVG resolve against the file's directory.
pub fn rasterize(path: &Path, data: &[u8]) -> RenderResult<Raster> {
    let svg_error = |message: String| RenderError::Svg {
        path: path.to_path_buf(),
        message,
    };

    let mut options = Options::default();
    options.resources_dir = path.parent().map(Path::to_path_buf);
    options.fontdb = Arc::clone(&FONTS);

    let tree = Tree::from_data(data, &options).map_err(|e| svg_error(e.to_string()))?;
    let (width, height) = scaled_pixels(tree.size().width(), tree.size().height());
    if width == 0 || height == 0 {
        return Err(svg_error("scaled size is empty".to_string()));
    }

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| svg_error(format!("cannot allocate {width}x{height}")))?;
    resvg::render(
        &tree,
        Transform::from_scale(SVG_SCALE, SVG_SCALE),
        &mut pixmap.as_mut(),
    );
    let png = pixmap
        .encode_png()
        .map_err(|e| svg_error(e.to_string()))?;

    let pixels = (width, height);
    let display = (display_size(pixels.0), display_size(pixels.1));
    log::trace!(
        "rasterized {} to {}x{} px, displayed at {}x{}",
        path.display(),
        pixels.0,
        pixels.1,
        display.0,
        display.1
    );
    Ok(Raster {
        png,
        pixels,
        display,
    })
}

/// Pixel size for an intrinsic SVG size: scaled first, then truncated.
pub fn scaled_pixels(width: f32, height: f32) -> (u32, u32) {
    ((width * SVG_SCALE) as u32, (height * SVG_SCALE) as u32)
}

/// Display size for a pixel length, truncated.
pub fn display_size(pixels: u32) -> u32 {
    (pixels as f32 / SVG_SCALE) as u32
}
