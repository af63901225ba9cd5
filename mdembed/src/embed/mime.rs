//! Image media types, looked up by file extension.

use std::path::Path;

pub const SVG: &str = "image/svg+xml";
pub const PNG: &str = "image/png";

/// Media type of an image path; the extension is matched case-insensitively.
pub fn from_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let mime = match ext.as_str() {
        "gif" => "image/gif",
        "pbm" => "image/x-portable-bitmap",
        "pgm" => "image/x-portable-graymap",
        "ppm" => "image/x-portable-pixmap",
        "tiff" => "image/tiff",
        "xbm" => "image/x-xbitmap",
        "jpg" | "jpeg" => "image/jpeg",
        "bmp" => "image/x-ms-bmp",
        "png" => PNG,
        "svg" => SVG,
        _ => return None,
    };
    Some(mime)
}
