//! Raw HTML `<img>` tags

use crate::common::{fixture_dir, PNG_BYTES};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mdembed::{embed_images, EmbedOptions, RenderError};
use std::path::Path;

fn options(root: &Path) -> EmbedOptions {
    EmbedOptions {
        root_path: root.to_path_buf(),
        convert_svgs: true,
    }
}

#[test]
fn test_block_img_src_is_embedded() {
    let dir = fixture_dir();
    let out = embed_images(
        "<div align=\"center\">\n<img src=\"img.png\" width=\"300\">\n</div>\n\nAfter.",
        &options(dir.path()),
    )
    .unwrap();
    assert_eq!(
        out,
        format!(
            "<div align=\"center\">\n<img src=\"data:image/png;base64,{}\" width=\"300\">\n</div>\n\nAfter.\n\n",
            STANDARD.encode(PNG_BYTES)
        )
    );
}

#[test]
fn test_svg_img_gets_dimensions() {
    let dir = fixture_dir();
    let out = embed_images("Inline <img src=\"plot.svg\"> image.", &options(dir.path())).unwrap();
    assert!(out.starts_with("Inline <img src=\"data:image/png;base64,"));
    assert!(out.contains("width=\"100\""));
    assert!(out.contains("height=\"50\""));
    assert!(out.ends_with("> image.\n\n"));
}

#[test]
fn test_explicit_width_is_preserved() {
    let dir = fixture_dir();
    let out = embed_images(
        "<p><img src=\"plot.svg\" width=\"42\"></p>",
        &options(dir.path()),
    )
    .unwrap();
    assert!(out.contains("width=\"42\""));
    assert!(!out.contains("height="));
    assert!(!out.contains("width=\"100\""));
}

#[test]
fn test_html_without_images_is_verbatim() {
    let dir = fixture_dir();
    let source = "<table><tr><td>unclosed\n</table>";
    let out = embed_images(source, &options(dir.path())).unwrap();
    assert_eq!(out, format!("{source}\n\n"));
}

#[test]
fn test_remote_img_is_left_alone() {
    let dir = fixture_dir();
    let out = embed_images(
        "<p><img src=\"https://example.com/logo.png\"></p>",
        &options(dir.path()),
    )
    .unwrap();
    assert_eq!(out, "<p><img src=\"https://example.com/logo.png\"></p>\n\n");
}

#[test]
fn test_missing_img_is_an_error() {
    let dir = fixture_dir();
    let err = embed_images("<p><img src=\"nope.png\"></p>", &options(dir.path())).unwrap_err();
    assert!(matches!(err, RenderError::ImageNotFound { .. }));
}
