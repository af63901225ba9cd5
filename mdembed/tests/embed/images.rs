//! Markdown `![]()` images

use crate::common::{fixture_dir, write, PNG_BYTES, RECT_SVG};
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
fn test_local_png_becomes_data_uri() {
    let dir = fixture_dir();
    let out = embed_images("![alt](img.png)", &options(dir.path())).unwrap();
    assert_eq!(
        out,
        format!(
            "<img src=\"data:image/png;base64,{}\" alt=\"alt\" />\n\n",
            STANDARD.encode(PNG_BYTES)
        )
    );
}

#[test]
fn test_remote_image_keeps_its_src() {
    let dir = fixture_dir();
    let out = embed_images(
        "![alt](http://example.com/x.png \"T\")",
        &options(dir.path()),
    )
    .unwrap();
    assert_eq!(out, "![alt](http://example.com/x.png)\"T\"\n\n");
}

#[test]
fn test_unknown_extension_is_an_error() {
    let dir = fixture_dir();
    let err = embed_images("![alt](img.xyz)", &options(dir.path())).unwrap_err();
    assert!(matches!(err, RenderError::UnknownMimeType { ref src } if src == "img.xyz"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = fixture_dir();
    let err = embed_images("text\n\n![alt](missing.png)", &options(dir.path())).unwrap_err();
    let RenderError::ImageNotFound { path } = err else {
        panic!("expected ImageNotFound, got {err:?}");
    };
    assert_eq!(path, dir.path().join("missing.png"));
}

#[test]
fn test_svg_is_rasterized_with_display_size() {
    let dir = fixture_dir();
    let out = embed_images("![plot](plot.svg \"Plot\")", &options(dir.path())).unwrap();
    assert!(out.starts_with("<img src=\"data:image/png;base64,"));
    assert!(out.contains(" alt=\"plot\" width=\"100\" height=\"50\" title=\"Plot\" />"));
}

#[test]
fn test_svg_conversion_can_be_disabled() {
    let dir = fixture_dir();
    let options = EmbedOptions {
        root_path: dir.path().to_path_buf(),
        convert_svgs: false,
    };
    let out = embed_images("![](plot.svg)", &options).unwrap();
    assert_eq!(
        out,
        format!(
            "<img src=\"data:image/svg+xml;base64,{}\" />\n\n",
            STANDARD.encode(RECT_SVG)
        )
    );
}

#[test]
fn test_rasterized_png_has_scaled_pixels() {
    let dir = fixture_dir();
    let asset = mdembed::embed::asset::load("plot.svg", &options(dir.path()))
        .unwrap()
        .unwrap();
    assert_eq!(asset.mime_type, "image/png");
    assert_eq!(asset.size, Some((100, 50)));
    // IHDR width and height, big endian, right after the signature and chunk header
    assert_eq!(&asset.bytes[16..24], &[0, 0, 0, 250, 0, 0, 0, 125]);
}

#[test]
fn test_images_in_subdirectories_and_math_together() {
    let dir = fixture_dir();
    write(dir.path(), "figs/a.gif", b"GIF89a");
    let out = embed_images(
        "Area $\\pi r^2$ shown in ![fig](figs/a.gif).\n\n$$x^2$$\n",
        &options(dir.path()),
    )
    .unwrap();
    assert_eq!(
        out,
        format!(
            "Area $\\pi r^2$ shown in <img src=\"data:image/gif;base64,{}\" alt=\"fig\" />.\n\n$$x^2$$\n\n",
            STANDARD.encode(b"GIF89a")
        )
    );
}

#[test]
fn test_image_inside_list_item() {
    let dir = fixture_dir();
    let out = embed_images("- ![a](img.png)\n- text\n", &options(dir.path())).unwrap();
    assert!(out.starts_with("* <img src=\"data:image/png;base64,"));
    assert!(out.ends_with("* text\n\n"));
}
