//! Image embedding tests
//!
//! Every test builds its notebook directory in a temp dir, see `common::fixture_dir`.

mod html;
mod images;
