//! Error types for parsing, rendering and image embedding

use crate::codec::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort rendering of the current document.
///
/// Nothing is recovered internally: the first failure propagates through the
/// render walk to the caller, which decides whether to skip the document or
/// stop the batch.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A list or table payload did not decode
    #[error("malformed token stream: {0}")]
    Decode(#[from] DecodeError),

    /// A local image reference points at a file that does not exist
    #[error("File '{}' not found.", path.display())]
    ImageNotFound { path: PathBuf },

    /// The image's extension is not in the known media type table
    #[error("Mimetype for '{src}' unknown.")]
    UnknownMimeType { src: String },

    /// Reading an image that exists failed
    #[error("could not read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The SVG could not be parsed or rasterized
    #[error("could not rasterize '{}': {message}", path.display())]
    Svg { path: PathBuf, message: String },

    /// Re-serializing a raw HTML fragment failed
    #[error("HTML serialization failed: {0}")]
    Html(String),
}

/// Result alias used throughout the crate
pub type RenderResult<T> = Result<T, RenderError>;
