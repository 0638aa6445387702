//! Data types for screenshot capture.

use std::io;

use thiserror::Error;

use super::backends::Backend;
use crate::clipboard::ClipboardError;

/// How a capture reached the artifact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The backend wrote the image straight to the artifact path.
    FileWritten,
    /// The backend left the image on the clipboard; it was saved to the
    /// artifact path afterwards.
    ClipboardImage { width: u32, height: u32 },
}

/// Result of a successful capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureResult {
    /// Backend that produced the image.
    pub backend: &'static Backend,
    pub outcome: CaptureOutcome,
}

/// Errors that can occur during screenshot capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to take screenshot: no screenshot produced")]
    NoScreenshot,

    #[error("Clipboard operation failed: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Failed to save clipboard image: {0}")]
    SaveClipboardImage(#[from] image::ImageError),
}

/// Errors raised while rewriting a capture without its metadata.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to open screenshot {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("Failed to write screenshot {path}: {source}")]
    Encode {
        path: String,
        source: image::ImageError,
    },

    #[error("Failed to access screenshot {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("Unsupported pixel layout {0:?}")]
    UnsupportedLayout(image::ColorType),
}
