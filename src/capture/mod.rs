//! Screenshot capture functionality for myazo.
//!
//! This module provides:
//! - The per-platform table of external screenshot utilities
//! - Backend selection with fallback through that table
//! - Clipboard-delivered captures (Windows Snipping Tool)
//! - Metadata stripping before upload
//! - The temporary file that holds the capture

pub mod backends;
pub mod dependencies;
pub mod file;
pub mod metadata;
pub mod types;

mod pipeline;

pub use backends::{Backend, Delivery, Os, backends_for};
pub use dependencies::CaptureDependencies;
pub use file::Artifact;
pub use metadata::strip_metadata;
pub use pipeline::{perform_capture, select_backend};
pub use types::{CaptureError, CaptureOutcome, CaptureResult, ImageError};
