//! Temporary screenshot file handling.

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Filename template for captures (chrono format specifiers).
pub const FILENAME_TEMPLATE: &str = "screenshot_%Y-%m-%d_%H%M%S";

/// Image format extension for captures.
pub const FORMAT: &str = "png";

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
/// * `format` - File extension (e.g., "png")
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    let filename = now.format(template).to_string();
    format!("{}.{}", filename, format)
}

/// The screenshot file for a single run.
///
/// Lives inside a private directory created for this run, so two instances
/// never share a path. The file itself is not created here; the capture
/// backend is expected to write it. Dropping the artifact removes the
/// directory and anything in it.
#[derive(Debug)]
pub struct Artifact {
    dir: TempDir,
    path: PathBuf,
}

impl Artifact {
    /// Reserve a fresh artifact path under the system temp directory.
    pub fn create() -> io::Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Reserve a fresh artifact path under `parent`.
    pub fn create_in(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("myazo-").tempdir_in(parent)?;
        let path = dir.path().join(generate_filename(FILENAME_TEMPLATE, FORMAT));
        log::debug!("Screenshot will be written to {}", path.display());
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether something has been written to the artifact path yet.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// File extension including the leading dot, e.g. `".png"`.
    pub fn suffix(&self) -> String {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }

    /// Remove the screenshot and its directory, logging instead of failing.
    pub fn cleanup(self) {
        if self.exists() {
            match fs::remove_file(&self.path) {
                Ok(()) => log::debug!("Removed screenshot {}", self.path.display()),
                Err(e) => log::warn!(
                    "Failed to remove screenshot {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }

        let dir = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            log::warn!("Failed to remove temp directory {}: {}", dir.display(), e);
        }
    }
}
