use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbaImage;

use crate::capture::types::CaptureError;
use crate::clipboard;

/// Abstraction over finding executables on the system.
pub trait ProgramLocator: Send + Sync {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Abstraction over running a backend to completion.
///
/// Returns whether the process exited with status zero.
pub trait ProgramRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<bool>;
}

/// Abstraction over reading an image from the clipboard.
pub trait ClipboardImageSource: Send + Sync {
    fn grab_image(&self) -> Result<Option<RgbaImage>, CaptureError>;
}

/// Bundle of dependencies used by the capture pipeline. Each component can be mocked in tests.
pub struct CaptureDependencies {
    pub locator: Box<dyn ProgramLocator>,
    pub runner: Box<dyn ProgramRunner>,
    pub clipboard: Box<dyn ClipboardImageSource>,
}

impl Default for CaptureDependencies {
    fn default() -> Self {
        Self {
            locator: Box::new(PathLocator),
            runner: Box::new(BlockingRunner),
            clipboard: Box::new(SystemClipboard),
        }
    }
}

struct PathLocator;
struct BlockingRunner;
struct SystemClipboard;

impl ProgramLocator for PathLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

impl ProgramRunner for BlockingRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<bool> {
        // Inherit the terminal: several backends are interactive. No timeout.
        let status = Command::new(program).args(args).status()?;
        log::debug!("{} exited with {}", program.display(), status);
        Ok(status.success())
    }
}

impl ClipboardImageSource for SystemClipboard {
    fn grab_image(&self) -> Result<Option<RgbaImage>, CaptureError> {
        Ok(clipboard::grab_image()?)
    }
}
