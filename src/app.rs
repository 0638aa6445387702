//! One capture-upload-share run.

use std::io::{self, Write};

use thiserror::Error;

use crate::capture::{
    self, Artifact, Backend, CaptureDependencies, CaptureError, ImageError, Os,
};
use crate::config::{ConfigError, Settings};
use crate::dispatch::{self, LinkHandler, SystemLinkHandler};
use crate::upload::{UploadError, UploadTarget, Uploader};

/// Exit code when no screenshot was produced.
pub const EXIT_CAPTURE: u8 = 1;
/// Exit code when the upload failed or was rejected.
pub const EXIT_UPLOAD: u8 = 2;
/// Exit code when the config file could not be used.
pub const EXIT_CONFIG: u8 = 3;
/// Exit code when the screenshot could not be re-encoded.
pub const EXIT_IMAGE: u8 = 4;
/// Exit code for any other I/O failure.
pub const EXIT_IO: u8 = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Capture(_) => EXIT_CAPTURE,
            AppError::Upload(_) => EXIT_UPLOAD,
            AppError::Config(_) => EXIT_CONFIG,
            AppError::Image(_) => EXIT_IMAGE,
            AppError::Io(_) => EXIT_IO,
        }
    }
}

/// Everything a run needs besides the settings. Swappable for tests.
pub struct App<'a> {
    settings: &'a Settings,
    backends: &'static [Backend],
    capture: CaptureDependencies,
    uploader: Uploader,
    links: Box<dyn LinkHandler>,
}

impl<'a> App<'a> {
    /// Wire up the real system: `PATH` lookups, subprocesses, HTTP and the desktop.
    pub fn new(settings: &'a Settings) -> Result<Self, AppError> {
        Ok(Self {
            settings,
            backends: capture::backends_for(Os::current()),
            capture: CaptureDependencies::default(),
            uploader: Uploader::new()?,
            links: Box::new(SystemLinkHandler),
        })
    }

    pub fn with_backends(mut self, backends: &'static [Backend]) -> Self {
        self.backends = backends;
        self
    }

    pub fn with_capture(mut self, capture: CaptureDependencies) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_uploader(mut self, uploader: Uploader) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn with_link_handler(mut self, links: Box<dyn LinkHandler>) -> Self {
        self.links = links;
        self
    }

    /// Capture, upload and share one screenshot, returning the shared link.
    ///
    /// The screenshot lives in a fresh temporary directory that is removed
    /// before this returns, whether the run succeeded or not.
    pub fn run(&self, out: &mut dyn Write) -> Result<String, AppError> {
        let artifact = Artifact::create()?;
        let result = self.run_with(&artifact, out);
        artifact.cleanup();
        result
    }

    fn run_with(&self, artifact: &Artifact, out: &mut dyn Write) -> Result<String, AppError> {
        let captured = capture::perform_capture(self.backends, artifact.path(), &self.capture)?;
        log::debug!("Capture result: {:?}", captured);

        if self.settings.strip_metadata {
            capture::strip_metadata(artifact.path())?;
        }

        let target = UploadTarget::from_settings(self.settings);
        let response = self.uploader.upload(&target, artifact.path())?;

        let url = dispatch::final_url(self.settings, &response, &artifact.suffix());
        dispatch::dispatch(self.settings, &url, self.links.as_ref(), out)?;

        Ok(url)
    }
}
