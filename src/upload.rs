//! Uploading captures over HTTP.
//!
//! Two endpoints are supported: the public Gyazo upload API, and a
//! self-hosted upload script that authenticates with a shared secret. Both
//! take a single multipart POST and answer with the link to the image as the
//! response body.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, multipart};
use thiserror::Error;

use crate::config::Settings;

/// Gyazo's upload endpoint.
pub const REMOTE_UPLOAD_URL: &str = "https://upload.gyazo.com/upload.cgi";

/// Form field carrying the image for Gyazo uploads.
pub const REMOTE_FILE_FIELD: &str = "imagedata";

/// Form field carrying the image for self-hosted uploads.
pub const SCRIPT_FILE_FIELD: &str = "screenshot";

/// Form field carrying the shared secret for self-hosted uploads.
pub const SECRET_FIELD: &str = "secret";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read screenshot {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send upload request to {url}: {source}")]
    Send { url: String, source: reqwest::Error },

    #[error("Failed to upload screenshot. Server returned status code '{}'.", .status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("Failed to read upload response: {0}")]
    Body(#[source] reqwest::Error),
}

impl UploadError {
    /// HTTP status returned by the server, when the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UploadError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Where an upload goes and how the form is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget<'a> {
    /// The public Gyazo service.
    Remote,
    /// A user-operated upload script.
    SelfHosted { url: &'a str, secret: &'a str },
}

impl<'a> UploadTarget<'a> {
    pub fn from_settings(settings: &'a Settings) -> Self {
        if settings.use_remote_service {
            UploadTarget::Remote
        } else {
            UploadTarget::SelfHosted {
                url: &settings.upload_url,
                secret: &settings.secret,
            }
        }
    }

    pub fn file_field(&self) -> &'static str {
        match self {
            UploadTarget::Remote => REMOTE_FILE_FIELD,
            UploadTarget::SelfHosted { .. } => SCRIPT_FILE_FIELD,
        }
    }
}

/// Blocking HTTP uploader. Sends exactly one request per call.
pub struct Uploader {
    client: Client,
    remote_url: String,
}

impl Uploader {
    /// Build an uploader with no request timeout.
    pub fn new() -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .user_agent(concat!("myazo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UploadError::Client)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            remote_url: REMOTE_UPLOAD_URL.to_string(),
        }
    }

    /// Send [`UploadTarget::Remote`] uploads to `url` instead of Gyazo.
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self
    }

    /// Endpoint that uploads for `target` are posted to.
    pub fn endpoint<'t>(&'t self, target: &UploadTarget<'t>) -> &'t str {
        match *target {
            UploadTarget::Remote => &self.remote_url,
            UploadTarget::SelfHosted { url, .. } => url,
        }
    }

    /// POST the file at `path` to `target` and return the response body.
    ///
    /// Only HTTP 200 counts as success; the body is returned untouched.
    pub fn upload(&self, target: &UploadTarget<'_>, path: &Path) -> Result<String, UploadError> {
        let data = fs::read(path).map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("screenshot.png")
            .to_string();

        let endpoint = self.endpoint(target);
        log::info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            data.len(),
            endpoint
        );

        let part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(UploadError::Client)?;
        let mut form = multipart::Form::new();
        if let UploadTarget::SelfHosted { secret, .. } = target {
            form = form.text(SECRET_FIELD, secret.to_string());
        }
        let form = form.part(target.file_field(), part);

        let res = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .map_err(|source| UploadError::Send {
                url: endpoint.to_string(),
                source,
            })?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().unwrap_or_default();
            log::debug!("Upload rejected with {}: {}", status, body);
            return Err(UploadError::Status { status, body });
        }

        let body = res.text().map_err(UploadError::Body)?;
        log::info!("Upload succeeded");
        log::debug!("Upload response: {:?}", body);
        Ok(body)
    }
}
