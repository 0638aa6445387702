//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Default self-hosted upload endpoint.
pub const DEFAULT_UPLOAD_SCRIPT: &str = "https://myazo.example.com/upload.php";

/// Default shared secret expected by the self-hosted upload script.
pub const DEFAULT_SECRET: &str = "hunter2";

/// Effective settings for one run.
///
/// Built once by [`Settings::load`](super::Settings::load) and then only read.
/// Field names follow the keys of the `[myazo]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Upload to the Gyazo service instead of the self-hosted script.
    /// When true, `upload_script` and `secret` are ignored.
    #[serde(rename = "gyazo_server", default = "default_false")]
    pub use_remote_service: bool,

    /// Rewrite Gyazo landing-page links into direct image links.
    /// Ignored unless `use_remote_service` is set.
    #[serde(rename = "gyazo_direct_link", default = "default_true")]
    pub direct_link: bool,

    /// Self-hosted upload endpoint.
    #[serde(rename = "upload_script", default = "default_upload_script")]
    pub upload_url: String,

    /// Shared secret sent alongside self-hosted uploads.
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Re-encode the capture from raw pixels before uploading.
    #[serde(rename = "clear_metadata", default = "default_true")]
    pub strip_metadata: bool,

    /// Open the resulting link in the default browser.
    #[serde(default = "default_true")]
    pub open_browser: bool,

    /// Copy the resulting link to the clipboard.
    #[serde(rename = "copy_clipboard", default = "default_true")]
    pub copy_to_clipboard: bool,

    /// Print the resulting link to stdout.
    #[serde(rename = "output_url", default = "default_true")]
    pub print_url: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_remote_service: default_false(),
            direct_link: default_true(),
            upload_url: default_upload_script(),
            secret: default_secret(),
            strip_metadata: default_true(),
            open_browser: default_true(),
            copy_to_clipboard: default_true(),
            print_url: default_true(),
        }
    }
}

impl Settings {
    /// Copy of the settings that is safe to show on screen.
    pub fn redacted(&self) -> Self {
        Self {
            secret: "*".repeat(self.secret.len().min(8)),
            ..self.clone()
        }
    }
}

/// On-disk layout: everything lives under a single `[myazo]` table.
///
/// The table may also be spelled `[Myazo]`. Other tables and unknown keys
/// are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ConfigFile {
    #[serde(default, alias = "Myazo")]
    pub myazo: Settings,
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_upload_script() -> String {
    DEFAULT_UPLOAD_SCRIPT.to_string()
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}
