//! Configuration file support for myazo.
//!
//! Settings are read from `~/.config/myazo/config.toml` (or the platform
//! equivalent returned by [`dirs::config_dir`]). The file is optional: when it
//! does not exist the built-in defaults are used. Keys that are present
//! override the matching default individually; unknown keys are ignored.

pub mod types;

pub use types::Settings;

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while locating, reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("Failed to read config from {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write config to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl Settings {
    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("myazo");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads settings from the default config path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads settings from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or does not parse.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if let Some(legacy) = legacy_config_beside(config_path) {
            warn!(
                "Ignoring {}: settings are read from {} (TOML)",
                legacy.display(),
                config_path.display()
            );
        }

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;

        let settings = Self::parse(&config_str).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;

        info!("Loaded config from {}", config_path.display());
        debug!("Settings: {:?}", settings.redacted());

        Ok(settings)
    }

    /// Parses the contents of a config file.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let file: types::ConfigFile = toml::from_str(contents)?;
        Ok(file.myazo)
    }

    /// Renders the settings as a config file, with the secret masked.
    pub fn to_display_toml(&self) -> Result<String, ConfigError> {
        let file = types::ConfigFile {
            myazo: self.redacted(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Writes the documented example config to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a file already exists at the target path or if
    /// the directory or file cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<(), ConfigError> {
        if config_path.exists() {
            return Err(ConfigError::AlreadyExists(config_path.to_path_buf()));
        }

        let write_err = |source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        fs::write(config_path, EXAMPLE_CONFIG).map_err(write_err)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }
}

/// File name of the INI config read by older releases.
pub const LEGACY_CONFIG_FILE: &str = "config.ini";

/// Returns the legacy INI config in the same directory as `config_path`, if
/// one exists.
pub fn legacy_config_beside(config_path: &Path) -> Option<PathBuf> {
    let legacy = config_path.parent()?.join(LEGACY_CONFIG_FILE);
    (legacy != config_path && legacy.is_file()).then_some(legacy)
}

/// Commented example config shipped with the binary.
pub const EXAMPLE_CONFIG: &str = include_str!("../../config.example.toml");
