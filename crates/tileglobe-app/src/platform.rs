//! OS-specific directories for configuration and logs.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while resolving platform directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    /// Directory creation failed.
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Directory layout following OS conventions (XDG on Linux, Known Folders on
/// Windows, Library on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Log files.
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "tileglobe";

impl PlatformDirs {
    /// Resolve directories without creating them.
    ///
    /// `config_override` replaces the OS config location; logs go to a
    /// `logs` directory beside it.
    ///
    /// # Errors
    ///
    /// [`PlatformError::NoConfigDir`] if there is no override and the OS
    /// does not expose a configuration directory.
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, PlatformError> {
        let app_dir = match config_override {
            Some(dir) => dir,
            None => dirs::config_dir()
                .ok_or(PlatformError::NoConfigDir)?
                .join(APP_NAME),
        };
        Ok(Self {
            log_dir: app_dir.join("logs"),
            config_dir: app_dir,
        })
    }

    /// Resolve directories and create them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if resolution or directory creation fails.
    pub fn resolve_and_create(config_override: Option<PathBuf>) -> Result<Self, PlatformError> {
        let dirs = Self::resolve(config_override)?;
        std::fs::create_dir_all(&dirs.config_dir)?;
        std::fs::create_dir_all(&dirs.log_dir)?;
        Ok(dirs)
    }
}
