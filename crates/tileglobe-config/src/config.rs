//! Globe, tile and debug settings, persisted as RON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Default XYZ endpoint: the OpenStreetMap standard tile layer.
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Every setting the globe builder reads.
///
/// All sections are `#[serde(default)]`: a file may omit any field, and
/// unknown fields are ignored so older binaries accept newer files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub globe: GlobeConfig,
    pub tiles: TileConfig,
    pub debug: DebugConfig,
}

/// Tessellation of the sphere.
///
/// The sphere gets `2^subdivision_exponent` vertex intervals per axis and is
/// split into `2^zoom × 2^zoom` patches, one map tile each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Fine subdivision exponent `k`.
    pub subdivision_exponent: u8,
    /// Patch-grid exponent `l`, which is also the tile zoom level.
    pub zoom: u8,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            subdivision_exponent: 6,
            zoom: 3,
        }
    }
}

/// Where tile images come from and how they are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// When false only the mesh is built.
    pub enabled: bool,
    /// XYZ URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// HTTP user agent. Public tile servers require an identifying one.
    pub user_agent: String,
    /// Concurrent fetch workers; `0` means one per CPU.
    pub worker_count: usize,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Overall time allowed for fetching every tile, in seconds.
    pub total_timeout_seconds: u64,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: DEFAULT_TILE_URL.to_owned(),
            user_agent: concat!("tileglobe/", env!("CARGO_PKG_VERSION")).to_owned(),
            worker_count: 4,
            timeout_seconds: 30,
            total_timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// `EnvFilter` directive, e.g. `"debug"` or `"info,tileglobe_tiles=trace"`.
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Path of the config file inside `config_dir`.
    #[must_use]
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// I/O failures and malformed RON. The loaded values are not validated;
    /// call [`Config::validate`] after applying CLI overrides.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(config_dir);
        if !path.exists() {
            let config = Self::default();
            config.save(config_dir)?;
            log::info!("wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read(&path)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// I/O failures, or a value RON cannot represent.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(config_dir);
        fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .struct_names(false)
            .indentor("  ".to_owned());
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        fs::write(&path, text).map_err(|source| ConfigError::Write { path, source })
    }

    /// Re-read the file; `Some` only if its contents differ from `self`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load_or_create`], except a missing file is an error.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&Self::path_in(config_dir))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("config changed on disk");
        Ok(Some(fresh))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let globe = &self.globe;
        if globe.zoom > globe.subdivision_exponent {
            return Err(ConfigError::Invalid(format!(
                "globe.zoom ({}) must not exceed globe.subdivision_exponent ({})",
                globe.zoom, globe.subdivision_exponent
            )));
        }
        if self.tiles.enabled {
            if self.tiles.timeout_seconds == 0 || self.tiles.total_timeout_seconds == 0 {
                return Err(ConfigError::Invalid(
                    "tile timeouts must be at least one second".to_owned(),
                ));
            }
            if self.tiles.user_agent.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "tiles.user_agent must not be empty".to_owned(),
                ));
            }
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
