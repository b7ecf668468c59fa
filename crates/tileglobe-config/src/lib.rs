//! Configuration for the tile globe.
//!
//! Settings persist to disk as `config.ron`, tolerate missing and unknown
//! fields, and can be overridden from the command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_TILE_URL, DebugConfig, GlobeConfig, TileConfig};
pub use error::ConfigError;
