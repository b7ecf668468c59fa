//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tile globe command-line arguments.
///
/// Every flag is optional; a flag that is given wins over `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tileglobe", about = "Build a map-tile textured globe mesh")]
pub struct CliArgs {
    /// Fine subdivision exponent k (2^k vertex intervals per axis).
    #[arg(long)]
    pub subdivision: Option<u8>,

    /// Tile zoom level l (2^l × 2^l patches); must not exceed k.
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Tile URL template with {z}, {x} and {y} placeholders.
    #[arg(long)]
    pub tile_url: Option<String>,

    /// Number of concurrent tile fetch workers.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Build the mesh only; do not fetch tiles.
    #[arg(long)]
    pub offline: bool,

    /// Tracing filter, e.g. `debug` or `info,tileglobe_tiles=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding `config.ron` instead of the OS config location.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Replace every setting for which `args` carries a value.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(k) = args.subdivision {
            self.globe.subdivision_exponent = k;
        }
        if let Some(l) = args.zoom {
            self.globe.zoom = l;
        }
        if let Some(ref url) = args.tile_url {
            self.tiles.url_template = url.clone();
        }
        if let Some(workers) = args.workers {
            self.tiles.worker_count = workers;
        }
        if args.offline {
            self.tiles.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
