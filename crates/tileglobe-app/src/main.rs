//! Headless tile globe driver.
//!
//! Builds the tile-partitioned globe mesh from `config.ron` (overridable via
//! CLI flags), checks its winding, then fetches one map tile per patch into
//! the texture slots a renderer would bind.
//!
//! Run with `cargo run -p tileglobe-app -- --subdivision 6 --zoom 3`.
//! Run with `cargo run -p tileglobe-app -- --offline` to skip tile fetching.

mod platform;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tileglobe_config::{CliArgs, Config, ConfigError, TileConfig};
use tileglobe_log::init_logging;
use tileglobe_mesh::{GlobeMesh, MeshError, SubdivisionConfig, build_globe_mesh};
use tileglobe_projection::TileId;
use tileglobe_tiles::{
    HttpTileSource, OSM_ATTRIBUTION_TEXT, OSM_ATTRIBUTION_URL, SlotState, TextureSlots,
    TileFetchError, TileFetchPool, TileRequest, TileUrlTemplate,
};
use tracing::{info, warn};

use crate::platform::{PlatformDirs, PlatformError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid globe configuration: {0}")]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Tiles(#[from] TileFetchError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tileglobe: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = PlatformDirs::resolve_and_create(args.config.clone())?;
    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;
    init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "configuration loaded");

    let subdivision =
        SubdivisionConfig::new(config.globe.subdivision_exponent, config.globe.zoom)?;
    let started = Instant::now();
    let mesh = build_globe_mesh(&subdivision);
    mesh.validate_winding()?;
    info!(
        k = subdivision.subdivision_exponent(),
        zoom = subdivision.patch_exponent(),
        patches = mesh.patches().len(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "globe mesh ready"
    );

    let mut slots = TextureSlots::for_mesh(&mesh);
    if !config.tiles.enabled {
        info!("tile fetching disabled; patches stay untextured");
        return Ok(());
    }

    fetch_tiles(&mesh, &config.tiles, &mut slots)?;
    let summary = FetchSummary::from_slots(&slots);
    println!("{summary}");
    for tile in &summary.failed {
        println!("  missing {tile}");
    }
    Ok(())
}

fn fetch_tiles(
    mesh: &GlobeMesh,
    tiles: &TileConfig,
    slots: &mut TextureSlots,
) -> Result<(), AppError> {
    let template = TileUrlTemplate::parse(&tiles.url_template)?;
    if template.as_str().contains("openstreetmap.org") {
        info!("map data {OSM_ATTRIBUTION_TEXT} ({OSM_ATTRIBUTION_URL})");
    }

    let source = Arc::new(HttpTileSource::new(
        template,
        &tiles.user_agent,
        Duration::from_secs(tiles.timeout_seconds),
    ));
    let workers = match tiles.worker_count {
        0 => num_cpus::get(),
        n => n,
    };
    let pool = TileFetchPool::new(source, workers, workers * 2);

    let requests = TileRequest::for_mesh(mesh);
    let started = Instant::now();
    let bound = pool.fetch_into(
        &requests,
        slots,
        Duration::from_secs(tiles.total_timeout_seconds),
    );
    if bound < requests.len() {
        warn!(bound, requested = requests.len(), "not every tile was fetched");
    }
    info!(
        bound,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tile fetch finished"
    );
    Ok(())
}

/// Outcome of a fetch run, per slot state.
#[derive(Debug, PartialEq)]
struct FetchSummary {
    ready: usize,
    pending: usize,
    failed: Vec<TileId>,
}

impl FetchSummary {
    fn from_slots(slots: &TextureSlots) -> Self {
        let failed = (0..slots.len())
            .filter(|&slot| matches!(slots.get(slot), Some(SlotState::Failed(_))))
            .filter_map(|slot| TileId::from_row_major_index(slots.zoom(), slot as u64).ok())
            .collect();
        Self {
            ready: slots.ready_count(),
            pending: slots.pending_count(),
            failed,
        }
    }
}

impl std::fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tiles: {} ready, {} failed, {} pending",
            self.ready,
            self.failed.len(),
            self.pending
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileglobe_tiles::TileTexture;

    #[test]
    fn test_summary_lists_failed_tiles() {
        let mut slots = TextureSlots::new(1).unwrap();
        let ok = TileId::new(1, 0, 0).unwrap();
        let bad = TileId::new(1, 1, 1).unwrap();
        slots.bind(ok, Ok(TileTexture::solid(2, [0; 4])));
        slots.bind(bad, Err(TileFetchError::Status { tile: bad, code: 500 }));

        let summary = FetchSummary::from_slots(&slots);
        assert_eq!(summary.ready, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.failed, vec![bad]);
        assert_eq!(summary.to_string(), "tiles: 1 ready, 1 failed, 2 pending");
    }

    #[test]
    fn test_invalid_globe_config_is_reported() {
        let err = AppError::from(SubdivisionConfig::new(2, 4).unwrap_err());
        assert_eq!(
            err.to_string(),
            "invalid globe configuration: patch exponent l=4 exceeds subdivision exponent k=2"
        );
    }
}
