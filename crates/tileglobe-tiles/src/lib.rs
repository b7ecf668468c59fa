//! Tile image boundary: which tile each globe patch shows, how tile images
//! are fetched and decoded, and where the results are stored.
//!
//! Every patch owns exactly one slot in [`TextureSlots`];
//! fetches run concurrently on a [`TileFetchPool`] and each result only ever
//! touches its own slot.

mod error;
mod fetch_pool;
mod source;
mod template;
mod texture;

pub use error::TileFetchError;
pub use fetch_pool::{TileFetchPool, TileFetchResult, TileRequest};
pub use source::{HttpTileSource, TileSource};
pub use template::{OSM_ATTRIBUTION_TEXT, OSM_ATTRIBUTION_URL, OSM_TILE_URL, TileUrlTemplate};
pub use texture::{SlotState, TextureSlots, TileTexture, decode_tile};
