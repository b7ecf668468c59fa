//! Tile retrieval and decoding errors.

use tileglobe_projection::TileId;

/// Errors from fetching or decoding a tile image.
///
/// A failed tile only affects its own patch; the globe still renders.
#[derive(Debug, thiserror::Error)]
pub enum TileFetchError {
    /// URL template lacks a required placeholder.
    #[error("tile URL template {template:?} is missing the {placeholder} placeholder")]
    InvalidTemplate {
        template: String,
        placeholder: &'static str,
    },

    /// The tile server answered with a non-success status.
    #[error("tile {tile}: server returned HTTP {code}")]
    Status { tile: TileId, code: u16 },

    /// Connection, DNS, TLS or timeout failure.
    #[error("tile {tile}: transport error: {message}")]
    Transport { tile: TileId, message: String },

    /// Reading the response body failed.
    #[error("tile {tile}: failed to read response body: {source}")]
    Io {
        tile: TileId,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not a decodable image.
    #[error("tile {tile}: failed to decode image: {source}")]
    Decode {
        tile: TileId,
        #[source]
        source: image::ImageError,
    },

    /// Tile images must be square to map onto a patch without distortion.
    #[error("tile {tile}: image is {width}x{height}, expected a square")]
    NotSquare { tile: TileId, width: u32, height: u32 },
}
