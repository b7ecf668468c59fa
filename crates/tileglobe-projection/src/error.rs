//! Tile addressing errors.

/// Errors produced when constructing a [`crate::TileId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    /// Zoom level beyond what the addressing scheme supports.
    #[error("zoom level {zoom} exceeds maximum {max}")]
    ZoomTooLarge { zoom: u8, max: u8 },

    /// Tile column or row outside `[0, 2^zoom)`.
    #[error("tile ({x}, {y}) out of range for zoom {zoom} ({size} tiles per axis)")]
    OutOfRange { zoom: u8, x: u32, y: u32, size: u32 },
}
