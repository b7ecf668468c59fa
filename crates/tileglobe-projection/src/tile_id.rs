//! Slippy-map tile addresses.

use std::fmt;

use crate::error::TileError;
use crate::geo_point::GeoPoint;

/// Address of one square map tile in the XYZ scheme.
///
/// At zoom `z` the world is a `2^z × 2^z` grid; `x` grows eastward from the
/// antimeridian and `y` grows southward from the northern Mercator bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    /// Zoom level.
    pub zoom: u8,
    /// Column, `0..2^zoom`.
    pub x: u32,
    /// Row, `0..2^zoom`.
    pub y: u32,
}

impl TileId {
    /// Highest zoom level that can be addressed with `u32` columns.
    pub const MAX_ZOOM: u8 = 30;

    /// Construct a tile address, checking `x` and `y` against the grid size.
    ///
    /// # Errors
    ///
    /// [`TileError::ZoomTooLarge`] if `zoom > MAX_ZOOM`,
    /// [`TileError::OutOfRange`] if either coordinate is outside `[0, 2^zoom)`.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, TileError> {
        let size = Self::tiles_per_axis(zoom)?;
        if x >= size || y >= size {
            return Err(TileError::OutOfRange { zoom, x, y, size });
        }
        Ok(Self { zoom, x, y })
    }

    /// Number of tiles along one axis at `zoom`.
    ///
    /// # Errors
    ///
    /// [`TileError::ZoomTooLarge`] if `zoom > MAX_ZOOM`.
    pub fn tiles_per_axis(zoom: u8) -> Result<u32, TileError> {
        if zoom > Self::MAX_ZOOM {
            return Err(TileError::ZoomTooLarge {
                zoom,
                max: Self::MAX_ZOOM,
            });
        }
        Ok(1u32 << zoom)
    }

    /// Row-major position of this tile in its zoom level: `y · 2^zoom + x`.
    ///
    /// Total for any field values; only addresses from [`TileId::new`] are
    /// guaranteed to map to distinct indices.
    #[must_use]
    pub fn row_major_index(&self) -> u64 {
        let size = 1u64.checked_shl(u32::from(self.zoom)).unwrap_or(0);
        u64::from(self.y).wrapping_mul(size).wrapping_add(u64::from(self.x))
    }

    /// Inverse of [`row_major_index`](Self::row_major_index).
    ///
    /// # Errors
    ///
    /// Same as [`TileId::new`] when the index is past the last tile.
    pub fn from_row_major_index(zoom: u8, index: u64) -> Result<Self, TileError> {
        let size = u64::from(Self::tiles_per_axis(zoom)?);
        let x = u32::try_from(index % size).unwrap_or(u32::MAX);
        let y = u32::try_from(index / size).unwrap_or(u32::MAX);
        Self::new(zoom, x, y)
    }

    /// Geographic north-west corner.
    #[must_use]
    pub fn north_west(&self) -> GeoPoint {
        GeoPoint::from_tile(self.x, self.y, self.zoom)
    }

    /// Geographic south-east corner.
    #[must_use]
    pub fn south_east(&self) -> GeoPoint {
        GeoPoint::from_tile(self.x + 1, self.y + 1, self.zoom)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
