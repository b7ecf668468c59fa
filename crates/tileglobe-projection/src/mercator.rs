//! Web Mercator tile-coordinate conversions.
//!
//! Tile coordinates are evaluated as continuous values: a coordinate at zoom
//! `z` may exceed `2^z` (callers pass fine-grid indices), and the formulas
//! simply extrapolate. Longitude spans `[-180, 180]` over `x ∈ [0, 2^z]`;
//! latitude spans `[L, -L]` over `y ∈ [0, 2^z]` with `L` the Mercator bound.

use std::f64::consts::PI;

/// Northern latitude bound of the square Web Mercator tiling, in degrees.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.05112878;

/// Size of a map tile in pixels. The classic formulas are written in pixel
/// space, which is why `256` and `2^(zoom + 7)` appear together.
const TILE_SIZE_PX: f64 = 256.0;

/// `2^(zoom + 7)`: half the world width in pixels at `zoom`.
#[inline]
fn half_world_px(zoom: u8) -> f64 {
    2f64.powi(i32::from(zoom) + 7)
}

/// `atanh(sin(L))`: the Mercator `y` of the northern bound, close to `π`.
#[inline]
fn mercator_bound_y() -> f64 {
    (MERCATOR_MAX_LATITUDE.to_radians()).sin().atanh()
}

/// Longitude in degrees of the western edge of tile column `tile_x` at `zoom`.
///
/// `180 · (x · 256 / 2^(zoom+7) − 1)`.
#[inline]
#[must_use]
pub fn longitude(tile_x: u32, zoom: u8) -> f64 {
    180.0 * (f64::from(tile_x) * TILE_SIZE_PX / half_world_px(zoom) - 1.0)
}

/// Latitude in degrees of the northern edge of tile row `tile_y` at `zoom`.
///
/// Inverse Web Mercator:
/// `(180/π) · asin(tanh(−π · y · 256 / 2^(zoom+7) + atanh(sin(π·L/180))))`.
/// Row 0 sits exactly on [`MERCATOR_MAX_LATITUDE`].
#[inline]
#[must_use]
pub fn latitude(tile_y: u32, zoom: u8) -> f64 {
    let merc_y = -PI * f64::from(tile_y) * TILE_SIZE_PX / half_world_px(zoom) + mercator_bound_y();
    merc_y.tanh().asin().to_degrees()
}

/// Continuous tile column for a longitude in degrees. Inverse of [`longitude`].
#[inline]
#[must_use]
pub fn tile_x_from_longitude(lon: f64, zoom: u8) -> f64 {
    (lon / 180.0 + 1.0) * half_world_px(zoom) / TILE_SIZE_PX
}

/// Continuous tile row for a latitude in degrees. Inverse of [`latitude`].
///
/// Latitudes beyond the Mercator bound map outside `[0, 2^zoom]`.
#[inline]
#[must_use]
pub fn tile_y_from_latitude(lat: f64, zoom: u8) -> f64 {
    let merc_y = lat.to_radians().sin().atanh();
    (mercator_bound_y() - merc_y) * half_world_px(zoom) / (PI * TILE_SIZE_PX)
}
