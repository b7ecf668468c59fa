//! Geographic points and their placement on the unit sphere.

use glam::DVec3;

use crate::mercator::{latitude, longitude};

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The north-west corner of tile `(tile_x, tile_y)` at `zoom`.
    ///
    /// Coordinates are continuous, so fine-grid indices larger than `2^zoom`
    /// are accepted.
    #[must_use]
    pub fn from_tile(tile_x: u32, tile_y: u32, zoom: u8) -> Self {
        Self {
            lat: latitude(tile_y, zoom),
            lon: longitude(tile_x, zoom),
        }
    }

    /// Project onto the unit sphere. See [`geo_to_cartesian`].
    #[inline]
    #[must_use]
    pub fn to_cartesian(self) -> DVec3 {
        geo_to_cartesian(self.lat, self.lon)
    }
}

/// Convert latitude/longitude in degrees to a point on the unit sphere.
///
/// Y is the polar axis (north up); longitude 0 lies on +X and longitude +90°
/// on +Z.
#[inline]
#[must_use]
pub fn geo_to_cartesian(lat: f64, lon: f64) -> DVec3 {
    let lat = lat.to_radians();
    let lon = lon.to_radians();
    DVec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
}
