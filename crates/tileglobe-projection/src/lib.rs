//! Slippy-map tile math: tile indices to Web Mercator latitude/longitude and
//! on to points on the unit sphere.

mod error;
mod geo_point;
mod mercator;
mod tile_id;

pub use error::TileError;
pub use geo_point::{GeoPoint, geo_to_cartesian};
pub use mercator::{
    MERCATOR_MAX_LATITUDE, latitude, longitude, tile_x_from_longitude, tile_y_from_latitude,
};
pub use tile_id::TileId;
