//! XYZ tile URL templates and the attribution that goes with them.

use tileglobe_projection::TileId;

use crate::error::TileFetchError;

/// Standard OpenStreetMap raster tiles.
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Where OpenStreetMap's copyright and license terms live. Any view of OSM
/// tiles must credit this.
pub const OSM_ATTRIBUTION_URL: &str = "https://www.openstreetmap.org/copyright";

/// Short credit line for OpenStreetMap tiles.
pub const OSM_ATTRIBUTION_TEXT: &str = "© OpenStreetMap contributors";

const PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// A tile server URL with `{z}`, `{x}` and `{y}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileUrlTemplate {
    template: String,
}

impl TileUrlTemplate {
    /// Parse a template, requiring all three placeholders.
    ///
    /// # Errors
    ///
    /// [`TileFetchError::InvalidTemplate`] naming the first missing placeholder.
    pub fn parse(template: &str) -> Result<Self, TileFetchError> {
        if let Some(missing) = PLACEHOLDERS.iter().find(|p| !template.contains(**p)) {
            return Err(TileFetchError::InvalidTemplate {
                template: template.to_string(),
                placeholder: *missing,
            });
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    /// URL of `tile`.
    #[must_use]
    pub fn url(&self, tile: TileId) -> String {
        self.template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for TileUrlTemplate {
    fn default() -> Self {
        Self {
            template: OSM_TILE_URL.to_string(),
        }
    }
}
