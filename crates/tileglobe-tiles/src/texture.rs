//! Decoded tile images and the per-patch texture slots they are bound to.

use image::RgbaImage;
use tileglobe_mesh::GlobeMesh;
use tileglobe_projection::{TileError, TileId};

use crate::error::TileFetchError;

/// A decoded, square RGBA8 tile image.
#[derive(Clone, Debug, PartialEq)]
pub struct TileTexture {
    image: RgbaImage,
}

impl TileTexture {
    /// A solid-colour square texture, for patches whose tile never arrived.
    #[must_use]
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(size, size, image::Rgba(rgba)),
        }
    }

    /// Edge length in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Tightly packed RGBA8 rows, top row first.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Decode an encoded tile image into RGBA8.
///
/// # Errors
///
/// [`TileFetchError::Decode`] for unreadable data and
/// [`TileFetchError::NotSquare`] for non-square images.
pub fn decode_tile(tile: TileId, bytes: &[u8]) -> Result<TileTexture, TileFetchError> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| TileFetchError::Decode { tile, source })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    if width != height {
        return Err(TileFetchError::NotSquare {
            tile,
            width,
            height,
        });
    }
    Ok(TileTexture { image })
}

/// Binding state of one patch's texture.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotState {
    /// Not fetched yet.
    Pending,
    /// Image bound.
    Ready(TileTexture),
    /// Fetch or decode failed; the patch stays untextured.
    Failed(String),
}

/// One texture slot per globe patch, in the same row-major order as the
/// mesh's patches (`slot = y · 2^zoom + x`).
#[derive(Debug)]
pub struct TextureSlots {
    zoom: u8,
    slots: Vec<SlotState>,
}

impl TextureSlots {
    /// Pending slots for every tile at `zoom`.
    ///
    /// # Errors
    ///
    /// [`TileError::ZoomTooLarge`] if `zoom` exceeds [`TileId::MAX_ZOOM`].
    pub fn new(zoom: u8) -> Result<Self, TileError> {
        let per_axis = TileId::tiles_per_axis(zoom)? as usize;
        Ok(Self::with_len(zoom, per_axis * per_axis))
    }

    /// Slots matching `mesh`'s patch grid.
    #[must_use]
    pub fn for_mesh(mesh: &GlobeMesh) -> Self {
        let config = mesh.config();
        Self::with_len(config.patch_exponent(), config.patch_count() as usize)
    }

    fn with_len(zoom: u8, len: usize) -> Self {
        Self {
            zoom,
            slots: vec![SlotState::Pending; len],
        }
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&SlotState> {
        self.slots.get(slot)
    }

    /// The texture bound to `slot`, if any.
    #[must_use]
    pub fn texture(&self, slot: usize) -> Option<&TileTexture> {
        match self.slots.get(slot) {
            Some(SlotState::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    /// The texture bound to `slot`, or `fallback` when it is missing.
    #[must_use]
    pub fn texture_or<'a>(&'a self, slot: usize, fallback: &'a TileTexture) -> &'a TileTexture {
        self.texture(slot).unwrap_or(fallback)
    }

    /// Record the outcome for `tile`. Only that tile's own slot is written.
    ///
    /// Returns `false` (and changes nothing) if the tile does not belong to
    /// this slot grid.
    pub fn bind(&mut self, tile: TileId, outcome: Result<TileTexture, TileFetchError>) -> bool {
        if tile.zoom != self.zoom {
            return false;
        }
        let Some(slot) = self.slots.get_mut(tile.row_major_index() as usize) else {
            return false;
        };
        *slot = match outcome {
            Ok(texture) => SlotState::Ready(texture),
            Err(err) => {
                tracing::warn!(%tile, error = %err, "tile unavailable, patch left untextured");
                SlotState::Failed(err.to_string())
            }
        };
        true
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.count(|s| matches!(s, SlotState::Pending))
    }

    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.count(|s| matches!(s, SlotState::Ready(_)))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, SlotState::Failed(_)))
    }

    /// Every slot has either a texture or a recorded failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending_count() == 0
    }

    fn count(&self, pred: impl Fn(&SlotState) -> bool) -> usize {
        self.slots.iter().filter(|s| pred(s)).count()
    }
}
