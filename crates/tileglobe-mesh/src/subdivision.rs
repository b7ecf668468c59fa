//! Validated subdivision parameters.

use crate::error::MeshError;

/// How finely the globe is tessellated and how it is split into tiles.
///
/// The sphere has `2^k` vertex intervals per axis and is partitioned into
/// `2^l × 2^l` patches, one per map tile at zoom `l`. Each patch therefore
/// spans `m = 2^(k−l)` cells per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubdivisionConfig {
    k: u8,
    l: u8,
}

impl SubdivisionConfig {
    /// Largest `k` for which every vertex index fits in a `u32`.
    ///
    /// The worst case is `l = k`, holding `4 · 2^(2k)` vertices.
    pub const MAX_SUBDIVISION_EXPONENT: u8 = 14;

    /// Validate and construct.
    ///
    /// # Errors
    ///
    /// [`MeshError::PatchExponentExceedsSubdivision`] if `l > k`,
    /// [`MeshError::SubdivisionTooLarge`] if `k` exceeds
    /// [`Self::MAX_SUBDIVISION_EXPONENT`].
    pub fn new(k: u8, l: u8) -> Result<Self, MeshError> {
        if k > Self::MAX_SUBDIVISION_EXPONENT {
            return Err(MeshError::SubdivisionTooLarge {
                subdivision: k,
                max: Self::MAX_SUBDIVISION_EXPONENT,
            });
        }
        if l > k {
            return Err(MeshError::PatchExponentExceedsSubdivision {
                subdivision: k,
                patch: l,
            });
        }
        Ok(Self { k, l })
    }

    /// `k`: exponent of the fine vertex grid.
    #[must_use]
    pub fn subdivision_exponent(&self) -> u8 {
        self.k
    }

    /// `l`: exponent of the patch grid, which is also the tile zoom level.
    #[must_use]
    pub fn patch_exponent(&self) -> u8 {
        self.l
    }

    /// `2^k`.
    #[must_use]
    pub fn cells_per_axis(&self) -> u32 {
        1 << self.k
    }

    /// `2^l`.
    #[must_use]
    pub fn patches_per_axis(&self) -> u32 {
        1 << self.l
    }

    /// `2^l · 2^l`.
    #[must_use]
    pub fn patch_count(&self) -> u32 {
        self.patches_per_axis() * self.patches_per_axis()
    }

    /// `m = 2^k / 2^l`.
    #[must_use]
    pub fn cells_per_patch_axis(&self) -> u32 {
        1 << (self.k - self.l)
    }

    /// `(m + 1)²`. Seam vertices are duplicated per patch.
    #[must_use]
    pub fn vertices_per_patch(&self) -> u32 {
        let side = self.cells_per_patch_axis() + 1;
        side * side
    }

    /// `6 · m²`.
    #[must_use]
    pub fn indices_per_patch(&self) -> u32 {
        let m = self.cells_per_patch_axis();
        6 * m * m
    }

    #[must_use]
    pub fn total_vertex_count(&self) -> u32 {
        self.patch_count() * self.vertices_per_patch()
    }
}

impl Default for SubdivisionConfig {
    fn default() -> Self {
        Self { k: 6, l: 3 }
    }
}
