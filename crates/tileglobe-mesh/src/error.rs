//! Mesh construction and validation errors.

use tileglobe_projection::TileId;

/// Errors raised by [`crate::SubdivisionConfig`] and mesh validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The patch grid is finer than the vertex grid.
    #[error("patch exponent l={patch} exceeds subdivision exponent k={subdivision}")]
    PatchExponentExceedsSubdivision { subdivision: u8, patch: u8 },

    /// The vertex grid would overflow 32-bit indices.
    #[error("subdivision exponent k={subdivision} exceeds maximum {max}")]
    SubdivisionTooLarge { subdivision: u8, max: u8 },

    /// A triangle's normal points toward the sphere centre.
    #[error("triangle {triangle} of patch {tile} faces inward")]
    InwardTriangle { tile: TileId, triangle: usize },
}
