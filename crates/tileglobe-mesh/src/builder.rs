//! Builds the full globe: vertex positions, UVs and one index list per tile.

use std::ops::Range;

use glam::Vec3;
use tileglobe_projection::{TileId, geo_to_cartesian, latitude, longitude};

use crate::error::MeshError;
use crate::gpu_vertex::GlobeVertex;
use crate::subdivision::SubdivisionConfig;
use crate::triangulation::{generate_patch_indices, vertex_index};
use crate::winding::{TriangleOrientation, classify_triangle};

/// Geometry for one map tile.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchMesh {
    /// The tile whose image textures this patch.
    pub tile: TileId,
    /// This patch's own slice of the shared vertex buffer.
    pub vertex_range: Range<u32>,
    /// Triangle list into the shared vertex buffer, all within `vertex_range`.
    pub indices: Vec<u32>,
}

impl PatchMesh {
    /// Submesh / material slot of this patch: `y · 2^l + x`.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.tile.row_major_index() as usize
    }
}

/// The complete tile-partitioned globe.
///
/// `positions` and `uvs` are co-indexed; `patches` are in row-major tile
/// order, so `patches[i].slot() == i`. Built once by [`build_globe_mesh`] and
/// read-only afterwards.
#[derive(Clone, Debug)]
pub struct GlobeMesh {
    config: SubdivisionConfig,
    positions: Vec<Vec3>,
    uvs: Vec<[f32; 2]>,
    patches: Vec<PatchMesh>,
}

/// Generate the globe for `config`.
///
/// For every patch `(x, y)` and local point `(xx, yy)` in `0..=m`, the vertex
/// sits at fine-grid tile coordinate `(x·m + xx, y·m + yy)` evaluated at zoom
/// `k`, and gets UV `(xx/m, (m − yy)/m)` so image row 0 lands on the northern
/// edge of the patch.
#[must_use]
pub fn build_globe_mesh(config: &SubdivisionConfig) -> GlobeMesh {
    let k = config.subdivision_exponent();
    let l = config.patch_exponent();
    let m = config.cells_per_patch_axis();
    let per_axis = config.patches_per_axis();
    let total = config.total_vertex_count() as usize;

    let mut positions = Vec::with_capacity(total);
    let mut uvs = Vec::with_capacity(total);

    for y in 0..per_axis {
        for x in 0..per_axis {
            for yy in 0..=m {
                let lat = latitude(y * m + yy, k);
                let v = (m - yy) as f32 / m as f32;
                for xx in 0..=m {
                    let lon = longitude(x * m + xx, k);
                    positions.push(geo_to_cartesian(lat, lon).as_vec3());
                    uvs.push([xx as f32 / m as f32, v]);
                }
            }
        }
    }
    debug_assert_eq!(positions.len(), total);

    let per_patch = config.vertices_per_patch();
    let mut patches = Vec::with_capacity(config.patch_count() as usize);
    for y in 0..per_axis {
        for x in 0..per_axis {
            let base = vertex_index(config, x, y, 0, 0);
            patches.push(PatchMesh {
                tile: TileId { zoom: l, x, y },
                vertex_range: base..base + per_patch,
                indices: generate_patch_indices(config, x, y),
            });
        }
    }

    tracing::debug!(
        k,
        l,
        vertices = positions.len(),
        patches = patches.len(),
        "built globe mesh"
    );

    GlobeMesh {
        config: *config,
        positions,
        uvs,
        patches,
    }
}

impl GlobeMesh {
    #[must_use]
    pub fn config(&self) -> &SubdivisionConfig {
        &self.config
    }

    /// Unit-sphere vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Texture coordinates, one per position.
    #[must_use]
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Per-tile geometry in row-major slot order.
    #[must_use]
    pub fn patches(&self) -> &[PatchMesh] {
        &self.patches
    }

    /// Patch at grid position `(x, y)`, if inside the grid.
    #[must_use]
    pub fn patch(&self, x: u32, y: u32) -> Option<&PatchMesh> {
        let per_axis = self.config.patches_per_axis();
        if x >= per_axis || y >= per_axis {
            return None;
        }
        self.patches.get((y * per_axis + x) as usize)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.patches.iter().map(|p| p.indices.len() / 3).sum()
    }

    /// `(slot, tile)` pairs: the texture each material slot must receive.
    pub fn tile_assignments(&self) -> impl Iterator<Item = (usize, TileId)> + '_ {
        self.patches.iter().map(|p| (p.slot(), p.tile))
    }

    /// Interleave positions and UVs for GPU upload. Indices are unchanged.
    #[must_use]
    pub fn to_gpu_vertices(&self) -> Vec<GlobeVertex> {
        self.positions
            .iter()
            .zip(&self.uvs)
            .map(|(p, uv)| GlobeVertex::new(p.to_array(), *uv))
            .collect()
    }

    /// Check every triangle faces away from the sphere centre.
    ///
    /// Degenerate triangles (zero area, or edge-on on very coarse grids) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// [`MeshError::InwardTriangle`] for the first inward-facing triangle.
    pub fn validate_winding(&self) -> Result<(), MeshError> {
        for patch in &self.patches {
            for (triangle, tri) in patch.indices.chunks_exact(3).enumerate() {
                let [v0, v1, v2] =
                    [tri[0], tri[1], tri[2]].map(|i| self.positions[i as usize].as_dvec3());
                if classify_triangle(v0, v1, v2) == TriangleOrientation::Inward {
                    return Err(MeshError::InwardTriangle {
                        tile: patch.tile,
                        triangle,
                    });
                }
            }
        }
        Ok(())
    }
}
