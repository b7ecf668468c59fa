//! Global vertex indexing and per-patch triangle generation.
//!
//! Vertices are laid out patch by patch (row-major, `y` outer), and inside a
//! patch point by point (row-major, `yy` outer). Both the vertex builder and
//! the triangulation go through [`vertex_index`] so the two stay co-indexed.

use crate::subdivision::SubdivisionConfig;

/// Global index of local grid point `(xx, yy)` of patch `(patch_x, patch_y)`:
///
/// ```text
/// (patch_y · 2^l + patch_x) · (m+1)² + yy · (m+1) + xx
/// ```
#[inline]
#[must_use]
pub fn vertex_index(
    config: &SubdivisionConfig,
    patch_x: u32,
    patch_y: u32,
    xx: u32,
    yy: u32,
) -> u32 {
    let m = config.cells_per_patch_axis();
    debug_assert!(xx <= m && yy <= m, "local point ({xx}, {yy}) outside 0..={m}");
    let patch = patch_y * config.patches_per_axis() + patch_x;
    patch * config.vertices_per_patch() + yy * (m + 1) + xx
}

/// Triangle indices for one patch, two triangles per cell.
///
/// For cell `(xx, yy)` the upper-left triangle is
/// `(yy,xx) (yy,xx+1) (yy+1,xx)` and the lower-right one is
/// `(yy,xx+1) (yy+1,xx+1) (yy+1,xx)`. With `xx` running east and `yy`
/// running south this winds counter-clockwise seen from outside the sphere.
#[must_use]
pub fn generate_patch_indices(config: &SubdivisionConfig, patch_x: u32, patch_y: u32) -> Vec<u32> {
    let m = config.cells_per_patch_axis();
    let mut indices = Vec::with_capacity(config.indices_per_patch() as usize);

    for yy in 0..m {
        for xx in 0..m {
            let i00 = vertex_index(config, patch_x, patch_y, xx, yy);
            let i10 = vertex_index(config, patch_x, patch_y, xx + 1, yy);
            let i01 = vertex_index(config, patch_x, patch_y, xx, yy + 1);
            let i11 = vertex_index(config, patch_x, patch_y, xx + 1, yy + 1);

            indices.extend_from_slice(&[i00, i10, i01]);
            indices.extend_from_slice(&[i10, i11, i01]);
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_index_k2_l1() {
        let config = SubdivisionConfig::new(2, 1).unwrap();
        assert_eq!(vertex_index(&config, 1, 0, 2, 0), 11);
        assert_eq!(vertex_index(&config, 0, 0, 0, 0), 0);
        assert_eq!(vertex_index(&config, 0, 1, 0, 0), 18);
        assert_eq!(vertex_index(&config, 1, 1, 2, 2), 35);
    }

    #[test]
    fn test_index_count_per_patch() {
        for (k, l) in [(0, 0), (2, 1), (4, 2), (6, 3), (5, 5)] {
            let config = SubdivisionConfig::new(k, l).unwrap();
            let m = config.cells_per_patch_axis();
            let indices = generate_patch_indices(&config, 0, 0);
            assert_eq!(indices.len() as u32, 6 * m * m, "k={k} l={l}");
            assert_eq!(indices.len() % 3, 0);
        }
    }

    #[test]
    fn test_indices_stay_within_patch_range() {
        let config = SubdivisionConfig::new(4, 2).unwrap();
        let per_patch = config.vertices_per_patch();
        for y in 0..config.patches_per_axis() {
            for x in 0..config.patches_per_axis() {
                let base = vertex_index(&config, x, y, 0, 0);
                assert_eq!(base, (y * config.patches_per_axis() + x) * per_patch);
                for idx in generate_patch_indices(&config, x, y) {
                    assert!(
                        (base..base + per_patch).contains(&idx),
                        "index {idx} escapes patch ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_first_cell_order() {
        let config = SubdivisionConfig::new(2, 1).unwrap();
        let indices = generate_patch_indices(&config, 1, 0);
        // Patch (1,0) starts at 9; row stride is 3.
        assert_eq!(&indices[..6], &[9, 10, 12, 10, 13, 12]);
    }

    #[test]
    fn test_single_cell_patch() {
        let config = SubdivisionConfig::new(0, 0).unwrap();
        assert_eq!(generate_patch_indices(&config, 0, 0), vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_every_patch_vertex_is_referenced() {
        let config = SubdivisionConfig::new(3, 1).unwrap();
        let indices = generate_patch_indices(&config, 1, 1);
        let base = vertex_index(&config, 1, 1, 0, 0);
        let mut seen = vec![false; config.vertices_per_patch() as usize];
        for idx in indices {
            seen[(idx - base) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
