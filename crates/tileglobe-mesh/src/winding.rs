//! Winding order checks for globe triangles.
//!
//! Front faces are counter-clockwise in a right-handed frame, so a triangle is
//! correct when its cross-product normal points away from the sphere centre.

use glam::DVec3;

/// Orientation of a triangle relative to the sphere centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangleOrientation {
    /// Normal points away from the centre.
    Outward,
    /// Normal points toward the centre.
    Inward,
    /// Zero area, or its plane passes through the centre so the normal is
    /// tangential. Happens on very coarse grids where a cell spans 180° of
    /// longitude, and where two corners land on the same antimeridian point.
    Degenerate,
}

/// Relative tolerance under which a normal is treated as tangential.
const TANGENTIAL_TOLERANCE: f64 = 1e-9;

/// Classify a triangle by the direction of `(v1 − v0) × (v2 − v0)` against
/// its centroid.
#[must_use]
pub fn classify_triangle(v0: DVec3, v1: DVec3, v2: DVec3) -> TriangleOrientation {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let face_normal = edge1.cross(edge2);
    let centroid = (v0 + v1 + v2) / 3.0;

    // Slivers whose corners coincide up to rounding have no usable normal.
    let longest_sq = edge1
        .length_squared()
        .max(edge2.length_squared())
        .max((v2 - v1).length_squared());
    let normal_len = face_normal.length();
    if normal_len <= TANGENTIAL_TOLERANCE * longest_sq {
        return TriangleOrientation::Degenerate;
    }

    let scale = normal_len * centroid.length();
    if scale <= f64::MIN_POSITIVE {
        return TriangleOrientation::Degenerate;
    }

    let alignment = face_normal.dot(centroid);
    if alignment.abs() <= TANGENTIAL_TOLERANCE * scale {
        TriangleOrientation::Degenerate
    } else if alignment > 0.0 {
        TriangleOrientation::Outward
    } else {
        TriangleOrientation::Inward
    }
}

/// `true` if the triangle's normal points away from the sphere centre.
#[must_use]
pub fn triangle_winds_outward(v0: DVec3, v1: DVec3, v2: DVec3) -> bool {
    classify_triangle(v0, v1, v2) == TriangleOrientation::Outward
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileglobe_projection::geo_to_cartesian;

    #[test]
    fn test_east_then_south_winds_outward() {
        // (yy,xx) → (yy,xx+1) → (yy+1,xx): east, then south.
        for &(lat, lon) in &[(0.0, 0.0), (60.0, 120.0), (-45.0, -170.0), (84.0, 10.0)] {
            let v0 = geo_to_cartesian(lat, lon);
            let v1 = geo_to_cartesian(lat, lon + 1.0);
            let v2 = geo_to_cartesian(lat - 1.0, lon);
            assert!(
                triangle_winds_outward(v0, v1, v2),
                "upper-left triangle inward at ({lat}, {lon})"
            );
        }
    }

    #[test]
    fn test_reversed_order_winds_inward() {
        let v0 = geo_to_cartesian(10.0, 10.0);
        let v1 = geo_to_cartesian(10.0, 11.0);
        let v2 = geo_to_cartesian(9.0, 10.0);
        assert_eq!(classify_triangle(v0, v2, v1), TriangleOrientation::Inward);
    }

    #[test]
    fn test_collapsed_triangle_is_degenerate() {
        let p = geo_to_cartesian(20.0, 30.0);
        let q = geo_to_cartesian(21.0, 30.0);
        assert_eq!(classify_triangle(p, p, q), TriangleOrientation::Degenerate);
    }

    #[test]
    fn test_plane_through_centre_is_degenerate() {
        // All three points on the z = 0 great circle.
        let v0 = geo_to_cartesian(85.0, -180.0);
        let v1 = geo_to_cartesian(85.0, 0.0);
        let v2 = geo_to_cartesian(0.0, -180.0);
        assert_eq!(classify_triangle(v0, v1, v2), TriangleOrientation::Degenerate);
    }

    #[test]
    fn test_antimeridian_sliver_is_degenerate() {
        let v0 = geo_to_cartesian(85.0, -180.0);
        let v1 = geo_to_cartesian(85.0, 180.0);
        let v2 = geo_to_cartesian(-85.0, -180.0);
        assert_eq!(classify_triangle(v0, v1, v2), TriangleOrientation::Degenerate);
    }
}
