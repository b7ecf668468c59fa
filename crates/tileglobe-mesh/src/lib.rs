//! Tile-partitioned globe mesh: one UV-mapped quad-grid patch per slippy-map
//! tile, with vertices placed on the unit sphere through Web Mercator.

pub mod builder;
pub mod error;
pub mod gpu_vertex;
pub mod subdivision;
pub mod triangulation;
pub mod winding;

pub use builder::{GlobeMesh, PatchMesh, build_globe_mesh};
pub use error::MeshError;
pub use gpu_vertex::GlobeVertex;
pub use subdivision::SubdivisionConfig;
pub use triangulation::{generate_patch_indices, vertex_index};
pub use winding::{TriangleOrientation, classify_triangle, triangle_winds_outward};
