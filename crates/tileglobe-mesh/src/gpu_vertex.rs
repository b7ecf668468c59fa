//! Interleaved vertex format for uploading a [`crate::GlobeMesh`] to the GPU.

use std::mem;

/// One interleaved globe vertex: position followed by texture coordinate.
///
/// Layout (20 bytes total):
///   - `[0..12]`  position `[f32; 3]` on the unit sphere
///   - `[12..20]` uv `[f32; 2]` in tile texture space
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(GlobeVertex, [u8; 20]);

impl GlobeVertex {
    /// Byte offset of `uv`, for building a vertex buffer layout.
    pub const UV_OFFSET: usize = mem::offset_of!(GlobeVertex, uv);

    #[must_use]
    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

const _: () = assert!(GlobeVertex::UV_OFFSET == 12);
