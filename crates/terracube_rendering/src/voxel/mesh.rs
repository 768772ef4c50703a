//! CPU-side chunk mesh.

use terracube_shared::{INDICES_PER_FACE, MAX_CHUNK_INDICES, MAX_CHUNK_VERTICES, VERTICES_PER_FACE};

use super::packing::PackedVertex;

/// Packed vertices plus a `u32` triangle list.
///
/// Every face contributes four vertices and six indices
/// `v, v+1, v+2, v, v+2, v+3`, so all indices are `< vertices.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    /// Vertex stream.
    pub vertices: Vec<PackedVertex>,
    /// Index stream.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Empty mesh with room for a chunk with every face visible.
    #[must_use]
    pub fn with_worst_case_capacity() -> Self {
        Self {
            vertices: Vec::with_capacity(MAX_CHUNK_VERTICES),
            indices: Vec::with_capacity(MAX_CHUNK_INDICES),
        }
    }

    /// Removes all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Whether there is nothing to draw.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices.
    #[inline]
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of emitted faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one quad, corners counter-clockwise from outside.
    #[inline]
    pub(crate) fn push_quad(&mut self, corners: [PackedVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        debug_assert_eq!(self.indices.len() % INDICES_PER_FACE, 0);
    }
}
