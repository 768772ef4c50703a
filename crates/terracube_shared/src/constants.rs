//! # Chunk & Mesh Constants
//!
//! **CRITICAL:** `CHUNK_SIZE`, `BLOCK_RENDER_SIZE` and `ATLAS_CELLS` are
//! baked into the packed vertex layout and the shader that decodes it.
//! Changing one without the other corrupts every mesh on screen.

// =============================================================================
// CHUNK DIMENSIONS
// =============================================================================

/// Blocks per chunk axis.
///
/// Power of two: a balance between per-chunk draw-call overhead and the cost
/// of rebuilding one chunk mesh.
pub const CHUNK_SIZE: usize = 16;

/// Blocks per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Linear index of a chunk-local cell: `x + y * N + z * N * N`.
///
/// Generators and the voxel grid share this layout.
#[inline]
#[must_use]
pub const fn block_index(x: usize, y: usize, z: usize) -> usize {
    x + y * CHUNK_SIZE + z * CHUNK_SIZE * CHUNK_SIZE
}

/// Edge length of one block in mesh units.
///
/// Block-local corner coordinates are `BLOCK_RENDER_SIZE * i ± BLOCK_RENDER_SIZE / 2`,
/// so a 16-block chunk spans mesh coordinates `-1..=31`.
pub const BLOCK_RENDER_SIZE: i32 = 2;

// =============================================================================
// MESH LAYOUT
// =============================================================================

/// Faces of a cube.
pub const FACES_PER_BLOCK: usize = 6;

/// Vertices emitted per visible face (one quad).
pub const VERTICES_PER_FACE: usize = 4;

/// Indices emitted per visible face (two triangles).
pub const INDICES_PER_FACE: usize = 6;

/// Worst-case vertex count for one chunk (every block active and fully exposed).
pub const MAX_CHUNK_VERTICES: usize = CHUNK_VOLUME * FACES_PER_BLOCK * VERTICES_PER_FACE;

/// Worst-case index count for one chunk.
pub const MAX_CHUNK_INDICES: usize = CHUNK_VOLUME * FACES_PER_BLOCK * INDICES_PER_FACE;

// =============================================================================
// TEXTURE ATLAS
// =============================================================================

/// Atlas cells per axis addressable by the packed vertex (5 bits for u and v).
pub const ATLAS_CELLS: u32 = 32;
