//! # Chunk Mesher
//!
//! Naive culled mesher: every visible face of every active block becomes one
//! quad. A face is hidden only by an active neighbor inside the same chunk.
//!
//! Block `(x, y, z)` is centered at `BLOCK_RENDER_SIZE * (x, y, z)` in
//! chunk-local space, so with a render size of 2 corner coordinates span
//! `-1..=31` and stay inside the packed range.
//!
//! Iteration is x outer, y middle, z inner, faces in id order; the output for
//! a given grid is fully deterministic.

use std::sync::Arc;

use terracube_shared::{BLOCK_RENDER_SIZE, CHUNK_SIZE};

use super::face::{Face, CORNER_SIGNS};
use super::grid::VoxelGrid;
use super::mesh::ChunkMesh;
use super::packing::PackedVertex;
use super::registry::BlockTypeRegistry;
use crate::error::RenderResult;

/// Half of a block's edge in render units.
const HALF_SIZE: i32 = BLOCK_RENDER_SIZE / 2;

/// Builds packed meshes from voxel grids.
///
/// Holds only a shared read-only registry, so clones are cheap and can run on
/// separate threads.
#[derive(Debug, Clone)]
pub struct ChunkMesher {
    registry: Arc<BlockTypeRegistry>,
}

impl ChunkMesher {
    /// Creates a mesher backed by `registry`.
    #[must_use]
    pub fn new(registry: Arc<BlockTypeRegistry>) -> Self {
        Self { registry }
    }

    /// The atlas registry.
    #[must_use]
    pub fn registry(&self) -> &BlockTypeRegistry {
        &self.registry
    }

    /// Meshes `grid` into a fresh mesh.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnregisteredBlockType` for the first active
    /// block whose type has no atlas entry.
    pub fn build(&self, grid: &VoxelGrid) -> RenderResult<ChunkMesh> {
        let mut mesh = ChunkMesh::new();
        self.build_into(grid, &mut mesh)?;
        Ok(mesh)
    }

    /// Meshes `grid` into `mesh`, replacing its contents.
    ///
    /// On error `mesh` is left empty.
    ///
    /// # Errors
    ///
    /// See [`ChunkMesher::build`].
    pub fn build_into(&self, grid: &VoxelGrid, mesh: &mut ChunkMesh) -> RenderResult<()> {
        mesh.clear();

        for x in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    let Some(block) = grid.get(x, y, z).filter(|b| b.active) else {
                        continue;
                    };

                    let faces = match self.registry.require(block.block_type) {
                        Ok(faces) => faces,
                        Err(err) => {
                            tracing::error!(x, y, z, block_type = %block.block_type, "{err}");
                            mesh.clear();
                            return Err(err);
                        }
                    };

                    let center = [x, y, z].map(|c| c as i32 * BLOCK_RENDER_SIZE);
                    for face in Face::ALL {
                        if grid.neighbor_active(x, y, z, face) {
                            continue;
                        }
                        let cell = faces.get(face);
                        mesh.push_quad(quad(center, face, cell.column, cell.row));
                    }
                }
            }
        }

        tracing::debug!(
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            faces = mesh.face_count(),
            "chunk meshed"
        );
        Ok(())
    }
}

/// Four packed corners of one face of the block centered at `center`.
#[inline]
fn quad(center: [i32; 3], face: Face, u: u32, v: u32) -> [PackedVertex; 4] {
    let uvs = face.uv_offsets();
    let corners = face.corners();
    std::array::from_fn(|i| {
        let sign = CORNER_SIGNS[corners[i]];
        PackedVertex::new(
            center[0] + sign[0] * HALF_SIZE,
            center[1] + sign[1] * HALF_SIZE,
            center[2] + sign[2] * HALF_SIZE,
            face,
            u + uvs[i][0],
            v + uvs[i][1],
        )
    })
}
