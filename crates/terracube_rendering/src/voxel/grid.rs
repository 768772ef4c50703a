//! Dense block storage for one chunk.

use terracube_shared::{block_index, Block, CHUNK_SIZE, CHUNK_VOLUME};

use super::face::Face;
use crate::error::{RenderError, RenderResult};

/// `CHUNK_SIZE³` blocks, laid out `x + y * N + z * N * N`.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    blocks: Box<[Block]>,
}

impl VoxelGrid {
    /// A grid of inactive default blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::filled(Block::EMPTY)
    }

    /// A grid with every cell set to `block`.
    #[must_use]
    pub fn filled(block: Block) -> Self {
        Self {
            blocks: vec![block; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Linear index of `(x, y, z)`, or `None` outside the chunk.
    #[inline]
    #[must_use]
    pub const fn index(x: usize, y: usize, z: usize) -> Option<usize> {
        if x < CHUNK_SIZE && y < CHUNK_SIZE && z < CHUNK_SIZE {
            Some(block_index(x, y, z))
        } else {
            None
        }
    }

    /// Block at `(x, y, z)`, or `None` outside the chunk.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<Block> {
        Self::index(x, y, z).map(|i| self.blocks[i])
    }

    /// Overwrites the block at `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::OutOfBounds` outside the chunk.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: Block) -> RenderResult<()> {
        let i = Self::index(x, y, z).ok_or(RenderError::OutOfBounds { x, y, z })?;
        self.blocks[i] = block;
        Ok(())
    }

    /// Whether the cell at signed coordinates is an active block.
    ///
    /// Anything outside the chunk counts as inactive.
    #[inline]
    #[must_use]
    pub fn is_active_at(&self, x: i32, y: i32, z: i32) -> bool {
        match (usize::try_from(x), usize::try_from(y), usize::try_from(z)) {
            (Ok(x), Ok(y), Ok(z)) => self.get(x, y, z).is_some_and(Block::is_active),
            _ => false,
        }
    }

    /// Whether the neighbor across `face` of `(x, y, z)` is active.
    #[inline]
    #[must_use]
    pub fn neighbor_active(&self, x: usize, y: usize, z: usize, face: Face) -> bool {
        let [dx, dy, dz] = face.normal();
        self.is_active_at(x as i32 + dx, y as i32 + dy, z as i32 + dz)
    }

    /// Sets every cell to `block`.
    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
    }

    /// Number of active blocks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.active).count()
    }

    /// All cells in index order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// All cells in index order, for terrain generators.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("active", &self.active_count())
            .finish_non_exhaustive()
    }
}
