//! # Terrain Generators
//!
//! A generator receives the chunk's minimum corner in block coordinates and
//! a flat block array laid out as `x + y * N + z * N * N`. It must write every
//! cell: the renderer meshes whatever it finds, stale data included.

use terracube_shared::{block_index, Block, BlockType, CHUNK_SIZE, CHUNK_VOLUME};

use crate::config::TerrainConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::noise::{SimplexNoise, WorldSeed};

/// Fills one chunk of blocks.
///
/// Implementations must be deterministic for a given origin and must
/// initialize all `CHUNK_VOLUME` cells.
pub trait TerrainGenerator {
    /// Writes the chunk whose minimum corner is `origin` (block coordinates).
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::BufferSize` if `blocks` is not exactly one
    /// chunk long.
    fn generate_chunk(&self, origin: [i32; 3], blocks: &mut [Block]) -> GenerationResult<()>;
}

fn check_len(blocks: &[Block]) -> GenerationResult<()> {
    if blocks.len() == CHUNK_VOLUME {
        Ok(())
    } else {
        Err(GenerationError::BufferSize {
            expected: CHUNK_VOLUME,
            actual: blocks.len(),
        })
    }
}

// =============================================================================
// FLAT
// =============================================================================

/// Solid slab of one block type below a fixed world height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatGenerator {
    /// Cells with world y below this are active.
    pub height: i32,
    /// Type of every active cell.
    pub block_type: BlockType,
}

impl FlatGenerator {
    /// Creates a slab generator.
    #[must_use]
    pub const fn new(height: i32, block_type: BlockType) -> Self {
        Self { height, block_type }
    }
}

impl TerrainGenerator for FlatGenerator {
    fn generate_chunk(&self, origin: [i32; 3], blocks: &mut [Block]) -> GenerationResult<()> {
        check_len(blocks)?;
        for z in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                let world_y = origin[1] + y as i32;
                let cell = if world_y < self.height {
                    Block::solid(self.block_type)
                } else {
                    Block::EMPTY
                };
                for x in 0..CHUNK_SIZE {
                    blocks[block_index(x, y, z)] = cell;
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// HEIGHTMAP
// =============================================================================

/// Rolling terrain from a fractal noise heightmap.
///
/// Column layout from the top: grass (sand at the shoreline), three layers
/// of dirt, stone below. Air between the surface and `water_level` is water.
pub struct HeightmapGenerator {
    config: TerrainConfig,
    height_noise: SimplexNoise,
}

impl HeightmapGenerator {
    /// Dirt layers between the surface block and stone.
    const DIRT_DEPTH: i32 = 3;

    /// Creates a generator. The config is used as-is; call
    /// `TerrainConfig::validate` first when it comes from a file.
    #[must_use]
    pub fn new(config: TerrainConfig) -> Self {
        let height_noise = SimplexNoise::new(WorldSeed::new(config.seed).derive(1));
        Self { config, height_noise }
    }

    /// Returns the generator's parameters.
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// World y of the surface block in column `(x, z)`.
    #[must_use]
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let noise = self.height_noise.fractal(
            f64::from(world_x) * self.config.frequency,
            f64::from(world_z) * self.config.frequency,
            self.config.octaves,
            self.config.persistence,
        );
        self.config.base_height + (noise * self.config.amplitude).round() as i32
    }

    fn block_at(&self, world_y: i32, surface: i32) -> Block {
        let shoreline = surface <= self.config.water_level + 1;
        if world_y > surface {
            if world_y <= self.config.water_level {
                Block::solid(BlockType::Water)
            } else {
                Block::EMPTY
            }
        } else if world_y == surface {
            Block::solid(if shoreline { BlockType::Sand } else { BlockType::Grass })
        } else if world_y > surface - 1 - Self::DIRT_DEPTH {
            Block::solid(BlockType::Dirt)
        } else {
            Block::solid(BlockType::Stone)
        }
    }
}

impl TerrainGenerator for HeightmapGenerator {
    fn generate_chunk(&self, origin: [i32; 3], blocks: &mut [Block]) -> GenerationResult<()> {
        check_len(blocks)?;
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let surface = self.surface_height(origin[0] + x as i32, origin[2] + z as i32);
                for y in 0..CHUNK_SIZE {
                    blocks[block_index(x, y, z)] = self.block_at(origin[1] + y as i32, surface);
                }
            }
        }
        tracing::trace!(?origin, "heightmap chunk generated");
        Ok(())
    }
}
