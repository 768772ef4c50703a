//! # Chunk Field
//!
//! A fixed box of chunks around the world origin: `-r..=r` chunks in x and
//! z, `0..h` in y. All chunks share one registry and one sink.

use std::sync::Arc;

use terracube_procedural::TerrainGenerator;
use terracube_rendering::{
    BlockTypeRegistry, Chunk, ChunkMesher, GpuSink, PackedVertex, RenderResult,
};
use terracube_shared::{Block, CameraView, Vec3, CHUNK_SIZE};

use crate::config::TerracubeConfig;
use crate::error::{TerracubeError, TerracubeResult};

/// Totals over the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Chunks in the field.
    pub chunks: usize,
    /// Chunks marked renderable.
    pub loaded: usize,
    /// Active blocks across all chunks.
    pub active_blocks: usize,
    /// Emitted faces.
    pub faces: usize,
    /// Emitted vertices.
    pub vertices: usize,
    /// Emitted indices.
    pub indices: usize,
}

/// Chunks laid out on a grid and driven together.
#[derive(Debug)]
pub struct ChunkField {
    chunks: Vec<Chunk>,
    radius: i32,
    height: i32,
}

impl ChunkField {
    /// Creates every chunk of the field, unloaded.
    #[must_use]
    pub fn new(config: &TerracubeConfig, registry: Arc<BlockTypeRegistry>) -> Self {
        let radius = config.field_radius;
        let height = config.field_height;
        let mesher = ChunkMesher::new(registry);

        let mut chunks = Vec::new();
        for cx in -radius..=radius {
            for cy in 0..height {
                for cz in -radius..=radius {
                    #[allow(clippy::cast_precision_loss)]
                    let position = Vec3::new(cx as f32, cy as f32, cz as f32) * Chunk::WORLD_SIZE;
                    chunks.push(Chunk::new(position, mesher.clone(), config.renderer));
                }
            }
        }
        tracing::debug!(chunks = chunks.len(), radius, height, "chunk field laid out");

        Self {
            chunks,
            radius,
            height,
        }
    }

    /// Sets up and loads every chunk that is not set up yet.
    ///
    /// Stops at the first failure; chunks already set up stay resident.
    ///
    /// # Errors
    ///
    /// The first chunk error.
    pub fn setup_all<G, S>(&mut self, generator: &G, sink: &mut S) -> RenderResult<()>
    where
        G: TerrainGenerator + ?Sized,
        S: GpuSink<PackedVertex> + ?Sized,
    {
        for chunk in self.chunks.iter_mut().filter(|c| !c.is_setup()) {
            chunk.setup(generator, sink)?;
            chunk.load()?;
        }
        tracing::info!(chunks = self.chunks.len(), "chunk field set up");
        Ok(())
    }

    /// Draws every loaded chunk. Returns the number of draws submitted.
    ///
    /// # Errors
    ///
    /// The first sink draw error.
    pub fn render_all<S>(&self, sink: &mut S, camera: &CameraView) -> RenderResult<usize>
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        let mut draws = 0;
        for chunk in self.chunks.iter().filter(|c| c.is_loaded()) {
            chunk.render(sink, camera)?;
            draws += 1;
        }
        Ok(draws)
    }

    /// Refreshes every chunk with pending block edits. Returns how many
    /// were rebuilt.
    ///
    /// # Errors
    ///
    /// The first chunk error.
    pub fn rebuild_dirty<S>(&mut self, sink: &mut S) -> RenderResult<usize>
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        let mut rebuilt = 0;
        for chunk in &mut self.chunks {
            if chunk.rebuild_if_dirty(sink)? {
                rebuilt += 1;
            }
        }
        Ok(rebuilt)
    }

    /// Unloads every chunk.
    pub fn unload_all<S>(&mut self, sink: &mut S)
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        for chunk in &mut self.chunks {
            chunk.unload(sink);
        }
        tracing::info!(chunks = self.chunks.len(), "chunk field unloaded");
    }

    /// Edits the block at world block coordinates.
    ///
    /// # Errors
    ///
    /// `OutsideField` when no chunk covers the coordinates.
    pub fn set_block(&mut self, world: [i32; 3], block: Block) -> TerracubeResult<()> {
        let size = CHUNK_SIZE as i32;
        let chunk_coord = world.map(|c| c.div_euclid(size));
        let local = world.map(|c| c.rem_euclid(size) as usize);

        let index = self
            .index_of(chunk_coord)
            .ok_or(TerracubeError::OutsideField(world))?;
        self.chunks[index].set_block(local[0], local[1], local[2], block)?;
        Ok(())
    }

    /// Chunk at chunk-grid coordinates.
    #[must_use]
    pub fn chunk_at(&self, chunk_coord: [i32; 3]) -> Option<&Chunk> {
        self.index_of(chunk_coord).map(|i| &self.chunks[i])
    }

    /// All chunks, x outer, y middle, z inner.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Totals over all chunks.
    #[must_use]
    pub fn stats(&self) -> FieldStats {
        self.chunks.iter().fold(
            FieldStats {
                chunks: self.chunks.len(),
                ..FieldStats::default()
            },
            |mut stats, chunk| {
                stats.loaded += usize::from(chunk.is_loaded());
                stats.active_blocks += chunk.grid().active_count();
                stats.faces += chunk.mesh().face_count();
                stats.vertices += chunk.mesh().vertex_count();
                stats.indices += chunk.mesh().index_count();
                stats
            },
        )
    }

    fn index_of(&self, [cx, cy, cz]: [i32; 3]) -> Option<usize> {
        let r = self.radius;
        if !(-r..=r).contains(&cx) || !(0..self.height).contains(&cy) || !(-r..=r).contains(&cz) {
            return None;
        }
        let side = (2 * r + 1) as usize;
        let (x, y, z) = ((cx + r) as usize, cy as usize, (cz + r) as usize);
        Some((x * self.height as usize + y) * side + z)
    }
}
