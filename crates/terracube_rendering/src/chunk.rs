//! # Chunk
//!
//! Owns one chunk's blocks, its CPU mesh and its GPU handle, and drives them
//! through the lifecycle:
//!
//! ```text
//!   Unloaded ──setup──▶ SetUp ──load──▶ Loaded
//!      ▲                  │               │
//!      └──────unload──────┴───────────────┘
//! ```
//!
//! The sink is borrowed per call, never stored, so many chunks share one.

use terracube_procedural::TerrainGenerator;
use terracube_shared::{Aabb, Block, CameraView, Vec3, BLOCK_RENDER_SIZE, CHUNK_SIZE};

use crate::config::RendererConfig;
use crate::error::{RenderError, RenderResult};
use crate::gpu::{DrawCall, GpuSink, MeshHandle};
use crate::voxel::{ChunkMesh, ChunkMesher, PackedVertex, VoxelGrid};

/// Where a chunk is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// No blocks generated, nothing on the GPU.
    Unloaded,
    /// Generated, meshed and uploaded.
    SetUp,
    /// Set up and marked renderable.
    Loaded,
}

/// A `CHUNK_SIZE³` block volume at a fixed world position.
#[derive(Debug)]
pub struct Chunk {
    position: Vec3,
    grid: VoxelGrid,
    mesh: ChunkMesh,
    gpu: Option<MeshHandle>,
    mesher: ChunkMesher,
    config: RendererConfig,
    has_setup: bool,
    loaded: bool,
    dirty: bool,
}

impl Chunk {
    /// World-space edge length of a chunk.
    #[allow(clippy::cast_precision_loss)]
    pub const WORLD_SIZE: f32 = (CHUNK_SIZE as i32 * BLOCK_RENDER_SIZE) as f32;

    /// Creates an unloaded chunk whose minimum corner is `position`
    /// (world units).
    #[must_use]
    pub fn new(position: Vec3, mesher: ChunkMesher, config: RendererConfig) -> Self {
        Self {
            position,
            grid: VoxelGrid::new(),
            mesh: ChunkMesh::new(),
            gpu: None,
            mesher,
            config,
            has_setup: false,
            loaded: false,
            dirty: false,
        }
    }

    /// Generates blocks, builds the mesh and uploads it.
    ///
    /// # Errors
    ///
    /// - `AlreadySetUp` if called twice without `unload`.
    /// - `Generation` if the generator fails.
    /// - `UnregisteredBlockType` if meshing fails; nothing is uploaded and
    ///   the chunk stays unloaded.
    /// - Any sink upload error; the CPU mesh is discarded.
    pub fn setup<G, S>(&mut self, generator: &G, sink: &mut S) -> RenderResult<()>
    where
        G: TerrainGenerator + ?Sized,
        S: GpuSink<PackedVertex> + ?Sized,
    {
        if self.has_setup {
            tracing::warn!(position = ?self.position, "setup on a chunk that is already set up");
            return Err(RenderError::AlreadySetUp(self.position));
        }

        generator.generate_chunk(self.block_origin(), self.grid.blocks_mut())?;
        self.mesher.build_into(&self.grid, &mut self.mesh)?;
        let handle = match sink.upload(
            &self.mesh.vertices,
            &self.mesh.indices,
            self.config.mesh_usage(),
        ) {
            Ok(handle) => handle,
            Err(err) => {
                self.mesh.clear();
                return Err(err);
            }
        };

        self.gpu = Some(handle);
        self.has_setup = true;
        self.dirty = false;
        tracing::info!(
            position = ?self.position,
            faces = self.mesh.face_count(),
            "chunk set up"
        );
        Ok(())
    }

    /// Marks a set-up chunk renderable.
    ///
    /// # Errors
    ///
    /// Returns `NotSetUp` before `setup`.
    pub fn load(&mut self) -> RenderResult<()> {
        if !self.has_setup {
            return Err(RenderError::NotSetUp(self.position));
        }
        self.loaded = true;
        Ok(())
    }

    /// Releases GPU buffers and CPU mesh storage. Blocks are kept.
    ///
    /// No-op on a chunk that is not set up.
    pub fn unload<S>(&mut self, sink: &mut S)
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        if !self.has_setup && self.gpu.is_none() {
            tracing::debug!(position = ?self.position, "unload on an unloaded chunk");
            self.mesh = ChunkMesh::new();
            return;
        }
        if let Some(handle) = self.gpu.take() {
            sink.release(handle);
        }
        self.mesh = ChunkMesh::new();
        self.has_setup = false;
        self.loaded = false;
        self.dirty = false;
        tracing::info!(position = ?self.position, "chunk unloaded");
    }

    /// Rebuilds the mesh from the current blocks and re-uploads it into
    /// fresh buffers.
    ///
    /// # Errors
    ///
    /// `NotSetUp` before `setup`; `UnregisteredBlockType` if meshing fails,
    /// in which case the chunk has no GPU mesh until the next successful
    /// rebuild.
    pub fn rebuild_mesh<S>(&mut self, sink: &mut S) -> RenderResult<()>
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        if !self.has_setup {
            return Err(RenderError::NotSetUp(self.position));
        }
        if let Some(handle) = self.gpu.take() {
            sink.release(handle);
        }
        self.mesher.build_into(&self.grid, &mut self.mesh)?;
        self.gpu = Some(sink.upload(
            &self.mesh.vertices,
            &self.mesh.indices,
            self.config.mesh_usage(),
        )?);
        self.dirty = false;
        tracing::debug!(position = ?self.position, "chunk mesh rebuilt");
        Ok(())
    }

    /// Rebuilds the mesh and rewrites the existing buffers in place.
    ///
    /// Falls back to a fresh upload when the chunk has no GPU mesh.
    ///
    /// # Errors
    ///
    /// Same as [`Chunk::rebuild_mesh`], plus any sink update error.
    pub fn refresh_mesh<S>(&mut self, sink: &mut S) -> RenderResult<()>
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        if !self.has_setup {
            return Err(RenderError::NotSetUp(self.position));
        }
        if let Err(err) = self.mesher.build_into(&self.grid, &mut self.mesh) {
            if let Some(handle) = self.gpu.take() {
                sink.release(handle);
            }
            return Err(err);
        }
        match self.gpu.as_mut() {
            Some(handle) => sink.update(handle, &self.mesh.vertices, &self.mesh.indices)?,
            None => {
                self.gpu = Some(sink.upload(
                    &self.mesh.vertices,
                    &self.mesh.indices,
                    self.config.mesh_usage(),
                )?);
            }
        }
        self.dirty = false;
        Ok(())
    }

    /// Submits one draw of this chunk.
    ///
    /// No-op without a GPU mesh.
    ///
    /// # Errors
    ///
    /// Propagates sink draw errors.
    pub fn render<S>(&self, sink: &mut S, camera: &CameraView) -> RenderResult<()>
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        let Some(handle) = self.gpu.as_ref() else {
            tracing::warn!(position = ?self.position, "render on a chunk with no GPU mesh");
            return Ok(());
        };
        sink.draw(
            handle,
            &DrawCall {
                shader: self.config.shader,
                world_position: self.position,
                camera: *camera,
                wireframe: self.config.debug_wireframe,
            },
        )
    }

    /// Replaces one block and marks the mesh stale.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` outside the chunk.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) -> RenderResult<()> {
        self.grid.set(x, y, z, block)?;
        self.dirty = true;
        Ok(())
    }

    /// Refreshes the mesh if blocks changed since the last build.
    ///
    /// Returns whether a rebuild happened.
    ///
    /// # Errors
    ///
    /// See [`Chunk::refresh_mesh`].
    pub fn rebuild_if_dirty<S>(&mut self, sink: &mut S) -> RenderResult<bool>
    where
        S: GpuSink<PackedVertex> + ?Sized,
    {
        if !self.dirty || !self.has_setup {
            return Ok(false);
        }
        self.refresh_mesh(sink)?;
        Ok(true)
    }

    /// Minimum corner of the chunk passed to the generator, in blocks.
    #[must_use]
    pub fn block_origin(&self) -> [i32; 3] {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let to_blocks = |c: f32| (c / BLOCK_RENDER_SIZE as f32).floor() as i32;
        [
            to_blocks(self.position.x),
            to_blocks(self.position.y),
            to_blocks(self.position.z),
        ]
    }

    /// World-space box covered by the chunk's geometry.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        #[allow(clippy::cast_precision_loss)]
        let half = (BLOCK_RENDER_SIZE / 2) as f32;
        let min = self.position - Vec3::splat(half);
        Aabb::new(min, min + Vec3::splat(Self::WORLD_SIZE))
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ChunkState {
        match (self.has_setup, self.loaded) {
            (false, _) => ChunkState::Unloaded,
            (true, false) => ChunkState::SetUp,
            (true, true) => ChunkState::Loaded,
        }
    }

    /// Minimum corner in world units.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether `setup` succeeded and `unload` has not run since.
    #[must_use]
    pub const fn is_setup(&self) -> bool {
        self.has_setup
    }

    /// Whether the chunk is marked renderable.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether blocks changed since the last mesh build.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Block storage.
    #[must_use]
    pub const fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Current CPU mesh.
    #[must_use]
    pub const fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Current GPU handle, if uploaded.
    #[must_use]
    pub const fn mesh_handle(&self) -> Option<&MeshHandle> {
        self.gpu.as_ref()
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        if let Some(handle) = &self.gpu {
            tracing::debug!(
                position = ?self.position,
                mesh = handle.id(),
                "chunk dropped without unload; mesh queued for release"
            );
        }
    }
}
