//! Chunk lifecycle against the headless sink.
//!
//! Run with: cargo test -p terracube_rendering --test chunk_lifecycle

use std::cell::Cell;
use std::sync::Arc;

use terracube_procedural::{FlatGenerator, GenerationResult, TerrainGenerator};
use terracube_rendering::{
    BlockTypeRegistry, Chunk, ChunkMesher, ChunkState, DrawCall, GpuSink, HeadlessSink,
    MeshHandle, MeshUsage, PackedVertex, RenderError, RenderResult, RendererConfig, ShaderId,
};
use terracube_shared::{Aabb, Block, BlockType, CameraView, Vec3};

/// Flat stone, four blocks deep: 256 top + 256 bottom + 4 * 64 side faces.
const SLAB_FACES: usize = 768;

fn slab() -> FlatGenerator {
    FlatGenerator::new(4, BlockType::Stone)
}

fn chunk_at(position: Vec3) -> Chunk {
    chunk_with(position, RendererConfig::default())
}

fn chunk_with(position: Vec3, config: RendererConfig) -> Chunk {
    let mesher = ChunkMesher::new(Arc::new(BlockTypeRegistry::standard()));
    Chunk::new(position, mesher, config)
}

fn camera() -> CameraView {
    let mut m = CameraView::IDENTITY.view_projection;
    m[3][0] = 5.0;
    CameraView::new(m)
}

/// Records the origin it was asked for.
struct OriginRecorder {
    seen: Cell<Option<[i32; 3]>>,
}

impl TerrainGenerator for OriginRecorder {
    fn generate_chunk(&self, origin: [i32; 3], blocks: &mut [Block]) -> GenerationResult<()> {
        self.seen.set(Some(origin));
        blocks.fill(Block::EMPTY);
        Ok(())
    }
}

/// Refuses every upload.
struct FullSink;

impl GpuSink<PackedVertex> for FullSink {
    fn upload(
        &mut self,
        vertices: &[PackedVertex],
        _: &[u32],
        _: MeshUsage,
    ) -> RenderResult<MeshHandle> {
        Err(RenderError::BufferTooLarge(vertices.len()))
    }

    fn update(&mut self, _: &mut MeshHandle, _: &[PackedVertex], _: &[u32]) -> RenderResult<()> {
        Ok(())
    }

    fn draw(&mut self, _: &MeshHandle, _: &DrawCall) -> RenderResult<()> {
        Ok(())
    }

    fn release(&mut self, mesh: MeshHandle) {
        let _ = mesh.into_id();
    }
}

/// Test: setup generates, meshes and uploads once.
#[test]
fn test_setup_uploads_mesh() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);

    chunk.setup(&slab(), &mut sink).unwrap();

    assert_eq!(chunk.state(), ChunkState::SetUp);
    assert_eq!(chunk.mesh().face_count(), SLAB_FACES);
    assert_eq!(sink.upload_count(), 1);
    let handle = chunk.mesh_handle().unwrap();
    assert_eq!(handle.index_count() as usize, SLAB_FACES * 6);
    assert!(sink.is_resident(handle));

    chunk.unload(&mut sink);
}

/// Test: a second setup is rejected and uploads nothing.
#[test]
fn test_double_setup_rejected() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    chunk.setup(&slab(), &mut sink).unwrap();

    let err = chunk.setup(&slab(), &mut sink).unwrap_err();
    assert!(matches!(err, RenderError::AlreadySetUp(_)));
    assert_eq!(sink.upload_count(), 1);
    assert_eq!(sink.resident_count(), 1);

    chunk.unload(&mut sink);
}

/// Test: unload frees once; a second unload is a no-op.
#[test]
fn test_unload_is_idempotent() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    chunk.setup(&slab(), &mut sink).unwrap();
    chunk.load().unwrap();
    assert_eq!(chunk.state(), ChunkState::Loaded);

    chunk.unload(&mut sink);
    chunk.unload(&mut sink);

    assert_eq!(chunk.state(), ChunkState::Unloaded);
    assert_eq!(sink.release_count(), 1);
    assert_eq!(sink.stray_release_count(), 0);
    assert_eq!(sink.resident_count(), 0);
    assert!(chunk.mesh().is_empty());
}

/// Test: unload on a never-set-up chunk touches nothing.
#[test]
fn test_unload_fresh_chunk() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    chunk.unload(&mut sink);
    assert_eq!(sink.release_count(), 0);
}

/// Test: the chunk can be set up again after unloading.
#[test]
fn test_setup_after_unload() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    chunk.setup(&slab(), &mut sink).unwrap();
    chunk.unload(&mut sink);
    chunk.setup(&slab(), &mut sink).unwrap();

    assert_eq!(sink.upload_count(), 2);
    assert_eq!(sink.resident_count(), 1);
    chunk.unload(&mut sink);
}

/// Test: load needs setup.
#[test]
fn test_load_before_setup() {
    let mut chunk = chunk_at(Vec3::ZERO);
    assert!(matches!(chunk.load(), Err(RenderError::NotSetUp(_))));
    assert!(!chunk.is_loaded());
}

/// Test: render before setup draws nothing and does not fail.
#[test]
fn test_render_before_setup() {
    let mut sink = HeadlessSink::new();
    let chunk = chunk_at(Vec3::ZERO);
    chunk.render(&mut sink, &camera()).unwrap();
    assert!(sink.draws().is_empty());
}

/// Test: render forwards shader, world position, camera and wireframe flag.
#[test]
fn test_render_forwards_draw_state() {
    let mut sink = HeadlessSink::new();
    let config = RendererConfig {
        debug_wireframe: true,
        shader: ShaderId(4),
        ..RendererConfig::default()
    };
    let position = Vec3::new(32.0, 0.0, -64.0);
    let mut chunk = chunk_with(position, config);
    chunk.setup(&slab(), &mut sink).unwrap();
    chunk.render(&mut sink, &camera()).unwrap();

    let draw = sink.draws()[0];
    assert_eq!(draw.shader, ShaderId(4));
    assert_eq!(draw.world_position, position);
    assert_eq!(draw.camera, camera());
    assert!(draw.wireframe);
    assert_eq!(draw.index_count as usize, chunk.mesh().index_count());

    chunk.unload(&mut sink);
}

/// Test: the generator sees the chunk position in block units.
#[test]
fn test_generator_origin_in_blocks() {
    let mut sink = HeadlessSink::new();
    let recorder = OriginRecorder { seen: Cell::new(None) };
    let mut chunk = chunk_at(Vec3::new(32.0, -32.0, 64.0));
    chunk.setup(&recorder, &mut sink).unwrap();

    assert_eq!(recorder.seen.get(), Some([16, -16, 32]));
    assert!(chunk.mesh().is_empty());
    chunk.unload(&mut sink);
}

/// Test: an unregistered type fails setup with nothing uploaded.
#[test]
fn test_unregistered_type_fails_setup() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    let err = chunk
        .setup(&FlatGenerator::new(1, BlockType::Default), &mut sink)
        .unwrap_err();

    assert!(matches!(err, RenderError::UnregisteredBlockType(BlockType::Default)));
    assert_eq!(chunk.state(), ChunkState::Unloaded);
    assert_eq!(sink.upload_count(), 0);
    assert!(chunk.mesh().is_empty());
}

/// Test: a block edit marks the chunk dirty and the refresh updates in place.
#[test]
fn test_edit_and_rebuild_if_dirty() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    chunk.setup(&slab(), &mut sink).unwrap();
    assert!(!chunk.rebuild_if_dirty(&mut sink).unwrap());

    // Digging one top block: -1 top face, +1 top below, +4 walls.
    chunk.set_block(5, 3, 5, Block::EMPTY).unwrap();
    assert!(chunk.is_dirty());
    assert!(chunk.rebuild_if_dirty(&mut sink).unwrap());

    assert!(!chunk.is_dirty());
    assert_eq!(chunk.mesh().face_count(), SLAB_FACES + 4);
    assert_eq!(sink.update_count(), 1);
    assert_eq!(sink.upload_count(), 1);
    let handle = chunk.mesh_handle().unwrap();
    assert_eq!(sink.indices(handle).unwrap().len(), (SLAB_FACES + 4) * 6);

    chunk.unload(&mut sink);
}

/// Test: out-of-chunk edits are rejected.
#[test]
fn test_edit_out_of_bounds() {
    let mut chunk = chunk_at(Vec3::ZERO);
    let err = chunk.set_block(16, 0, 0, Block::EMPTY).unwrap_err();
    assert!(matches!(err, RenderError::OutOfBounds { x: 16, .. }));
    assert!(!chunk.is_dirty());
}

/// Test: rebuild_mesh swaps the upload for a fresh one.
#[test]
fn test_rebuild_mesh_reuploads() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    chunk.setup(&slab(), &mut sink).unwrap();
    chunk.set_block(0, 0, 0, Block::solid(BlockType::Grass)).unwrap();
    chunk.rebuild_mesh(&mut sink).unwrap();

    assert_eq!(sink.upload_count(), 2);
    assert_eq!(sink.release_count(), 1);
    assert_eq!(sink.resident_count(), 1);
    assert!(!chunk.is_dirty());

    chunk.unload(&mut sink);
}

/// Test: rebuild_mesh needs setup.
#[test]
fn test_rebuild_before_setup() {
    let mut sink = HeadlessSink::new();
    let mut chunk = chunk_at(Vec3::ZERO);
    assert!(matches!(chunk.rebuild_mesh(&mut sink), Err(RenderError::NotSetUp(_))));
}

/// Test: bounds cover the block cubes around the chunk position.
#[test]
fn test_bounds() {
    let chunk = chunk_at(Vec3::new(32.0, 0.0, 0.0));
    assert_eq!(
        chunk.bounds(),
        Aabb::new(Vec3::new(31.0, -1.0, -1.0), Vec3::new(63.0, 31.0, 31.0))
    );
}

/// Test: dynamic buffer config reaches the sink.
#[test]
fn test_dynamic_usage() {
    let mut sink = HeadlessSink::new();
    let config = RendererConfig {
        dynamic_buffers: true,
        ..RendererConfig::default()
    };
    let mut chunk = chunk_with(Vec3::ZERO, config);
    chunk.setup(&slab(), &mut sink).unwrap();
    assert_eq!(
        sink.usage(chunk.mesh_handle().unwrap()),
        Some(MeshUsage::Dynamic)
    );
    chunk.unload(&mut sink);
}

/// Test: dropping a set-up chunk without unload still frees its mesh.
#[test]
fn test_dropped_chunk_releases_mesh() {
    let mut sink = HeadlessSink::new();
    {
        let mut chunk = chunk_at(Vec3::ZERO);
        chunk.setup(&slab(), &mut sink).unwrap();
        assert_eq!(sink.resident_count(), 1);
    }

    assert_eq!(sink.reclaim_dropped(), 1);
    assert_eq!(sink.resident_count(), 0);
    assert_eq!(sink.release_count(), 0);
}

/// Test: meshes of dropped chunks are freed by the next upload.
#[test]
fn test_upload_reclaims_dropped_chunks() {
    let mut sink = HeadlessSink::new();
    for _ in 0..3 {
        let mut chunk = chunk_at(Vec3::ZERO);
        chunk.setup(&slab(), &mut sink).unwrap();
    }

    assert_eq!(sink.resident_count(), 1);
    assert_eq!(sink.reclaim_count(), 2);
    sink.reclaim_dropped();
    assert_eq!(sink.resident_count(), 0);
}

/// Test: a refused upload leaves the chunk unloaded with no CPU mesh.
#[test]
fn test_failed_upload_discards_mesh() {
    let mut chunk = chunk_at(Vec3::ZERO);
    let err = chunk.setup(&slab(), &mut FullSink).unwrap_err();

    assert!(matches!(err, RenderError::BufferTooLarge(n) if n == SLAB_FACES * 4));
    assert_eq!(chunk.state(), ChunkState::Unloaded);
    assert!(chunk.mesh().is_empty());
    assert!(chunk.mesh_handle().is_none());

    chunk.unload(&mut FullSink);
    assert!(chunk.mesh().is_empty());

    let mut sink = HeadlessSink::new();
    chunk.setup(&slab(), &mut sink).unwrap();
    assert_eq!(chunk.mesh().face_count(), SLAB_FACES);
    chunk.unload(&mut sink);
}
