//! Chunk meshing benchmarks.
//!
//! Run with: cargo bench -p terracube_rendering

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use terracube_procedural::{HeightmapGenerator, TerrainConfig, TerrainGenerator};
use terracube_rendering::{pack, unpack, BlockTypeRegistry, ChunkMesh, ChunkMesher, VoxelGrid};
use terracube_shared::{Block, BlockType};

fn heightmap_grid() -> VoxelGrid {
    let mut grid = VoxelGrid::new();
    if let Err(err) = HeightmapGenerator::new(TerrainConfig::default())
        .generate_chunk([0, 0, 0], grid.blocks_mut())
    {
        panic!("generation failed: {err}");
    }
    grid
}

/// Alternating solid cells: every face of every active block is visible.
fn checkerboard_grid() -> VoxelGrid {
    let mut grid = VoxelGrid::new();
    for (i, block) in grid.blocks_mut().iter_mut().enumerate() {
        let (x, y, z) = (i % 16, (i / 16) % 16, i / 256);
        if (x + y + z) % 2 == 0 {
            *block = Block::solid(BlockType::Stone);
        }
    }
    grid
}

fn bench_meshing(c: &mut Criterion) {
    let mesher = ChunkMesher::new(Arc::new(BlockTypeRegistry::standard()));
    let mut mesh = ChunkMesh::with_worst_case_capacity();

    let mut group = c.benchmark_group("chunk_mesh");

    let terrain = heightmap_grid();
    group.bench_function("heightmap", |b| {
        b.iter(|| {
            let _ = mesher.build_into(black_box(&terrain), &mut mesh);
            black_box(mesh.vertex_count())
        });
    });

    let solid = VoxelGrid::filled(Block::solid(BlockType::Stone));
    group.bench_function("solid", |b| {
        b.iter(|| {
            let _ = mesher.build_into(black_box(&solid), &mut mesh);
            black_box(mesh.vertex_count())
        });
    });

    let checker = checkerboard_grid();
    group.bench_function("checkerboard", |b| {
        b.iter(|| {
            let _ = mesher.build_into(black_box(&checker), &mut mesh);
            black_box(mesh.vertex_count())
        });
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    c.bench_function("pack_unpack_4096", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for i in 0..4096i32 {
                let packed = pack(i & 31, (i >> 5) & 31, (i >> 10) & 3, 4, 13, 12);
                acc ^= unpack(black_box(packed)).u;
            }
            acc
        });
    });
}

criterion_group!(benches, bench_meshing, bench_codec);
criterion_main!(benches);
