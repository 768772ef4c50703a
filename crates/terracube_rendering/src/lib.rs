//! # TERRACUBE Rendering
//!
//! Turns chunks of typed blocks into GPU-ready triangle meshes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ TerrainGenerator → VoxelGrid → ChunkMesher → ChunkMesh        │
//! │                                  ↑    ↑          ↓            │
//! │                     BlockTypeRegistry  pack()   GpuSink       │
//! │                                              (upload / draw)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - Faces between two active blocks of the same chunk are culled.
//!   Faces on the chunk boundary are always emitted.
//! - Each vertex is one `u32`: 6+6+6 bits of offset position, 3 bits of face
//!   id, 5+5 bits of atlas coordinate. See [`voxel::packing`].
//! - Meshes are rebuilt wholesale and re-uploaded; no partial patching.
//!
//! Everything here runs on the render thread and never blocks. Chunks never
//! read each other's blocks, so independent chunks may be meshed in parallel.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod gpu;
pub mod voxel;

pub use chunk::{Chunk, ChunkState};
pub use config::RendererConfig;
pub use error::{RenderError, RenderResult};
pub use gpu::{
    DrawCall, DrawRecord, GpuSink, GpuVertex, HeadlessSink, MeshHandle, MeshUsage, ReleaseQueue,
    ShaderId, WgpuSink,
};
pub use voxel::{
    pack, unpack, update_face_and_uv, AtlasCell, BlockTypeRegistry, ChunkMesh, ChunkMesher,
    ColorMesh, ColorVertex, Face, FaceTextures, PackedVertex, UnpackedVertex, VoxelGrid,
    COORD_OFFSET,
};
