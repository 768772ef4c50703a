//! # TERRACUBE Shared
//!
//! Common types used by terrain generation, meshing and the application.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `wgpu`
//! - Any GPU or window-related crate
//!
//! If you need graphics types, put them in `terracube_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod block;
pub mod constants;
pub mod math;

pub use block::{Block, BlockType};
pub use constants::{
    block_index, ATLAS_CELLS, BLOCK_RENDER_SIZE, CHUNK_SIZE, CHUNK_VOLUME, FACES_PER_BLOCK,
    INDICES_PER_FACE, MAX_CHUNK_INDICES, MAX_CHUNK_VERTICES, VERTICES_PER_FACE,
};
pub use math::{Aabb, CameraView, Vec3};
