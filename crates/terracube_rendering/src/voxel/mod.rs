//! # Voxel Meshing
//!
//! CPU side of the pipeline: block storage, atlas lookup, face culling and
//! vertex packing.

pub mod color_cube;
pub mod face;
pub mod grid;
pub mod mesh;
pub mod mesher;
pub mod packing;
pub mod registry;

pub use color_cube::{ColorMesh, ColorVertex};
pub use face::Face;
pub use grid::VoxelGrid;
pub use mesh::ChunkMesh;
pub use mesher::ChunkMesher;
pub use packing::{pack, unpack, update_face_and_uv, PackedVertex, UnpackedVertex, COORD_OFFSET};
pub use registry::{AtlasCell, BlockTypeRegistry, FaceTextures};
