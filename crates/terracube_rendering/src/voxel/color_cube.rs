//! # Colored Cubes
//!
//! Untextured float-vertex cubes for debug markers, selection boxes and
//! other overlays. Same corner layout and winding as chunk meshes, with a
//! per-face brightness baked into each vertex.

use bytemuck::{Pod, Zeroable};
use terracube_shared::{Vec3, BLOCK_RENDER_SIZE};

use super::face::{Face, CORNER_SIGNS};

/// Position, color and directional brightness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct ColorVertex {
    /// World position.
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
    /// Face shading multiplier.
    pub brightness: f32,
}

impl ColorVertex {
    /// Vertex attributes for wgpu.
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32x3,  // color
        2 => Float32,    // brightness
    ];
}

/// Triangle list of colored cubes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMesh {
    /// Vertex stream.
    pub vertices: Vec<ColorVertex>,
    /// Index stream.
    pub indices: Vec<u32>,
}

impl ColorMesh {
    /// Empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// A single cube around block position `block`.
    ///
    /// See [`ColorMesh::push_cube`].
    #[must_use]
    pub fn cube(block: Vec3, half_extent: Vec3, color: Vec3) -> Self {
        let mut mesh = Self::new();
        mesh.push_cube(block, half_extent, color);
        mesh
    }

    /// Appends all six faces of a cube.
    ///
    /// `block` is in block units and is scaled by `BLOCK_RENDER_SIZE`;
    /// `half_extent` is in render units.
    pub fn push_cube(&mut self, block: Vec3, half_extent: Vec3, color: Vec3) {
        #[allow(clippy::cast_precision_loss)]
        let center = block * BLOCK_RENDER_SIZE as f32;

        for face in Face::ALL {
            let base = self.vertices.len() as u32;
            for corner in face.corners() {
                let sign = CORNER_SIGNS[corner];
                #[allow(clippy::cast_precision_loss)]
                let position = Vec3::new(
                    center.x + sign[0] as f32 * half_extent.x,
                    center.y + sign[1] as f32 * half_extent.y,
                    center.z + sign[2] as f32 * half_extent.z,
                );
                self.vertices.push(ColorVertex {
                    position: position.to_array(),
                    color: color.to_array(),
                    brightness: face.brightness(),
                });
            }
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    /// Removes all geometry.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
