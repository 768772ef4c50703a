//! Sink trait and the handle types that cross it.

use bytemuck::Pod;
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use terracube_shared::{CameraView, Vec3};

use crate::error::RenderResult;
use crate::voxel::{ColorVertex, PackedVertex};

/// A vertex type that can be uploaded as-is.
pub trait GpuVertex: Pod {
    /// Shader-visible attributes.
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    /// Per-vertex buffer layout.
    #[must_use]
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

impl GpuVertex for PackedVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &PackedVertex::ATTRIBS;
}

impl GpuVertex for ColorVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &ColorVertex::ATTRIBS;
}

/// Buffer update frequency hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeshUsage {
    /// Written once, drawn many times.
    #[default]
    Static,
    /// Rewritten in place by [`GpuSink::update`].
    Dynamic,
}

/// Shader program identifier issued by the sink owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaderId(pub u32);

/// Ids of meshes whose handles were dropped without [`GpuSink::release`].
///
/// A sink owns one queue and issues its handles from it; dropped handles
/// push their id here and the sink frees them on its next reclaim.
#[derive(Debug, Clone)]
pub struct ReleaseQueue {
    tx: Sender<u64>,
    rx: Receiver<u64>,
}

impl ReleaseQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Issues a handle that reports to this queue when dropped.
    pub fn handle(&self, id: u64, vertex_count: u32, index_count: u32) -> MeshHandle {
        MeshHandle {
            id,
            vertex_count,
            index_count,
            on_drop: Some(self.tx.clone()),
        }
    }

    /// Takes every queued id.
    pub fn drain(&self) -> impl Iterator<Item = u64> + '_ {
        self.rx.try_iter()
    }

    /// Ids waiting to be reclaimed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for ReleaseQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership of one uploaded mesh.
///
/// Not `Clone`: releasing consumes the handle, so a mesh cannot be released
/// twice through the same handle. A handle dropped without release queues
/// its mesh for the issuing sink to free.
#[derive(Debug)]
#[must_use = "a dropped MeshHandle frees its mesh only on the sink's next reclaim"]
pub struct MeshHandle {
    id: u64,
    vertex_count: u32,
    index_count: u32,
    on_drop: Option<Sender<u64>>,
}

impl MeshHandle {
    /// Creates a handle not tied to any release queue. Sinks issue theirs
    /// through [`ReleaseQueue::handle`].
    pub const fn new(id: u64, vertex_count: u32, index_count: u32) -> Self {
        Self {
            id,
            vertex_count,
            index_count,
            on_drop: None,
        }
    }

    /// Sink-specific id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Vertices in the current upload.
    #[inline]
    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Indices in the current upload.
    #[inline]
    #[must_use]
    pub const fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Records new counts after an in-place update.
    pub fn set_counts(&mut self, vertex_count: u32, index_count: u32) {
        self.vertex_count = vertex_count;
        self.index_count = index_count;
    }

    /// Consumes the handle without queueing it. Sinks call this from
    /// [`GpuSink::release`].
    #[must_use]
    pub fn into_id(mut self) -> u64 {
        self.on_drop = None;
        self.id
    }
}

impl Drop for MeshHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.on_drop.take() {
            // The sink is gone when the receiver is; nothing left to free.
            let _ = tx.send(self.id);
        }
    }
}

/// Parameters for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Program to draw with.
    pub shader: ShaderId,
    /// Chunk origin in world space.
    pub world_position: Vec3,
    /// Camera, forwarded untouched.
    pub camera: CameraView,
    /// Draw edges only.
    pub wireframe: bool,
}

/// Destination for mesh buffers.
///
/// One sink serves many meshes; callers hold it by `&mut` for the duration
/// of a call and never store it.
pub trait GpuSink<V: GpuVertex> {
    /// Uploads a mesh.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::BufferTooLarge` if a count exceeds `u32`.
    fn upload(&mut self, vertices: &[V], indices: &[u32], usage: MeshUsage)
        -> RenderResult<MeshHandle>;

    /// Replaces the contents of an uploaded mesh.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnknownHandle` for a handle this sink did not
    /// issue.
    fn update(&mut self, mesh: &mut MeshHandle, vertices: &[V], indices: &[u32])
        -> RenderResult<()>;

    /// Submits one draw of `mesh`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnknownHandle` for a handle this sink did not
    /// issue.
    fn draw(&mut self, mesh: &MeshHandle, call: &DrawCall) -> RenderResult<()>;

    /// Frees the mesh's buffers.
    ///
    /// Dropping the handle instead defers the free to the sink's next
    /// reclaim.
    fn release(&mut self, mesh: MeshHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts() {
        let packed = PackedVertex::layout();
        assert_eq!(packed.array_stride, 4);
        assert_eq!(packed.attributes.len(), 1);
        assert_eq!(packed.attributes[0].format, wgpu::VertexFormat::Uint32);

        let color = ColorVertex::layout();
        assert_eq!(color.array_stride, 28);
        assert_eq!(color.attributes[2].offset, 24);
        assert_eq!(color.attributes[2].format, wgpu::VertexFormat::Float32);
    }

    #[test]
    fn test_handle_counts() {
        let mut handle = MeshHandle::new(7, 24, 36);
        assert_eq!((handle.id(), handle.vertex_count(), handle.index_count()), (7, 24, 36));
        handle.set_counts(0, 0);
        assert_eq!(handle.index_count(), 0);
    }

    #[test]
    fn test_dropped_handle_is_queued() {
        let queue = ReleaseQueue::new();
        let kept = queue.handle(1, 4, 6);
        drop(queue.handle(2, 4, 6));
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.drain().collect::<Vec<_>>(), [2]);
        assert_eq!(kept.into_id(), 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_detached_handle_drops_quietly() {
        let queue = ReleaseQueue::new();
        drop(MeshHandle::new(3, 0, 0));
        assert_eq!(queue.pending(), 0);
    }
}
