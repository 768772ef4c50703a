//! # Headless Sink
//!
//! Keeps uploaded meshes in memory and logs every draw. Used by tests, the
//! terrain report tool and benchmarks; no device required.

use std::collections::HashMap;

use terracube_shared::{CameraView, Vec3};

use super::sink::{DrawCall, GpuSink, GpuVertex, MeshHandle, MeshUsage, ReleaseQueue, ShaderId};
use crate::error::{gpu_count, RenderError, RenderResult};

/// One recorded draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    /// Mesh id.
    pub mesh: u64,
    /// Indices drawn.
    pub index_count: u32,
    /// Program.
    pub shader: ShaderId,
    /// World offset.
    pub world_position: Vec3,
    /// Camera as received.
    pub camera: CameraView,
    /// Wireframe flag.
    pub wireframe: bool,
}

#[derive(Debug)]
struct StoredMesh {
    vertex_bytes: Vec<u8>,
    indices: Vec<u32>,
    usage: MeshUsage,
}

/// In-memory [`GpuSink`] for any vertex type.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    meshes: HashMap<u64, StoredMesh>,
    dropped: ReleaseQueue,
    next_id: u64,
    draws: Vec<DrawRecord>,
    uploads: usize,
    updates: usize,
    releases: usize,
    reclaims: usize,
    stray_releases: usize,
}

impl HeadlessSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes currently held.
    #[must_use]
    pub fn resident_count(&self) -> usize {
        self.meshes.len()
    }

    /// Whether `mesh` is held by this sink.
    #[must_use]
    pub fn is_resident(&self, mesh: &MeshHandle) -> bool {
        self.meshes.contains_key(&mesh.id())
    }

    /// Total vertex bytes held.
    #[must_use]
    pub fn resident_bytes(&self) -> usize {
        self.meshes
            .values()
            .map(|m| m.vertex_bytes.len() + m.indices.len() * std::mem::size_of::<u32>())
            .sum()
    }

    /// Copy of the vertices of `mesh`, decoded as `V`.
    #[must_use]
    pub fn vertices<V: GpuVertex>(&self, mesh: &MeshHandle) -> Option<Vec<V>> {
        self.meshes
            .get(&mesh.id())
            .map(|m| bytemuck::pod_collect_to_vec(&m.vertex_bytes))
    }

    /// Indices of `mesh`.
    #[must_use]
    pub fn indices(&self, mesh: &MeshHandle) -> Option<&[u32]> {
        self.meshes.get(&mesh.id()).map(|m| m.indices.as_slice())
    }

    /// Usage hint `mesh` was uploaded with.
    #[must_use]
    pub fn usage(&self, mesh: &MeshHandle) -> Option<MeshUsage> {
        self.meshes.get(&mesh.id()).map(|m| m.usage)
    }

    /// Draws recorded since the last [`HeadlessSink::take_draws`].
    #[must_use]
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Drains the draw log, e.g. at the end of a frame.
    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }

    /// Successful uploads so far.
    #[must_use]
    pub const fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Successful updates so far.
    #[must_use]
    pub const fn update_count(&self) -> usize {
        self.updates
    }

    /// Releases of resident meshes so far.
    #[must_use]
    pub const fn release_count(&self) -> usize {
        self.releases
    }

    /// Releases of handles this sink did not hold.
    #[must_use]
    pub const fn stray_release_count(&self) -> usize {
        self.stray_releases
    }

    /// Meshes freed because their handle was dropped.
    #[must_use]
    pub const fn reclaim_count(&self) -> usize {
        self.reclaims
    }

    /// Frees every mesh whose handle was dropped without release. Returns
    /// how many were freed.
    ///
    /// Runs on every upload and draw; call it directly to settle before
    /// reading the counters.
    pub fn reclaim_dropped(&mut self) -> usize {
        let mut freed = 0;
        for id in self.dropped.drain() {
            if self.meshes.remove(&id).is_some() {
                freed += 1;
            }
        }
        if freed > 0 {
            tracing::debug!(freed, "reclaimed dropped meshes");
        }
        self.reclaims += freed;
        freed
    }
}

impl<V: GpuVertex> GpuSink<V> for HeadlessSink {
    fn upload(
        &mut self,
        vertices: &[V],
        indices: &[u32],
        usage: MeshUsage,
    ) -> RenderResult<MeshHandle> {
        let vertex_count = gpu_count(vertices.len())?;
        let index_count = gpu_count(indices.len())?;
        self.reclaim_dropped();

        let id = self.next_id;
        self.next_id += 1;
        self.meshes.insert(
            id,
            StoredMesh {
                vertex_bytes: bytemuck::cast_slice(vertices).to_vec(),
                indices: indices.to_vec(),
                usage,
            },
        );
        self.uploads += 1;
        Ok(self.dropped.handle(id, vertex_count, index_count))
    }

    fn update(
        &mut self,
        mesh: &mut MeshHandle,
        vertices: &[V],
        indices: &[u32],
    ) -> RenderResult<()> {
        let vertex_count = gpu_count(vertices.len())?;
        let index_count = gpu_count(indices.len())?;
        let stored = self
            .meshes
            .get_mut(&mesh.id())
            .ok_or(RenderError::UnknownHandle(mesh.id()))?;

        stored.vertex_bytes.clear();
        stored.vertex_bytes.extend_from_slice(bytemuck::cast_slice(vertices));
        stored.indices.clear();
        stored.indices.extend_from_slice(indices);
        mesh.set_counts(vertex_count, index_count);
        self.updates += 1;
        Ok(())
    }

    fn draw(&mut self, mesh: &MeshHandle, call: &DrawCall) -> RenderResult<()> {
        self.reclaim_dropped();
        if !self.meshes.contains_key(&mesh.id()) {
            return Err(RenderError::UnknownHandle(mesh.id()));
        }
        self.draws.push(DrawRecord {
            mesh: mesh.id(),
            index_count: mesh.index_count(),
            shader: call.shader,
            world_position: call.world_position,
            camera: call.camera,
            wireframe: call.wireframe,
        });
        Ok(())
    }

    fn release(&mut self, mesh: MeshHandle) {
        let id = mesh.into_id();
        if self.meshes.remove(&id).is_some() {
            self.releases += 1;
        } else {
            tracing::warn!(mesh = id, "release of a mesh this sink does not hold");
            self.stray_releases += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{ColorMesh, ColorVertex, PackedVertex};

    fn call() -> DrawCall {
        DrawCall {
            shader: ShaderId(1),
            world_position: Vec3::new(32.0, 0.0, -32.0),
            camera: CameraView::IDENTITY,
            wireframe: false,
        }
    }

    #[test]
    fn test_upload_draw_release() {
        let mut sink = HeadlessSink::new();
        let vertices = [PackedVertex(1), PackedVertex(2), PackedVertex(3), PackedVertex(4)];
        let handle = sink.upload(&vertices, &[0, 1, 2, 0, 2, 3], MeshUsage::Static).unwrap();

        assert_eq!(handle.index_count(), 6);
        assert_eq!(sink.vertices::<PackedVertex>(&handle).unwrap(), vertices.to_vec());
        assert_eq!(sink.usage(&handle), Some(MeshUsage::Static));

        GpuSink::<PackedVertex>::draw(&mut sink, &handle, &call()).unwrap();
        assert_eq!(sink.draws().len(), 1);
        assert_eq!(sink.draws()[0].world_position, Vec3::new(32.0, 0.0, -32.0));

        GpuSink::<PackedVertex>::release(&mut sink, handle);
        assert_eq!(sink.resident_count(), 0);
        assert_eq!(sink.release_count(), 1);
    }

    #[test]
    fn test_update_replaces_contents() {
        let mut sink = HeadlessSink::new();
        let mut handle = sink
            .upload(&[PackedVertex(9); 4], &[0, 1, 2, 0, 2, 3], MeshUsage::Dynamic)
            .unwrap();
        sink.update(&mut handle, &[PackedVertex(5); 8], &[0; 12]).unwrap();

        assert_eq!(handle.vertex_count(), 8);
        assert_eq!(handle.index_count(), 12);
        assert_eq!(sink.indices(&handle).unwrap().len(), 12);
        assert_eq!(sink.update_count(), 1);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut sink = HeadlessSink::new();
        let foreign = MeshHandle::new(99, 0, 0);
        let err = GpuSink::<PackedVertex>::draw(&mut sink, &foreign, &call()).unwrap_err();
        assert!(matches!(err, RenderError::UnknownHandle(99)));

        GpuSink::<PackedVertex>::release(&mut sink, foreign);
        assert_eq!(sink.stray_release_count(), 1);
        assert_eq!(sink.release_count(), 0);
    }

    fn quad(sink: &mut HeadlessSink, bits: u32) -> MeshHandle {
        sink.upload(&[PackedVertex(bits); 4], &[0, 1, 2, 0, 2, 3], MeshUsage::Static)
            .unwrap()
    }

    #[test]
    fn test_dropped_handle_is_reclaimed() {
        let mut sink = HeadlessSink::new();
        let kept = quad(&mut sink, 1);
        drop(quad(&mut sink, 2));
        assert_eq!(sink.resident_count(), 2);

        assert_eq!(sink.reclaim_dropped(), 1);
        assert_eq!(sink.resident_count(), 1);
        assert!(sink.is_resident(&kept));
        assert_eq!(sink.reclaim_count(), 1);
        assert_eq!(sink.release_count(), 0);

        GpuSink::<PackedVertex>::release(&mut sink, kept);
        assert_eq!(sink.reclaim_dropped(), 0);
        assert_eq!(sink.resident_count(), 0);
    }

    #[test]
    fn test_draw_reclaims_dropped_meshes() {
        let mut sink = HeadlessSink::new();
        let kept = quad(&mut sink, 1);
        drop(quad(&mut sink, 2));

        GpuSink::<PackedVertex>::draw(&mut sink, &kept, &call()).unwrap();
        assert_eq!(sink.resident_count(), 1);
        GpuSink::<PackedVertex>::release(&mut sink, kept);
    }

    #[test]
    fn test_color_mesh_roundtrip() {
        let mut sink = HeadlessSink::new();
        let cube = ColorMesh::cube(Vec3::ZERO, Vec3::splat(1.0), Vec3::splat(0.5));
        let handle = sink.upload(&cube.vertices, &cube.indices, MeshUsage::Static).unwrap();
        assert_eq!(sink.vertices::<ColorVertex>(&handle), Some(cube.vertices.clone()));
        GpuSink::<ColorVertex>::release(&mut sink, handle);
    }
}
