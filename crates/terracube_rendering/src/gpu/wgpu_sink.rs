//! # wgpu Sink
//!
//! Real GPU buffers. Each uploaded mesh owns a vertex buffer, a `u32` index
//! buffer and a 12-byte instance buffer holding its world position. Draws
//! are queued during the frame and recorded into a render pass by
//! [`WgpuSink::encode`].
//!
//! Bindings:
//! - group 0, binding 0: camera `mat4x4<f32>` uniform (vertex stage)
//! - vertex slot 0: mesh vertices ([`GpuVertex::layout`])
//! - vertex slot 1: world position ([`WgpuSink::instance_layout`])
//!
//! There is one camera buffer, so every draw in a frame sees the camera of
//! the last `draw` call.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::sink::{DrawCall, GpuSink, GpuVertex, MeshHandle, MeshUsage, ReleaseQueue, ShaderId};
use crate::error::{gpu_count, RenderError, RenderResult};

/// Shader location of the per-mesh world position.
pub const WORLD_POSITION_LOCATION: u32 = 8;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    index_count: u32,
    usage: MeshUsage,
}

struct Pipelines {
    solid: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
}

/// Whether new contents can be written into the existing buffers.
///
/// Only dynamic meshes have `COPY_DST`; any mesh that outgrew either buffer
/// is reallocated.
fn fits_in_place(
    usage: MeshUsage,
    vertex_bytes: usize,
    index_bytes: usize,
    vertex_capacity: wgpu::BufferAddress,
    index_capacity: wgpu::BufferAddress,
) -> bool {
    usage == MeshUsage::Dynamic
        && vertex_bytes as u64 <= vertex_capacity
        && index_bytes as u64 <= index_capacity
}

#[derive(Debug, Clone, Copy)]
struct QueuedDraw {
    mesh: u64,
    shader: ShaderId,
    wireframe: bool,
}

/// [`GpuSink`] backed by a wgpu device.
pub struct WgpuSink {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    camera_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    pipelines: Vec<Pipelines>,
    meshes: HashMap<u64, GpuMesh>,
    dropped: ReleaseQueue,
    frame: Vec<QueuedDraw>,
    next_id: u64,
}

impl WgpuSink {
    /// Per-mesh instance attributes.
    pub const INSTANCE_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        WORLD_POSITION_LOCATION => Float32x3,  // world position
    ];

    /// Creates a sink and its camera uniform.
    #[must_use]
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Chunk Camera Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chunk Camera"),
            contents: bytemuck::bytes_of(&terracube_shared::CameraView::IDENTITY),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Chunk Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            device,
            queue,
            camera_layout,
            camera_buffer,
            camera_bind_group,
            pipelines: Vec::new(),
            meshes: HashMap::new(),
            dropped: ReleaseQueue::new(),
            frame: Vec::new(),
            next_id: 0,
        }
    }

    /// Layout of the world-position instance buffer (slot 1).
    #[must_use]
    pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::INSTANCE_ATTRIBS,
        }
    }

    /// Bind group layout pipelines must use at group 0.
    #[must_use]
    pub const fn camera_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_layout
    }

    /// Registers a pipeline and returns its id.
    ///
    /// `wireframe` is used for draws with the wireframe flag set; without it
    /// those draws fall back to `solid`.
    pub fn register_pipeline(
        &mut self,
        solid: wgpu::RenderPipeline,
        wireframe: Option<wgpu::RenderPipeline>,
    ) -> ShaderId {
        let id = ShaderId(self.pipelines.len() as u32);
        self.pipelines.push(Pipelines { solid, wireframe });
        tracing::info!(shader = id.0, "chunk pipeline registered");
        id
    }

    /// Meshes currently resident.
    #[must_use]
    pub fn resident_count(&self) -> usize {
        self.meshes.len()
    }

    /// Draws queued for this frame.
    #[must_use]
    pub fn queued_draws(&self) -> usize {
        self.frame.len()
    }

    /// Records all queued draws into `pass`.
    pub fn encode<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        for draw in &self.frame {
            let (Some(mesh), Some(pipelines)) = (
                self.meshes.get(&draw.mesh),
                self.pipelines.get(draw.shader.0 as usize),
            ) else {
                continue;
            };
            if mesh.index_count == 0 {
                continue;
            }
            let pipeline = if draw.wireframe {
                pipelines.wireframe.as_ref().unwrap_or(&pipelines.solid)
            } else {
                &pipelines.solid
            };
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, mesh.instance_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Clears the draw queue and frees meshes whose handles were dropped.
    /// Call after the frame's pass is submitted.
    pub fn finish_frame(&mut self) {
        self.frame.clear();
        self.reclaim_dropped();
    }

    /// Destroys the buffers of every mesh whose handle was dropped without
    /// release. Returns how many were freed.
    pub fn reclaim_dropped(&mut self) -> usize {
        let ids: Vec<u64> = self.dropped.drain().collect();
        let freed = ids.into_iter().filter(|&id| self.free_mesh(id)).count();
        if freed > 0 {
            tracing::debug!(freed, "reclaimed dropped meshes");
        }
        freed
    }

    fn free_mesh(&mut self, id: u64) -> bool {
        let Some(gpu) = self.meshes.remove(&id) else {
            return false;
        };
        gpu.vertex_buffer.destroy();
        gpu.index_buffer.destroy();
        gpu.instance_buffer.destroy();
        self.frame.retain(|d| d.mesh != id);
        true
    }

    fn buffer_usages(usage: MeshUsage, base: wgpu::BufferUsages) -> wgpu::BufferUsages {
        match usage {
            MeshUsage::Static => base,
            MeshUsage::Dynamic => base | wgpu::BufferUsages::COPY_DST,
        }
    }

    fn create_mesh_buffers(
        &self,
        id: u64,
        vertex_bytes: &[u8],
        indices: &[u32],
        usage: MeshUsage,
    ) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Chunk Mesh {id} Vertices")),
            contents: vertex_bytes,
            usage: Self::buffer_usages(usage, wgpu::BufferUsages::VERTEX),
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Chunk Mesh {id} Indices")),
            contents: bytemuck::cast_slice(indices),
            usage: Self::buffer_usages(usage, wgpu::BufferUsages::INDEX),
        });
        (vertex_buffer, index_buffer)
    }
}

impl<V: GpuVertex> GpuSink<V> for WgpuSink {
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

        let (vertex_buffer, index_buffer) =
            self.create_mesh_buffers(id, bytemuck::cast_slice(vertices), indices, usage);
        let instance_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Chunk Mesh {id} Instance")),
            size: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.meshes.insert(
            id,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                instance_buffer,
                index_count,
                usage,
            },
        );
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
        let id = mesh.id();
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        let gpu = self.meshes.get(&id).ok_or(RenderError::UnknownHandle(id))?;
        let usage = gpu.usage;
        let fits = fits_in_place(
            usage,
            vertex_bytes.len(),
            index_bytes.len(),
            gpu.vertex_buffer.size(),
            gpu.index_buffer.size(),
        );

        let replacement = if fits {
            if !vertex_bytes.is_empty() {
                self.queue.write_buffer(&gpu.vertex_buffer, 0, vertex_bytes);
            }
            if !index_bytes.is_empty() {
                self.queue.write_buffer(&gpu.index_buffer, 0, index_bytes);
            }
            None
        } else {
            Some(self.create_mesh_buffers(id, vertex_bytes, indices, usage))
        };

        if let Some(gpu) = self.meshes.get_mut(&id) {
            if let Some((vertex_buffer, index_buffer)) = replacement {
                gpu.vertex_buffer.destroy();
                gpu.index_buffer.destroy();
                gpu.vertex_buffer = vertex_buffer;
                gpu.index_buffer = index_buffer;
            }
            gpu.index_count = index_count;
        }
        mesh.set_counts(vertex_count, index_count);
        Ok(())
    }

    fn draw(&mut self, mesh: &MeshHandle, call: &DrawCall) -> RenderResult<()> {
        self.reclaim_dropped();
        let gpu = self
            .meshes
            .get(&mesh.id())
            .ok_or(RenderError::UnknownHandle(mesh.id()))?;
        let Some(pipelines) = self.pipelines.get(call.shader.0 as usize) else {
            return Err(RenderError::UnknownShader(call.shader.0));
        };
        if call.wireframe && pipelines.wireframe.is_none() {
            tracing::debug!(shader = call.shader.0, "no wireframe pipeline, drawing solid");
        }

        self.queue.write_buffer(
            &gpu.instance_buffer,
            0,
            bytemuck::bytes_of(&call.world_position),
        );
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&call.camera));

        self.frame.push(QueuedDraw {
            mesh: mesh.id(),
            shader: call.shader,
            wireframe: call.wireframe,
        });
        Ok(())
    }

    fn release(&mut self, mesh: MeshHandle) {
        let id = mesh.into_id();
        if !self.free_mesh(id) {
            tracing::warn!(mesh = id, "release of a mesh this sink does not hold");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_mesh_always_reallocates() {
        assert!(!fits_in_place(MeshUsage::Static, 16, 24, 64, 64));
        assert!(!fits_in_place(MeshUsage::Static, 0, 0, 64, 64));
    }

    #[test]
    fn test_dynamic_mesh_writes_in_place_when_it_fits() {
        assert!(fits_in_place(MeshUsage::Dynamic, 64, 96, 64, 96));
        assert!(fits_in_place(MeshUsage::Dynamic, 0, 0, 64, 96));
        assert!(fits_in_place(MeshUsage::Dynamic, 4, 24, 64, 96));
    }

    #[test]
    fn test_dynamic_mesh_reallocates_when_it_grows() {
        assert!(!fits_in_place(MeshUsage::Dynamic, 68, 96, 64, 96));
        assert!(!fits_in_place(MeshUsage::Dynamic, 64, 100, 64, 96));
    }

    #[test]
    fn test_instance_layout() {
        let layout = WgpuSink::instance_layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes[0].shader_location, WORLD_POSITION_LOCATION);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }
}
