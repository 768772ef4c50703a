//! # GPU Hand-off
//!
//! The mesher never talks to a graphics API directly. Chunks hand vertex
//! and index buffers to a [`GpuSink`] and get back an owned [`MeshHandle`];
//! drawing and release go through the same sink. A handle dropped without
//! release is freed by the sink on its next upload or draw.
//!
//! - [`WgpuSink`]: real buffers on a `wgpu::Device`.
//! - [`HeadlessSink`]: records everything in memory, for tests and tools.

pub mod headless;
pub mod sink;
pub mod wgpu_sink;

pub use headless::{DrawRecord, HeadlessSink};
pub use sink::{DrawCall, GpuSink, GpuVertex, MeshHandle, MeshUsage, ReleaseQueue, ShaderId};
pub use wgpu_sink::WgpuSink;
