//! Renderer settings, loaded from the `[renderer]` table of the app config.

use serde::{Deserialize, Serialize};

use crate::gpu::{MeshUsage, ShaderId};

/// Per-chunk rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Upload chunk meshes as dynamic (in-place updatable) buffers.
    pub dynamic_buffers: bool,
    /// Draw chunk meshes as wireframe overlays.
    pub debug_wireframe: bool,
    /// Shader program used for chunk meshes.
    pub shader: ShaderId,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            dynamic_buffers: false,
            debug_wireframe: false,
            shader: ShaderId::default(),
        }
    }
}

impl RendererConfig {
    /// Buffer usage hint derived from `dynamic_buffers`.
    #[inline]
    #[must_use]
    pub const fn mesh_usage(&self) -> MeshUsage {
        if self.dynamic_buffers {
            MeshUsage::Dynamic
        } else {
            MeshUsage::Static
        }
    }
}
