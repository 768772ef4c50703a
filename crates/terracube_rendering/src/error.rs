//! # Render Error Types
//!
//! All errors that can occur between terrain fill and GPU hand-off.

use terracube_procedural::GenerationError;
use terracube_shared::{BlockType, Vec3};
use thiserror::Error;

/// Errors that can occur in meshing, chunk lifecycle and GPU sinks.
#[derive(Error, Debug)]
pub enum RenderError {
    /// An active block has a type with no atlas entry.
    ///
    /// This is a content bug, not a runtime condition: the mesh is discarded
    /// and callers are expected to abort.
    #[error("block type `{0}` has no texture atlas entry")]
    UnregisteredBlockType(BlockType),

    /// An atlas cell cannot be encoded in the packed vertex.
    #[error("atlas cell ({column}, {row}) for `{block_type}` is out of range (max {max})")]
    InvalidAtlasCell {
        /// Block type being registered.
        block_type: BlockType,
        /// Atlas column.
        column: u32,
        /// Atlas row.
        row: u32,
        /// Largest accepted column/row.
        max: u32,
    },

    /// `setup` was called on a chunk that is already set up.
    #[error("chunk at {0:?} is already set up; unload it first")]
    AlreadySetUp(Vec3),

    /// The operation needs a set-up chunk.
    #[error("chunk at {0:?} has not been set up")]
    NotSetUp(Vec3),

    /// Block coordinates outside the chunk.
    #[error("block ({x}, {y}, {z}) is outside the chunk")]
    OutOfBounds {
        /// X coordinate.
        x: usize,
        /// Y coordinate.
        y: usize,
        /// Z coordinate.
        z: usize,
    },

    /// A sink was handed a mesh handle it did not issue.
    #[error("mesh handle {0} is not known to this sink")]
    UnknownHandle(u64),

    /// A draw referenced a shader that was never registered.
    #[error("shader {0} is not registered")]
    UnknownShader(u32),

    /// A buffer has more elements than a GPU index can address.
    #[error("buffer of {0} elements exceeds the u32 range")]
    BufferTooLarge(usize),

    /// Terrain fill failed.
    #[error("terrain generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A config file could not be parsed.
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A config value is semantically wrong.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Converts a buffer length to a GPU count.
pub(crate) fn gpu_count(len: usize) -> RenderResult<u32> {
    u32::try_from(len).map_err(|_| RenderError::BufferTooLarge(len))
}
