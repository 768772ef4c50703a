//! Application error types.

use std::path::PathBuf;

use terracube_rendering::RenderError;
use thiserror::Error;

/// Errors surfaced by the application layer.
#[derive(Error, Debug)]
pub enum TerracubeError {
    /// A config or registry file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A world block coordinate outside every chunk of the field.
    #[error("block {0:?} is outside the chunk field")]
    OutsideField([i32; 3]),

    /// Meshing, lifecycle, sink or config failure.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for application operations.
pub type TerracubeResult<T> = Result<T, TerracubeError>;
