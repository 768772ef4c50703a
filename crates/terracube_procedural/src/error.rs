//! # Generation Error Types

use thiserror::Error;

/// Errors that can occur while filling a chunk.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The caller's block buffer does not hold exactly one chunk.
    #[error("block buffer holds {actual} cells, expected {expected}")]
    BufferSize {
        /// Cells a chunk needs.
        expected: usize,
        /// Cells the caller provided.
        actual: usize,
    },

    /// A terrain parameter is out of range.
    #[error("invalid terrain configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
