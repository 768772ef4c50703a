//! # TERRACUBE
//!
//! Application layer over the chunk pipeline.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  TerracubeConfig ──▶ ChunkField ──▶ Chunk × N            │
//! │                          │            │                  │
//! │            TerrainGenerator      GpuSink (shared)        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: file-backed settings for every layer
//! - `error`: application errors
//! - `field`: a block of chunks driven as one unit

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod field;

pub use terracube_procedural as procedural;
pub use terracube_rendering as rendering;
pub use terracube_shared as shared;

pub use config::TerracubeConfig;
pub use error::{TerracubeError, TerracubeResult};
pub use field::{ChunkField, FieldStats};
