//! # TERRACUBE Procedural Generation
//!
//! Deterministic terrain fill for chunks.
//!
//! The renderer treats generation as a black box: it hands a generator the
//! chunk origin (in block coordinates) and a flat block array, and expects
//! every cell to come back initialized.
//!
//! ## Core Components
//!
//! - `SimplexNoise`: 2D noise with fractal octaves
//! - `TerrainGenerator`: the fill contract the renderer depends on
//! - `HeightmapGenerator`: rolling hills, beaches and lakes
//! - `FlatGenerator`: a fixed-height slab, for tests and debugging
//!
//! ## Example
//!
//! ```rust
//! use terracube_procedural::{HeightmapGenerator, TerrainConfig, TerrainGenerator};
//! use terracube_shared::{Block, CHUNK_VOLUME};
//!
//! let generator = HeightmapGenerator::new(TerrainConfig::default());
//! let mut blocks = vec![Block::EMPTY; CHUNK_VOLUME];
//! generator.generate_chunk([0, 0, 0], &mut blocks).unwrap();
//! assert!(blocks.iter().any(|b| b.active));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod generator;
pub mod noise;

pub use config::TerrainConfig;
pub use error::{GenerationError, GenerationResult};
pub use generator::{FlatGenerator, HeightmapGenerator, TerrainGenerator};
pub use noise::{SimplexNoise, WorldSeed};
