//! # Application Config
//!
//! ```toml
//! field_radius = 2      # chunks in x/z: -r..=r
//! field_height = 2      # chunk layers in y: 0..h
//! registry = "blocks.toml"
//!
//! [renderer]
//! dynamic_buffers = false
//! debug_wireframe = false
//!
//! [terrain]
//! seed = 1234
//! base_height = 12
//! ```
//!
//! Every key is optional. A relative `registry` path resolves against the
//! config file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terracube_procedural::TerrainConfig;
use terracube_rendering::{BlockTypeRegistry, RenderError, RendererConfig};

use crate::error::{TerracubeError, TerracubeResult};

/// Largest accepted `field_radius`.
pub const MAX_FIELD_RADIUS: i32 = 32;
/// Largest accepted `field_height`.
pub const MAX_FIELD_HEIGHT: i32 = 16;

/// Settings for the whole application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerracubeConfig {
    /// Chunks extend from `-field_radius` to `field_radius` in x and z.
    pub field_radius: i32,
    /// Chunk layers from y = 0 upward.
    pub field_height: i32,
    /// Block registry file; the built-in table when absent.
    pub registry: Option<PathBuf>,
    /// Chunk rendering.
    pub renderer: RendererConfig,
    /// Terrain generation.
    pub terrain: TerrainConfig,
}

impl Default for TerracubeConfig {
    fn default() -> Self {
        Self {
            field_radius: 2,
            field_height: 2,
            registry: None,
            renderer: RendererConfig::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl TerracubeConfig {
    /// Parses and validates a config.
    ///
    /// # Errors
    ///
    /// Returns `Render(Toml)` on malformed input and `Render(Config)` or
    /// `Render(Generation)` on out-of-range values.
    pub fn from_toml_str(source: &str) -> TerracubeResult<Self> {
        let config: Self = toml::from_str(source).map_err(RenderError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`TerracubeConfig::from_toml_str`].
    pub fn load(path: &Path) -> TerracubeResult<Self> {
        let source = read(path)?;
        let mut config = Self::from_toml_str(&source)?;
        if let (Some(registry), Some(dir)) = (config.registry.as_mut(), path.parent()) {
            if registry.is_relative() {
                *registry = dir.join(&*registry);
            }
        }
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// See [`TerracubeConfig::from_toml_str`].
    pub fn validate(&self) -> TerracubeResult<()> {
        if !(0..=MAX_FIELD_RADIUS).contains(&self.field_radius) {
            return Err(RenderError::Config(format!(
                "field_radius must be in 0..={MAX_FIELD_RADIUS}, got {}",
                self.field_radius
            ))
            .into());
        }
        if !(1..=MAX_FIELD_HEIGHT).contains(&self.field_height) {
            return Err(RenderError::Config(format!(
                "field_height must be in 1..={MAX_FIELD_HEIGHT}, got {}",
                self.field_height
            ))
            .into());
        }
        self.terrain.validate().map_err(RenderError::from)?;
        Ok(())
    }

    /// The configured block registry, or the built-in one.
    ///
    /// # Errors
    ///
    /// `Io` if the registry file cannot be read, `Render` if it is invalid.
    pub fn load_registry(&self) -> TerracubeResult<BlockTypeRegistry> {
        match &self.registry {
            Some(path) => Ok(BlockTypeRegistry::from_toml_str(&read(path)?)?),
            None => Ok(BlockTypeRegistry::standard()),
        }
    }
}

fn read(path: &Path) -> TerracubeResult<String> {
    std::fs::read_to_string(path).map_err(|source| TerracubeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
