//! Terrain parameters, loaded from the `[terrain]` table of the app config.

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};

/// Heightmap terrain parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed.
    pub seed: u64,
    /// Mean surface height in blocks.
    pub base_height: i32,
    /// Peak deviation from `base_height` in blocks.
    pub amplitude: f64,
    /// Horizontal noise frequency (cycles per block).
    pub frequency: f64,
    /// Noise octaves.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Highest world y filled with water.
    pub water_level: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0x7E22_AC0B,
            base_height: 12,
            amplitude: 8.0,
            frequency: 0.02,
            octaves: 4,
            persistence: 0.5,
            water_level: 8,
        }
    }
}

impl TerrainConfig {
    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.octaves == 0 {
            return Err(GenerationError::InvalidConfig("octaves must be at least 1".into()));
        }
        if !(self.frequency > 0.0 && self.frequency.is_finite()) {
            return Err(GenerationError::InvalidConfig(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.amplitude >= 0.0 && self.amplitude.is_finite()) {
            return Err(GenerationError::InvalidConfig(format!(
                "amplitude must be non-negative, got {}",
                self.amplitude
            )));
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(GenerationError::InvalidConfig(format!(
                "persistence must be within [0, 1], got {}",
                self.persistence
            )));
        }
        Ok(())
    }
}
