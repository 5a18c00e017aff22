// config.rs - Tuning inputs for the backdrop
//
// Read once per mount/resize to size the entity populations. The renderer
// never writes back into its config.

use serde::{Deserialize, Serialize};

use crate::error::{BackdropError, BackdropResult};

/// Upper bound per population, keeps per-frame work in the low hundreds.
pub const MAX_POPULATION: usize = 2000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundConfig {
    /// Multiplier applied to every paint alpha, 0..=1.
    pub opacity: f64,
    /// Ambient motes drifting through the upper part of the page.
    pub particle_count: usize,
    /// Larger bubbles rising out of the river band.
    pub bubble_count: usize,
    /// Minimum fish; desktop widths raise the floor.
    pub fish_count: usize,
    pub wave_lines: usize,
    /// Stacking order applied by the web host. Page content must sit above it.
    pub z_index: i32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            opacity: 0.8,
            particle_count: 55,
            bubble_count: 12,
            fish_count: 3,
            wave_lines: 4,
            z_index: 0,
        }
    }
}

impl BackgroundConfig {
    /// Tuning used by the persistent root layout, mounted once for every route.
    pub fn site_root() -> Self {
        Self {
            opacity: 0.8,
            particle_count: 85,
            bubble_count: 24,
            fish_count: 5,
            wave_lines: 5,
            z_index: 0,
        }
    }

    /// Parse a camelCase JSON object. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> BackdropResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BackdropResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(BackdropError::invalid_config(format!(
                "opacity must be within 0..=1, got {}",
                self.opacity
            )));
        }

        let counts = [
            ("particleCount", self.particle_count),
            ("bubbleCount", self.bubble_count),
            ("fishCount", self.fish_count),
            ("waveLines", self.wave_lines),
        ];
        for (name, n) in counts {
            if n > MAX_POPULATION {
                return Err(BackdropError::invalid_config(format!(
                    "{name} must be at most {MAX_POPULATION}, got {n}"
                )));
            }
        }
        Ok(())
    }
}
