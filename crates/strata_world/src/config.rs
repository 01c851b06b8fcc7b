//! # World Configuration
//!
//! Everything tunable about a world lives here and can be loaded from TOML:
//!
//! ```toml
//! seed = 42
//! render_distance = 4
//!
//! [terrain]
//! height_base = 20
//! height_amplitude = 15
//! cave_threshold = 0.7
//! ```
//!
//! Missing keys fall back to the defaults below, which reproduce the
//! classic 20 +/- 15 block terrain.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::WORLD_CEILING;
use crate::error::{WorldError, WorldResult};
use crate::noise::{NoiseParams, WorldSeed};

/// Largest render distance accepted. Generation cost grows with its square.
pub const MAX_RENDER_DISTANCE: i32 = 32;

/// Ore thresholds, checked rarest first. A stone cell becomes the first ore
/// whose threshold the ore noise strictly exceeds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreThresholds {
    /// Diamond threshold.
    pub diamond: f64,
    /// Gold threshold.
    pub gold: f64,
    /// Iron threshold.
    pub iron: f64,
    /// Coal threshold.
    pub coal: f64,
}

impl Default for OreThresholds {
    fn default() -> Self {
        Self {
            diamond: 0.9,
            gold: 0.8,
            iron: 0.7,
            coal: 0.6,
        }
    }
}

/// Terrain generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Column height at noise value zero.
    pub height_base: i32,
    /// Height swing for noise values of +/-1.
    pub height_amplitude: f64,
    /// Height field sampling.
    pub height_noise: NoiseParams,
    /// Grass/sand field sampling. Positive means grass.
    pub surface_noise: NoiseParams,
    /// Number of dirt layers under the surface block.
    pub dirt_depth: i32,
    /// Cave field sampling.
    pub cave_noise: NoiseParams,
    /// Stone is carved where the cave field exceeds this.
    pub cave_threshold: f64,
    /// Ore field sampling.
    pub ore_noise: NoiseParams,
    /// Ore thresholds.
    pub ores: OreThresholds,
    /// Lowest Y (inclusive) touched by caves and ores.
    pub underground_min_y: i32,
    /// Highest Y (exclusive) touched by caves and ores.
    pub underground_max_y: i32,
    /// Tree placement attempts per chunk.
    pub tree_attempts: u32,
    /// Shortest trunk.
    pub trunk_min: i32,
    /// Tallest trunk.
    pub trunk_max: i32,
    /// Chance a chunk gets a water body.
    pub water_chance: f64,
    /// Lowest water level (exclusive top of the flood).
    pub water_level_min: i32,
    /// Highest water level.
    pub water_level_max: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            height_base: 20,
            height_amplitude: 15.0,
            height_noise: NoiseParams::new([50.0, 1.0, 50.0], 6),
            surface_noise: NoiseParams::new([100.0, 1.0, 100.0], 3),
            dirt_depth: 3,
            cave_noise: NoiseParams::new([50.0, 25.0, 50.0], 3),
            cave_threshold: 0.7,
            ore_noise: NoiseParams::new([10.0, 10.0, 10.0], 3),
            ores: OreThresholds::default(),
            underground_min_y: 1,
            underground_max_y: 64,
            tree_attempts: 5,
            trunk_min: 4,
            trunk_max: 6,
            water_chance: 0.2,
            water_level_min: 5,
            water_level_max: 15,
        }
    }
}

impl TerrainConfig {
    /// Taller 35 +/- 30 terrain variant.
    #[must_use]
    pub fn tall() -> Self {
        Self {
            height_base: 35,
            height_amplitude: 30.0,
            ..Self::default()
        }
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        let invalid = |msg: &str| Err(WorldError::InvalidConfig(msg.to_owned()));

        for (name, params) in [
            ("height_noise", &self.height_noise),
            ("surface_noise", &self.surface_noise),
            ("cave_noise", &self.cave_noise),
            ("ore_noise", &self.ore_noise),
        ] {
            if !params.is_valid() {
                return invalid(&format!("{name} needs octaves > 0 and finite, non-zero scales"));
            }
        }
        if !(1..=WORLD_CEILING).contains(&self.height_base) || !self.height_amplitude.is_finite() {
            return invalid("height_base must be in 1..=255 and height_amplitude finite");
        }
        if self.dirt_depth < 0 {
            return invalid("dirt_depth must not be negative");
        }
        let ores = &self.ores;
        if !(ores.diamond >= ores.gold && ores.gold >= ores.iron && ores.iron >= ores.coal) {
            return invalid("ore thresholds must descend diamond >= gold >= iron >= coal");
        }
        if self.underground_min_y < 0 || self.underground_max_y > WORLD_CEILING + 1 {
            return invalid("underground range must stay inside the world");
        }
        if self.trunk_min < 1 || self.trunk_min > self.trunk_max {
            return invalid("trunk_min must be >= 1 and <= trunk_max");
        }
        if !(0.0..=1.0).contains(&self.water_chance) {
            return invalid("water_chance must be a probability");
        }
        if self.water_level_min < 0 || self.water_level_min > self.water_level_max {
            return invalid("water levels must satisfy 0 <= min <= max");
        }
        Ok(())
    }
}

/// Configuration of a whole world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed every generated chunk derives from.
    pub seed: WorldSeed,
    /// Chebyshev radius, in chunks, kept loaded around the observer.
    pub render_distance: i32,
    /// Terrain parameters.
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            render_distance: 4,
            terrain: TerrainConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default configuration with the given seed.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Larger view radius for a real session.
    #[must_use]
    pub fn production(seed: WorldSeed) -> Self {
        Self {
            seed,
            render_distance: 8,
            terrain: TerrainConfig::default(),
        }
    }

    /// Sets the render distance.
    #[must_use]
    pub const fn with_render_distance(mut self, render_distance: i32) -> Self {
        self.render_distance = render_distance;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        if !(0..=MAX_RENDER_DISTANCE).contains(&self.render_distance) {
            return Err(WorldError::InvalidConfig(format!(
                "render_distance must be in 0..={MAX_RENDER_DISTANCE}, got {}",
                self.render_distance
            )));
        }
        self.terrain.validate()
    }
}
