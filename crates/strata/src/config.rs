//! # Session Configuration
//!
//! One TOML file describes a whole headless run:
//!
//! ```toml
//! ticks = 600
//! observer_speed = 0.5
//! start = [8.0, 0.0, 8.0]
//! yaw_degrees = 90.0
//!
//! [world]
//! seed = 42
//! render_distance = 4
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_world::{WorldConfig, WorldError, WorldResult};

/// Configuration of a headless session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// World to simulate.
    pub world: WorldConfig,
    /// Number of ticks to run.
    pub ticks: u32,
    /// Distance the observer walks per tick, in blocks.
    pub observer_speed: f64,
    /// Observer start position. Y is replaced by the ground height.
    pub start: [f64; 3],
    /// Walking direction: 0 faces -Z, 90 faces +X.
    pub yaw_degrees: f64,
    /// Look pitch; negative looks down.
    pub pitch_degrees: f64,
    /// Vertical field of view.
    pub fov_degrees: f32,
    /// Viewport width over height.
    pub aspect: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            ticks: 600,
            observer_speed: 0.5,
            start: [8.0, 0.0, 8.0],
            yaw_degrees: 90.0,
            pitch_degrees: -10.0,
            fov_degrees: 70.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl SessionConfig {
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

    /// Checks the session values, then the world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        let invalid = |msg: &str| Err(WorldError::InvalidConfig(msg.to_owned()));

        if !self.observer_speed.is_finite() || self.observer_speed < 0.0 {
            return invalid("observer_speed must be finite and not negative");
        }
        if self.start.iter().any(|c| !c.is_finite()) {
            return invalid("start must be finite");
        }
        if !self.yaw_degrees.is_finite() || !(-89.0..=89.0).contains(&self.pitch_degrees) {
            return invalid("yaw_degrees must be finite and pitch_degrees in -89..=89");
        }
        if !(f32::EPSILON..180.0).contains(&self.fov_degrees) {
            return invalid("fov_degrees must be in (0, 180)");
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return invalid("aspect must be positive");
        }
        self.world.validate()
    }
}
