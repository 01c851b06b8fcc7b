//! # Scripted Observer
//!
//! Stands in for the player: walks a straight line at a fixed speed, keeps
//! its eyes above the ground and produces the view-projection the culler
//! consumes.

use strata_culling::camera::{self, Mat4};
use strata_world::{World, CHUNK_SIZE};

use crate::config::SessionConfig;

/// Eye height above the block the observer stands on.
pub const EYE_HEIGHT: f64 = 1.6;

/// Near clip plane distance.
pub const NEAR_PLANE: f32 = 0.1;

/// Look direction from yaw and pitch in degrees.
///
/// Yaw 0 faces -Z, yaw 90 faces +X, positive pitch looks up.
#[must_use]
pub fn look_direction(yaw: f64, pitch: f64) -> [f64; 3] {
    let yaw_rad = yaw.to_radians();
    let pitch_rad = pitch.to_radians();
    [
        yaw_rad.sin() * pitch_rad.cos(),
        pitch_rad.sin(),
        -yaw_rad.cos() * pitch_rad.cos(),
    ]
}

/// A point of view moving through the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    /// Eye position.
    pub position: [f64; 3],
    /// Heading in degrees.
    pub yaw: f64,
    /// Look pitch in degrees.
    pub pitch: f64,
    /// Blocks walked per step.
    pub speed: f64,
}

impl Observer {
    /// Creates an observer.
    #[must_use]
    pub const fn new(position: [f64; 3], yaw: f64, pitch: f64, speed: f64) -> Self {
        Self {
            position,
            yaw,
            pitch,
            speed,
        }
    }

    /// Observer described by a session config.
    #[must_use]
    pub const fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.start,
            config.yaw_degrees,
            config.pitch_degrees,
            config.observer_speed,
        )
    }

    /// Moves `speed` blocks along the heading, ignoring pitch.
    pub fn advance(&mut self) {
        let [dx, _, dz] = look_direction(self.yaw, 0.0);
        self.position[0] += dx * self.speed;
        self.position[2] += dz * self.speed;
    }

    /// Puts the eyes [`EYE_HEIGHT`] above the top block of the current
    /// column. An empty column counts as height 0.
    pub fn settle_on(&mut self, world: &World) {
        let x = self.position[0].floor() as i32;
        let z = self.position[2].floor() as i32;
        self.position[1] = f64::from(world.get_height(x, z) + 1) + EYE_HEIGHT;
    }

    /// View-projection reaching just past the loaded square.
    #[must_use]
    pub fn view_projection(&self, fov_degrees: f32, aspect: f32, render_distance: i32) -> Mat4 {
        let eye = self.position.map(|c| c as f32);
        let dir = look_direction(self.yaw, self.pitch).map(|c| c as f32);
        let target = [eye[0] + dir[0], eye[1] + dir[1], eye[2] + dir[2]];
        let far = ((render_distance + 1) * CHUNK_SIZE) as f32 * 1.5;
        camera::view_projection(eye, target, fov_degrees.to_radians(), aspect, NEAR_PLANE, far)
    }
}
