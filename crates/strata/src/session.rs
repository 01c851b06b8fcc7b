//! # Headless Session
//!
//! A scripted observer walking through a [`Simulation`] for a fixed number
//! of ticks.

use strata_culling::camera::Mat4;

use crate::config::SessionConfig;
use crate::observer::Observer;
use crate::simulation::{Simulation, TickStats, TickStatsAccumulator};

/// One run of the simulation.
pub struct Session {
    config: SessionConfig,
    observer: Observer,
    simulation: Simulation,
}

impl Session {
    /// Creates a session. No chunk exists until the first step.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let observer = Observer::from_config(&config);
        let simulation = Simulation::new(config.world.clone());
        Self {
            config,
            observer,
            simulation,
        }
    }

    /// Runs one tick at the observer's position, stands the observer on
    /// the freshly streamed ground, then walks it forward.
    pub fn step(&mut self) -> TickStats {
        let view_projection = self.view_projection();
        let stats = self.simulation.tick(self.observer.position, &view_projection);

        let world = self.simulation.world_handle();
        self.observer.settle_on(&world.read());
        self.observer.advance();

        if stats.tick % 100 == 0 {
            tracing::debug!(
                "tick {}: observer at ({:.1}, {:.1}, {:.1}), {} visible, {} dirty",
                stats.tick,
                self.observer.position[0],
                self.observer.position[1],
                self.observer.position[2],
                stats.cull.visible,
                stats.dirty_chunks
            );
        }
        stats
    }

    /// Runs every configured tick and returns the accumulated statistics.
    pub fn run(&mut self) -> &TickStatsAccumulator {
        tracing::info!(
            "running {} ticks, seed {}, render distance {}",
            self.config.ticks,
            self.config.world.seed.value(),
            self.config.world.render_distance
        );
        for _ in 0..self.config.ticks {
            self.step();
        }
        self.simulation.stats()
    }

    fn view_projection(&self) -> Mat4 {
        self.observer.view_projection(
            self.config.fov_degrees,
            self.config.aspect,
            self.config.world.render_distance,
        )
    }

    /// The configuration this session runs.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The observer.
    #[must_use]
    pub const fn observer(&self) -> &Observer {
        &self.observer
    }

    /// The simulation.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}
