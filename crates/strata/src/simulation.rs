//! # Tick Orchestration
//!
//! Every tick runs the same three phases against the shared world, in order:
//! streaming around the observer, one fluid update, then culling. Each phase
//! completes before the next starts, so a tick always sees a consistent world.
//!
//! The world sits behind a [`parking_lot::RwLock`] so a mesher or save thread
//! can read it between ticks through [`Simulation::world_handle`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use strata_culling::camera::Mat4;
use strata_culling::{CullStats, FrustumCuller};
use strata_world::{ChunkCoord, FluidSimulator, FluidTickStats, World, WorldConfig};

/// Target tick time for 60 ticks per second.
pub const TARGET_TICK_TIME: Duration = Duration::from_micros(16_666);

/// Tick time above which a warning is logged.
pub const MAX_TICK_TIME: Duration = Duration::from_millis(33);

fn elapsed_us(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}

/// What one tick did and how long it took.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick number, starting at 0.
    pub tick: u64,
    /// Chunks generated by streaming.
    pub generated: usize,
    /// Chunks evicted by streaming.
    pub evicted: usize,
    /// Fluid update counts.
    pub fluid: FluidTickStats,
    /// Culling counts.
    pub cull: CullStats,
    /// Chunks whose contents changed since the previous tick.
    pub dirty_chunks: usize,
    /// Streaming time in microseconds.
    pub stream_us: u64,
    /// Fluid update time in microseconds.
    pub fluid_us: u64,
    /// Culling time in microseconds.
    pub cull_us: u64,
    /// Total tick time in microseconds.
    pub total_us: u64,
}

/// The tick orchestrator.
///
/// Owns the world and the per-tick systems.
pub struct Simulation {
    world: Arc<RwLock<World>>,
    fluids: FluidSimulator,
    culler: FrustumCuller,
    /// Chunks that passed the last cull, sorted.
    visible: Vec<ChunkCoord>,
    /// Chunks drained dirty by the last tick, sorted.
    dirty: Vec<ChunkCoord>,
    tick_count: u64,
    stats_accumulator: TickStatsAccumulator,
}

impl Simulation {
    /// Creates a simulation over a fresh world.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self::with_world(World::new(config))
    }

    /// Creates a simulation over an existing world, such as one restored
    /// from a snapshot.
    #[must_use]
    pub fn with_world(world: World) -> Self {
        Self {
            world: Arc::new(RwLock::new(world)),
            fluids: FluidSimulator::new(),
            culler: FrustumCuller::new(),
            visible: Vec::new(),
            dirty: Vec::new(),
            tick_count: 0,
            stats_accumulator: TickStatsAccumulator::new(),
        }
    }

    /// Runs one tick for an observer at `observer` seeing through
    /// `view_projection`.
    pub fn tick(&mut self, observer: [f64; 3], view_projection: &Mat4) -> TickStats {
        let tick_start = Instant::now();
        let mut world = self.world.write();

        let phase = Instant::now();
        let report = world.ensure_chunks_around(observer);
        let stream_us = elapsed_us(phase);

        let phase = Instant::now();
        let fluid = self.fluids.update(&mut world);
        let fluid_us = elapsed_us(phase);

        let phase = Instant::now();
        self.culler.update(view_projection);
        self.visible = self.culler.visible_chunks(&world);
        let cull = self.culler.take_stats();
        self.dirty = world.take_dirty_chunks();
        let cull_us = elapsed_us(phase);

        drop(world);

        let stats = TickStats {
            tick: self.tick_count,
            generated: report.generated.len(),
            evicted: report.evicted.len(),
            fluid,
            cull,
            dirty_chunks: self.dirty.len(),
            stream_us,
            fluid_us,
            cull_us,
            total_us: elapsed_us(tick_start),
        };
        self.end_tick(stats);
        stats
    }

    fn end_tick(&mut self, stats: TickStats) {
        self.tick_count += 1;
        self.stats_accumulator.record(stats);

        if stats.total_us > MAX_TICK_TIME.as_micros() as u64 {
            tracing::warn!(
                "tick {} exceeded budget: {:.2}ms (stream {:.2}ms, fluid {:.2}ms, cull {:.2}ms)",
                stats.tick,
                stats.total_us as f64 / 1000.0,
                stats.stream_us as f64 / 1000.0,
                stats.fluid_us as f64 / 1000.0,
                stats.cull_us as f64 / 1000.0
            );
        }
    }

    /// Number of ticks run.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Chunks that passed the last cull, sorted.
    #[must_use]
    pub fn visible(&self) -> &[ChunkCoord] {
        &self.visible
    }

    /// Chunks whose contents changed during the last tick, sorted. This is
    /// the set a mesher would rebuild.
    #[must_use]
    pub fn dirty(&self) -> &[ChunkCoord] {
        &self.dirty
    }

    /// Lifetime fluid counts.
    #[must_use]
    pub const fn fluid_totals(&self) -> &FluidTickStats {
        self.fluids.totals()
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &TickStatsAccumulator {
        &self.stats_accumulator
    }

    /// Gets a clone of the world handle for sharing with other threads.
    #[must_use]
    pub fn world_handle(&self) -> Arc<RwLock<World>> {
        Arc::clone(&self.world)
    }
}

/// Accumulator for tick statistics.
#[derive(Clone, Debug)]
pub struct TickStatsAccumulator {
    /// Total ticks recorded.
    pub ticks_recorded: u64,
    /// Sum of total tick times.
    pub total_us_sum: u64,
    /// Sum of streaming times.
    pub stream_us_sum: u64,
    /// Sum of fluid times.
    pub fluid_us_sum: u64,
    /// Sum of culling times.
    pub cull_us_sum: u64,
    /// Min tick time.
    pub min_tick_us: u64,
    /// Max tick time.
    pub max_tick_us: u64,
    /// Ticks that exceeded the target.
    pub ticks_over_budget: u64,
    /// Chunks generated across all ticks.
    pub chunks_generated: u64,
    /// Chunks evicted across all ticks.
    pub chunks_evicted: u64,
    /// Sum of visible chunk counts.
    pub visible_sum: u64,
}

impl TickStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks_recorded: 0,
            total_us_sum: 0,
            stream_us_sum: 0,
            fluid_us_sum: 0,
            cull_us_sum: 0,
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            ticks_over_budget: 0,
            chunks_generated: 0,
            chunks_evicted: 0,
            visible_sum: 0,
        }
    }

    /// Records a tick's statistics.
    pub fn record(&mut self, stats: TickStats) {
        self.ticks_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.stream_us_sum += stats.stream_us;
        self.fluid_us_sum += stats.fluid_us;
        self.cull_us_sum += stats.cull_us;
        self.min_tick_us = self.min_tick_us.min(stats.total_us);
        self.max_tick_us = self.max_tick_us.max(stats.total_us);
        self.chunks_generated += stats.generated as u64;
        self.chunks_evicted += stats.evicted as u64;
        self.visible_sum += u64::from(stats.cull.visible);

        if stats.total_us > TARGET_TICK_TIME.as_micros() as u64 {
            self.ticks_over_budget += 1;
        }
    }

    fn avg_ms(&self, sum_us: u64) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        (sum_us as f64 / self.ticks_recorded as f64) / 1000.0
    }

    /// Returns average tick time in milliseconds.
    #[must_use]
    pub fn avg_tick_ms(&self) -> f64 {
        self.avg_ms(self.total_us_sum)
    }

    /// Returns the tick rate the average tick time allows.
    #[must_use]
    pub fn avg_tps(&self) -> f64 {
        let avg_ms = self.avg_tick_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of ticks over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.ticks_over_budget as f64 / self.ticks_recorded as f64
    }

    /// Average number of visible chunks per tick.
    #[must_use]
    pub fn avg_visible(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.visible_sum as f64 / self.ticks_recorded as f64
    }

    /// Logs a summary at `info`.
    pub fn log_summary(&self) {
        if self.ticks_recorded == 0 {
            tracing::info!("no ticks recorded");
            return;
        }
        tracing::info!(
            "{} ticks: avg {:.3}ms ({:.1} TPS), min {:.3}ms, max {:.3}ms, {} over budget ({:.1}%)",
            self.ticks_recorded,
            self.avg_tick_ms(),
            self.avg_tps(),
            self.min_tick_us as f64 / 1000.0,
            self.max_tick_us as f64 / 1000.0,
            self.ticks_over_budget,
            self.over_budget_ratio() * 100.0
        );
        tracing::info!(
            "breakdown: stream {:.3}ms, fluid {:.3}ms, cull {:.3}ms",
            self.avg_ms(self.stream_us_sum),
            self.avg_ms(self.fluid_us_sum),
            self.avg_ms(self.cull_us_sum)
        );
        tracing::info!(
            "chunks: {} generated, {} evicted, {:.1} visible per tick",
            self.chunks_generated,
            self.chunks_evicted,
            self.avg_visible()
        );
    }
}

impl Default for TickStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_culling::camera::view_projection;
    use strata_world::{BlockPos, BlockType, WorldSeed};

    /// Looking east and 45 degrees down from above chunk (0, 0).
    fn looking_east() -> Mat4 {
        view_projection([8.0, 40.0, 8.0], [9.0, 39.0, 8.0], 1.2, 1.0, 0.1, 100.0)
    }

    /// Nine chunks, no generated water to keep the fluid queue quiet.
    fn small_world(seed: u64) -> WorldConfig {
        let mut config = WorldConfig::with_seed(WorldSeed::new(seed)).with_render_distance(1);
        config.terrain.water_chance = 0.0;
        config
    }

    #[test]
    fn test_simulation_creation() {
        let simulation = Simulation::new(small_world(1));
        assert_eq!(simulation.tick_count(), 0);
        assert!(simulation.visible().is_empty());
        assert_eq!(simulation.world_handle().read().loaded_chunk_count(), 0);
    }

    #[test]
    fn test_first_tick_streams_then_culls() {
        let mut simulation = Simulation::new(small_world(42));
        let stats = simulation.tick([8.0, 40.0, 8.0], &looking_east());

        assert_eq!(stats.tick, 0);
        assert_eq!(stats.generated, 9);
        assert_eq!(stats.evicted, 0);
        // Fresh chunks start dirty and are drained in the same tick.
        assert_eq!(stats.dirty_chunks, 9);
        assert_eq!(
            stats.cull.visible as usize + stats.cull.hidden as usize + stats.cull.empty as usize,
            9
        );
        assert_eq!(simulation.visible().len(), stats.cull.visible as usize);
        assert!(simulation.visible().contains(&ChunkCoord::new(1, 0)));
        assert!(!simulation.visible().contains(&ChunkCoord::new(-1, 0)));
        assert_eq!(simulation.tick_count(), 1);
    }

    #[test]
    fn test_second_tick_is_quiet() {
        let mut simulation = Simulation::new(small_world(42));
        simulation.tick([8.0, 40.0, 8.0], &looking_east());
        let stats = simulation.tick([8.0, 40.0, 8.0], &looking_east());

        assert_eq!(stats.generated, 0);
        assert_eq!(stats.evicted, 0);
        assert_eq!(stats.tick, 1);
        assert_eq!(simulation.stats().chunks_generated, 9);
    }

    #[test]
    fn test_edit_between_ticks_is_dirty() {
        let mut simulation = Simulation::new(small_world(42));
        simulation.tick([8.0, 40.0, 8.0], &looking_east());

        simulation
            .world_handle()
            .write()
            .add_block(BlockPos::new(20, 200, 3), BlockType::Water);
        let stats = simulation.tick([8.0, 40.0, 8.0], &looking_east());

        assert_eq!(stats.fluid.moved_down, 1);
        assert_eq!(simulation.dirty(), &[ChunkCoord::new(1, 0)]);
        assert_eq!(simulation.fluid_totals().moved_down, 1);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = TickStatsAccumulator::new();

        for i in 0..100 {
            acc.record(TickStats {
                tick: i,
                total_us: 10_000 + (i * 100),
                stream_us: 5000,
                fluid_us: 1000,
                cull_us: 2000,
                generated: 1,
                ..TickStats::default()
            });
        }

        assert_eq!(acc.ticks_recorded, 100);
        assert_eq!(acc.chunks_generated, 100);
        assert!(acc.avg_tps() > 50.0);
        assert!(acc.avg_tps() < 100.0);
        assert_eq!(acc.min_tick_us, 10_000);
        assert_eq!(acc.max_tick_us, 19_900);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = TickStatsAccumulator::default();
        assert!(acc.avg_tick_ms().abs() < f64::EPSILON);
        assert!(acc.avg_tps().abs() < f64::EPSILON);
        assert!(acc.over_budget_ratio().abs() < f64::EPSILON);
    }
}
