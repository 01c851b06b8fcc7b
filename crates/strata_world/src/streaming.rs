//! # Chunk Streaming
//!
//! Keeps the square of chunks within `render_distance` (Chebyshev) of the
//! observer loaded and drops everything else.
//!
//! Streaming is idempotent: a second pass with the observer in the same
//! chunk finds nothing missing and nothing out of range, so it does no work.
//! Chunks are generated nearest ring first, then by X, then by Z.

use crate::chunk::ChunkCoord;
use crate::world::World;

/// Result of one streaming pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunk the observer stood in.
    pub center: ChunkCoord,
    /// Chunks generated, in generation order.
    pub generated: Vec<ChunkCoord>,
    /// Chunks evicted, sorted.
    pub evicted: Vec<ChunkCoord>,
}

impl StreamingReport {
    /// Returns true if the pass changed nothing.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.generated.is_empty() && self.evicted.is_empty()
    }
}

/// Every chunk within `radius` of `center`, nearest ring first.
///
/// Near the edge of the block grid the square is cut off: chunks beyond
/// [`MIN_CHUNK`](crate::chunk::MIN_CHUNK)..=[`MAX_CHUNK`](crate::chunk::MAX_CHUNK)
/// do not exist.
#[must_use]
pub fn chunks_in_range(center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
    let radius = radius.max(0);
    let mut coords: Vec<_> = (-radius..=radius)
        .flat_map(|dx| (-radius..=radius).filter_map(move |dz| center.offset(dx, dz)))
        .collect();
    coords.sort_unstable_by_key(|c| (center.chebyshev_distance(*c), c.x, c.z));
    coords
}

impl World {
    /// Loads every chunk within render distance of `observer` and evicts the
    /// ones beyond it.
    ///
    /// Only X and Z of the observer matter; they are floored to a chunk.
    ///
    /// # Panics
    ///
    /// Panics if the observer's X or Z is not finite.
    pub fn ensure_chunks_around(&mut self, observer: [f64; 3]) -> StreamingReport {
        let center = ChunkCoord::from_world_f64(observer[0], observer[2]);
        self.stream_to(center)
    }

    /// Streaming pass centred on a chunk.
    pub fn stream_to(&mut self, center: ChunkCoord) -> StreamingReport {
        let radius = self.config.render_distance;
        if self.center != Some(center) {
            tracing::trace!("observer entered chunk [{}, {}]", center.x, center.z);
        }
        self.center = Some(center);

        let mut evicted: Vec<_> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.chebyshev_distance(center) > radius)
            .collect();
        evicted.sort_unstable();
        for coord in &evicted {
            self.unload_chunk(*coord);
        }
        self.evicted_this_session += evicted.len() as u64;

        let generated: Vec<_> = chunks_in_range(center, radius)
            .into_iter()
            .filter(|coord| self.generate_chunk(*coord))
            .collect();

        let report = StreamingReport {
            center,
            generated,
            evicted,
        };
        if !report.is_idle() {
            tracing::debug!(
                "streamed around [{}, {}]: {} generated, {} evicted, {} loaded",
                center.x,
                center.z,
                report.generated.len(),
                report.evicted.len(),
                self.chunks.len()
            );
        }
        report
    }

    /// Chunk the last streaming pass was centred on.
    #[must_use]
    pub const fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::noise::WorldSeed;

    fn world(render_distance: i32) -> World {
        World::new(WorldConfig::with_seed(WorldSeed::new(42)).with_render_distance(render_distance))
    }

    #[test]
    fn test_range_is_ring_ordered() {
        let coords = chunks_in_range(ChunkCoord::new(0, 0), 1);
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], ChunkCoord::new(0, 0));
        assert_eq!(coords[1], ChunkCoord::new(-1, -1));
        assert_eq!(coords[8], ChunkCoord::new(1, 1));
    }

    #[test]
    fn test_range_is_cut_at_grid_edge() {
        use crate::chunk::{MAX_CHUNK, MIN_CHUNK};

        let corner = ChunkCoord::new(MAX_CHUNK, MIN_CHUNK);
        let coords = chunks_in_range(corner, 1);
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[0], corner);
        assert!(coords.iter().all(|c| c.is_addressable()));
    }

    #[test]
    fn test_zero_radius_loads_one_chunk() {
        let mut world = world(0);
        let report = world.ensure_chunks_around([-0.5, 70.0, 3.0]);
        assert_eq!(report.center, ChunkCoord::new(-1, 0));
        assert_eq!(report.generated, vec![ChunkCoord::new(-1, 0)]);
    }

    #[test]
    fn test_second_pass_is_idle() {
        let mut world = world(1);
        let first = world.ensure_chunks_around([8.0, 40.0, 8.0]);
        assert_eq!(first.generated.len(), 9);

        let second = world.ensure_chunks_around([15.9, 10.0, 0.1]);
        assert!(second.is_idle());
        assert_eq!(world.loaded_chunk_count(), 9);
    }

    #[test]
    fn test_moving_one_chunk_shifts_a_column() {
        let mut world = world(1);
        world.ensure_chunks_around([8.0, 0.0, 8.0]);
        let report = world.ensure_chunks_around([24.0, 0.0, 8.0]);

        assert_eq!(
            report.generated,
            vec![ChunkCoord::new(2, -1), ChunkCoord::new(2, 0), ChunkCoord::new(2, 1)]
        );
        assert_eq!(
            report.evicted,
            vec![ChunkCoord::new(-1, -1), ChunkCoord::new(-1, 0), ChunkCoord::new(-1, 1)]
        );
        assert_eq!(world.stats().evicted_this_session, 3);
        assert_eq!(world.observer_chunk(), Some(ChunkCoord::new(1, 0)));
    }
}
