//! Per-frame chunk visibility.

use strata_world::{Chunk, ChunkCoord, World};

use crate::aabb::Aabb;
use crate::camera::Mat4;
use crate::frustum::{is_visible, Frustum};

/// Visibility counts since the last [`FrustumCuller::take_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Chunks that passed the frustum test.
    pub visible: u32,
    /// Chunks rejected by the frustum test.
    pub hidden: u32,
    /// Chunks skipped because they hold no blocks.
    pub empty: u32,
}

impl CullStats {
    /// Fraction of tested chunks that were hidden, in `[0, 1]`.
    #[must_use]
    pub fn cull_rate(&self) -> f32 {
        let tested = self.visible + self.hidden;
        if tested == 0 {
            0.0
        } else {
            self.hidden as f32 / tested as f32
        }
    }
}

/// Frustum culler for chunk visibility.
#[derive(Debug, Clone, Default)]
pub struct FrustumCuller {
    /// Current frustum.
    frustum: Frustum,
    stats: CullStats,
}

impl FrustumCuller {
    /// Creates a culler. Call [`Self::update`] before testing anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the frustum from a view-projection matrix.
    pub fn update(&mut self, view_projection: &Mat4) {
        self.frustum = Frustum::from_view_projection(view_projection);
    }

    /// The current frustum.
    #[must_use]
    pub const fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Returns the current frustum planes for GPU upload.
    #[must_use]
    pub fn planes(&self) -> [[f32; 4]; 6] {
        self.frustum.as_arrays()
    }

    /// Tests if a chunk should be drawn. Empty chunks never are.
    pub fn test_chunk(&mut self, chunk: &Chunk) -> bool {
        let Some(aabb) = Aabb::of_chunk(chunk) else {
            self.stats.empty += 1;
            return false;
        };
        let visible = is_visible(&aabb, &self.frustum.planes);
        if visible {
            self.stats.visible += 1;
        } else {
            self.stats.hidden += 1;
        }
        visible
    }

    /// Coordinates of every loaded chunk that passes the test, sorted.
    pub fn visible_chunks(&mut self, world: &World) -> Vec<ChunkCoord> {
        let mut visible: Vec<_> = world
            .chunks()
            .filter(|chunk| self.test_chunk(chunk))
            .map(|chunk| chunk.coord)
            .collect();
        visible.sort_unstable();
        visible
    }

    /// Returns and resets the statistics.
    pub fn take_stats(&mut self) -> CullStats {
        let stats = std::mem::take(&mut self.stats);
        if stats.visible + stats.hidden > 0 {
            tracing::trace!(
                "cull stats: visible {}, hidden {}, empty {}, cull rate {:.1}%",
                stats.visible,
                stats.hidden,
                stats.empty,
                stats.cull_rate() * 100.0
            );
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::view_projection;
    use strata_world::{BlockPos, BlockType, WorldSeed};

    /// Camera at (8, 20, 8) looking toward -Z.
    fn north_camera() -> Mat4 {
        view_projection(
            [8.0, 20.0, 8.0],
            [8.0, 20.0, -100.0],
            std::f32::consts::FRAC_PI_2,
            1.0,
            0.1,
            200.0,
        )
    }

    #[test]
    fn test_chunks_behind_camera_are_hidden() {
        let mut world = World::with_seed(WorldSeed::new(1));
        world.add_block(BlockPos::new(8, 20, -40), BlockType::Stone);
        world.add_block(BlockPos::new(8, 20, 60), BlockType::Stone);

        let mut culler = FrustumCuller::new();
        culler.update(&north_camera());
        let visible = culler.visible_chunks(&world);

        assert_eq!(visible, vec![ChunkCoord::new(0, -3)]);
        assert_eq!(
            culler.take_stats(),
            CullStats {
                visible: 1,
                hidden: 1,
                empty: 0
            }
        );
        assert_eq!(culler.take_stats(), CullStats::default());
    }

    #[test]
    fn test_empty_chunk_is_not_drawn() {
        let mut world = World::with_seed(WorldSeed::new(1));
        let pos = BlockPos::new(8, 20, -40);
        world.add_block(pos, BlockType::Stone);
        world.remove_block(pos);

        let mut culler = FrustumCuller::new();
        culler.update(&north_camera());
        assert!(culler.visible_chunks(&world).is_empty());
        assert_eq!(culler.take_stats().empty, 1);
    }

    #[test]
    fn test_cull_rate() {
        let stats = CullStats {
            visible: 1,
            hidden: 3,
            empty: 10,
        };
        assert!((stats.cull_rate() - 0.75).abs() < f32::EPSILON);
        assert!(CullStats::default().cull_rate().abs() < f32::EPSILON);
    }
}
