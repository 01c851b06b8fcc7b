//! # World Snapshots
//!
//! A plain data image of the loaded world for a save/load collaborator. The
//! core defines no file format: the snapshot derives serde traits and the
//! collaborator picks the encoding.
//!
//! Snapshots are sorted (chunks by coordinate, blocks by local position), so
//! the same world always produces the same snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::BlockType;
use crate::chunk::{Chunk, ChunkCoord, LocalPos};
use crate::config::{TerrainConfig, WorldConfig};
use crate::error::{WorldError, WorldResult};
use crate::noise::WorldSeed;
use crate::world::World;

/// One chunk's contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSnapshot {
    /// Chunk position.
    pub coord: ChunkCoord,
    /// Occupied cells.
    pub blocks: Vec<(LocalPos, BlockType)>,
}

/// Image of every loaded chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// World seed, so missing chunks regenerate identically.
    pub seed: WorldSeed,
    /// Render distance at capture time.
    pub render_distance: i32,
    /// Loaded chunks.
    pub chunks: Vec<ChunkSnapshot>,
}

impl WorldSnapshot {
    /// Total number of blocks across all chunks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.blocks.len()).sum()
    }
}

impl World {
    /// Captures every loaded chunk.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let chunks = self
            .loaded_coords()
            .into_iter()
            .filter_map(|coord| self.chunks.get(&coord))
            .map(|chunk| ChunkSnapshot {
                coord: chunk.coord,
                blocks: chunk.sorted_blocks(),
            })
            .collect();
        WorldSnapshot {
            seed: self.config.seed,
            render_distance: self.config.render_distance,
            chunks,
        }
    }

    /// Rebuilds a world from a snapshot.
    ///
    /// Every restored chunk starts dirty and its water is queued. Chunks the
    /// snapshot lacks are generated by the next streaming pass.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk appears twice, a local position lies
    /// outside its chunk, or the render distance is out of range.
    pub fn from_snapshot(snapshot: WorldSnapshot, terrain: TerrainConfig) -> WorldResult<Self> {
        let config = WorldConfig {
            seed: snapshot.seed,
            render_distance: snapshot.render_distance,
            terrain,
        };
        config.validate()?;

        let mut seen = HashSet::with_capacity(snapshot.chunks.len());
        let mut chunks = Vec::with_capacity(snapshot.chunks.len());
        for saved in snapshot.chunks {
            if !seen.insert(saved.coord) {
                return Err(WorldError::DuplicateChunk(saved.coord));
            }
            let mut chunk = Chunk::new(saved.coord);
            for (local, block) in saved.blocks {
                if !local.is_valid() {
                    return Err(WorldError::LocalOutOfRange {
                        coord: saved.coord,
                        x: local.x,
                        y: local.y,
                        z: local.z,
                    });
                }
                chunk.set(local, block);
            }
            chunks.push(chunk);
        }

        let mut world = Self::new(config);
        let restored = chunks.len();
        for chunk in chunks {
            world.insert_chunk(chunk);
        }
        tracing::info!(
            "restored {} chunks, {} fluids pending",
            restored,
            world.fluids.len()
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockPos;

    #[test]
    fn test_snapshot_is_sorted() {
        let mut world = World::with_seed(WorldSeed::new(3));
        world.add_block(BlockPos::new(20, 4, 0), BlockType::Stone);
        world.add_block(BlockPos::new(2, 9, 1), BlockType::Sand);
        world.add_block(BlockPos::new(1, 9, 1), BlockType::Dirt);

        let snapshot = world.snapshot();
        let coords: Vec<_> = snapshot.chunks.iter().map(|c| c.coord).collect();
        assert_eq!(coords, vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]);
        assert_eq!(
            snapshot.chunks[0].blocks,
            vec![
                (LocalPos::new(1, 9, 1), BlockType::Dirt),
                (LocalPos::new(2, 9, 1), BlockType::Sand),
            ]
        );
        assert_eq!(snapshot.block_count(), 3);
    }

    #[test]
    fn test_rejects_duplicate_chunk() {
        let chunk = ChunkSnapshot {
            coord: ChunkCoord::new(1, 1),
            blocks: Vec::new(),
        };
        let snapshot = WorldSnapshot {
            seed: WorldSeed::new(1),
            render_distance: 2,
            chunks: vec![chunk.clone(), chunk],
        };
        let err = World::from_snapshot(snapshot, TerrainConfig::default()).unwrap_err();
        assert!(matches!(err, WorldError::DuplicateChunk(c) if c == ChunkCoord::new(1, 1)));
    }

    #[test]
    fn test_rejects_out_of_range_local() {
        let snapshot = WorldSnapshot {
            seed: WorldSeed::new(1),
            render_distance: 2,
            chunks: vec![ChunkSnapshot {
                coord: ChunkCoord::new(0, 0),
                blocks: vec![(LocalPos::new(16, 0, 0), BlockType::Stone)],
            }],
        };
        let err = World::from_snapshot(snapshot, TerrainConfig::default()).unwrap_err();
        assert!(matches!(err, WorldError::LocalOutOfRange { x: 16, .. }));
    }

    #[test]
    fn test_restore_marks_dirty_and_queues_water() {
        let mut world = World::with_seed(WorldSeed::new(3));
        world.add_block(BlockPos::new(1, 5, 1), BlockType::Water);
        world.add_block(BlockPos::new(1, 4, 1), BlockType::Stone);

        let mut restored =
            World::from_snapshot(world.snapshot(), TerrainConfig::default()).unwrap();
        assert_eq!(restored.take_dirty_chunks(), vec![ChunkCoord::new(0, 0)]);
        assert!(restored.fluid_queue().contains(BlockPos::new(1, 5, 1)));
        assert_eq!(restored.snapshot(), world.snapshot());
    }
}
