//! # Voxel World
//!
//! [`World`] owns every loaded chunk, the fluid queue and the terrain
//! generator. All block access goes through it; chunks never see each other.
//!
//! ## Absence Is Not An Error
//!
//! Reads of unloaded chunks, empty cells or positions above/below the world
//! return `None`. Writes outside the world height are ignored. Nothing on the
//! block API can fail.

use std::collections::{HashMap, HashSet};

use crate::block::{BlockPos, BlockType};
use crate::chunk::{Chunk, ChunkCoord, LocalPos, WORLD_CEILING};
use crate::config::WorldConfig;
use crate::fluid::{FluidQueue, FluidSimulator, FluidTickStats};
use crate::noise::WorldSeed;
use crate::terrain::TerrainGenerator;

/// Half-extents of the body checked by [`World::collide`].
const COLLIDE_REACH: [i32; 3] = [1, 2, 1];

/// Counters describing the world's current state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks currently in memory.
    pub loaded_chunks: usize,
    /// Chunks produced by the generator since the world was created.
    pub generated_this_session: u64,
    /// Chunks dropped by streaming since the world was created.
    pub evicted_this_session: u64,
    /// Positions waiting in the fluid queue.
    pub pending_fluids: usize,
}

/// The voxel world.
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) generator: TerrainGenerator,
    pub(crate) chunks: HashMap<ChunkCoord, Chunk>,
    /// Chunks created by a block write rather than by the generator.
    pub(crate) blank_chunks: HashSet<ChunkCoord>,
    pub(crate) fluids: FluidQueue,
    /// Chunk the last streaming pass was centred on.
    pub(crate) center: Option<ChunkCoord>,
    pub(crate) generated_this_session: u64,
    pub(crate) evicted_this_session: u64,
}

impl World {
    /// Creates an empty world. No chunk is generated until streaming or
    /// [`Self::generate_chunk`] asks for one.
    ///
    /// The configuration is expected to have passed
    /// [`WorldConfig::validate`]; configs loaded from TOML always have.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let generator = TerrainGenerator::new(config.seed, config.terrain.clone());
        tracing::debug!(
            "world created: seed {}, render distance {}",
            config.seed.value(),
            config.render_distance
        );
        Self {
            config,
            generator,
            chunks: HashMap::new(),
            blank_chunks: HashSet::new(),
            fluids: FluidQueue::new(),
            center: None,
            generated_this_session: 0,
            evicted_this_session: 0,
        }
    }

    /// Creates an empty world with the default configuration and `seed`.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(WorldConfig::with_seed(seed))
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.config.seed
    }

    /// The configuration the world was built with.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Chebyshev radius kept loaded around the observer.
    #[must_use]
    pub const fn render_distance(&self) -> i32 {
        self.config.render_distance
    }

    /// Changes the render distance. Takes effect on the next streaming pass.
    pub fn set_render_distance(&mut self, render_distance: i32) {
        self.config.render_distance = render_distance.max(0);
    }

    /// The terrain generator.
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    // =========================================================================
    // Block access
    // =========================================================================

    /// Gets the block at `pos`, or `None` for air, unloaded chunks and
    /// positions outside the world height.
    #[must_use]
    pub fn get_block(&self, pos: BlockPos) -> Option<BlockType> {
        let (coord, local) = LocalPos::split(pos)?;
        self.chunks.get(&coord)?.get(local)
    }

    /// Places `block` at `pos`, replacing whatever was there.
    ///
    /// Creates the owning chunk if it is not loaded. Water is queued for the
    /// next fluid update. Returns the replaced block.
    pub fn add_block(&mut self, pos: BlockPos, block: BlockType) -> Option<BlockType> {
        let Some((coord, local)) = LocalPos::split(pos) else {
            tracing::trace!("ignoring {} placed outside world height at {}", block, pos);
            return None;
        };
        let chunk = self.chunks.entry(coord).or_insert_with(|| {
            tracing::trace!("chunk [{}, {}] created by a write", coord.x, coord.z);
            self.blank_chunks.insert(coord);
            Chunk::new(coord)
        });
        let previous = chunk.set(local, block);
        if block.is_fluid() {
            self.fluids.push(pos);
        }
        previous
    }

    /// Removes the block at `pos`. Returns what was removed.
    pub fn remove_block(&mut self, pos: BlockPos) -> Option<BlockType> {
        let (coord, local) = LocalPos::split(pos)?;
        self.chunks.get_mut(&coord)?.remove(local)
    }

    /// Highest occupied Y in the column at `(x, z)`, scanning down from the
    /// ceiling. Returns 0 for an empty or unloaded column.
    #[must_use]
    pub fn get_height(&self, x: i32, z: i32) -> i32 {
        let Some((coord, local)) = LocalPos::split(BlockPos::new(x, WORLD_CEILING, z)) else {
            return 0;
        };
        self.chunks
            .get(&coord)
            .and_then(|chunk| chunk.column_top(local.x, local.z))
            .map_or(0, i32::from)
    }

    /// Conservative body collision at a float position.
    ///
    /// The position is truncated toward zero, then every cell of a 3 x 5 x 3
    /// box around it is checked. Returns true if any of them is occupied.
    /// Cells past the edge of the `i32` grid count as empty.
    ///
    /// # Panics
    ///
    /// Panics if a component of `pos` is not finite.
    #[must_use]
    pub fn collide(&self, pos: [f64; 3]) -> bool {
        self.collide_at(BlockPos::from_world_f64(pos))
    }

    /// [`Self::collide`] for an integer center.
    #[must_use]
    pub fn collide_at(&self, center: BlockPos) -> bool {
        let [rx, ry, rz] = COLLIDE_REACH;
        (-rx..=rx).any(|dx| {
            (-ry..=ry).any(|dy| {
                (-rz..=rz).any(|dz| {
                    center
                        .offset(dx, dy, dz)
                        .and_then(|pos| self.get_block(pos))
                        .is_some()
                })
            })
        })
    }

    /// Returns true if water may flow into `pos`: the chunk is loaded, Y is
    /// inside the world and the cell is empty.
    #[must_use]
    pub fn is_open(&self, pos: BlockPos) -> bool {
        LocalPos::split(pos).is_some_and(|(coord, local)| {
            self.chunks.get(&coord).is_some_and(|chunk| chunk.is_air(local))
        })
    }

    /// Counts blocks of one type across all loaded chunks.
    #[must_use]
    pub fn count_blocks(&self, block: BlockType) -> usize {
        self.chunks
            .values()
            .map(|chunk| chunk.iter().filter(|(_, b)| *b == block).count())
            .sum()
    }

    // =========================================================================
    // Chunks
    // =========================================================================

    /// The chunk at `coord`, if loaded.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Iterates over loaded chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if the chunk at `coord` is in memory.
    #[must_use]
    pub fn is_chunk_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Loaded chunk coordinates, sorted.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Generates the chunk at `coord` unless it is already loaded.
    ///
    /// A chunk created by a write counts as not generated yet: it gets its
    /// terrain, with the written cells laid over it.
    ///
    /// Returns true if a chunk was generated.
    pub fn generate_chunk(&mut self, coord: ChunkCoord) -> bool {
        if !self.blank_chunks.remove(&coord) && self.chunks.contains_key(&coord) {
            return false;
        }
        let mut chunk = self.generator.generate(coord);
        if let Some(written) = self.chunks.remove(&coord) {
            tracing::trace!(
                "laying {} written cells over chunk [{}, {}]",
                written.len(),
                coord.x,
                coord.z
            );
            for (local, block) in written.iter() {
                chunk.set(local, block);
            }
        }
        self.insert_chunk(chunk);
        self.generated_this_session += 1;
        true
    }

    /// Drops the chunk at `coord` and its fluid queue entries.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let chunk = self.chunks.remove(&coord)?;
        self.blank_chunks.remove(&coord);
        self.fluids
            .retain(|pos| ChunkCoord::from_block_pos(pos.x, pos.z) != coord);
        Some(chunk)
    }

    /// Inserts a finished chunk and queues its water.
    pub(crate) fn insert_chunk(&mut self, chunk: Chunk) {
        let coord = chunk.coord;
        for (local, block) in chunk.sorted_blocks() {
            if block.is_fluid() {
                self.fluids.push(local.to_world(coord));
            }
        }
        self.chunks.insert(coord, chunk);
    }

    /// Coordinates of chunks whose contents changed since the last call,
    /// sorted. Clears their dirty flags.
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<_> = self
            .chunks
            .values_mut()
            .filter_map(|chunk| chunk.take_dirty().then_some(chunk.coord))
            .collect();
        dirty.sort_unstable();
        dirty
    }

    // =========================================================================
    // Fluids
    // =========================================================================

    /// Positions awaiting a fluid update.
    #[must_use]
    pub const fn fluid_queue(&self) -> &FluidQueue {
        &self.fluids
    }

    /// Swaps out the fluid queue, leaving an empty one in its place.
    pub(crate) fn take_fluid_queue(&mut self) -> FluidQueue {
        std::mem::take(&mut self.fluids)
    }

    /// Runs one fluid tick with a throwaway simulator.
    pub fn update_fluids(&mut self) -> FluidTickStats {
        FluidSimulator::new().update(self)
    }

    // =========================================================================
    // Whole-world operations
    // =========================================================================

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded_chunks: self.chunks.len(),
            generated_this_session: self.generated_this_session,
            evicted_this_session: self.evicted_this_session,
            pending_fluids: self.fluids.len(),
        }
    }

    /// Throws away every chunk and pending fluid, then regenerates the area
    /// around the last streaming center. Player edits are lost.
    ///
    /// Returns the number of chunks generated.
    pub fn regenerate(&mut self) -> usize {
        let dropped = self.chunks.len();
        self.chunks.clear();
        self.blank_chunks.clear();
        self.fluids.clear();
        let generated = self
            .center
            .map_or(0, |center| self.stream_to(center).generated.len());
        tracing::info!(
            "world regenerated: dropped {} chunks, generated {}",
            dropped,
            generated
        );
        generated
    }

    /// Every cell of every loaded chunk that differs from freshly generated
    /// terrain, with its current contents (`None` means removed).
    ///
    /// Chunks created by a write compare against an empty chunk. Sorted by
    /// position.
    #[must_use]
    pub fn modified_blocks(&self) -> Vec<(BlockPos, Option<BlockType>)> {
        let mut changes = Vec::new();
        for coord in self.loaded_coords() {
            let Some(current) = self.chunks.get(&coord) else {
                continue;
            };
            let pristine = if self.blank_chunks.contains(&coord) {
                Chunk::new(coord)
            } else {
                self.generator.generate(coord)
            };

            for (local, block) in current.iter() {
                if pristine.get(local) != Some(block) {
                    changes.push((local.to_world(coord), Some(block)));
                }
            }
            for (local, _) in pristine.iter() {
                if current.is_air(local) {
                    changes.push((local.to_world(coord), None));
                }
            }
        }
        changes.sort_unstable_by_key(|(pos, _)| *pos);
        changes
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("seed", &self.config.seed)
            .field("render_distance", &self.config.render_distance)
            .field("loaded_chunks", &self.chunks.len())
            .field("pending_fluids", &self.fluids.len())
            .finish_non_exhaustive()
    }
}
