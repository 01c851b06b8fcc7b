//! # Terrain Generation
//!
//! Turns the noise fields into block columns. Each chunk runs the same
//! strictly ordered pipeline:
//!
//! 1. **Height** from the 2-D height field
//! 2. **Layering**: grass or sand on top, dirt below it, stone underneath
//! 3. **Caves** carved out of stone by the 3-D cave field
//! 4. **Ores** replacing the remaining underground stone
//! 5. **Trees** on grass, from the chunk's private random stream
//! 6. **Water bodies** flooding empty cells up to a random level
//!
//! Later stages read the output of earlier ones, so the order matters.
//!
//! ## Determinism
//!
//! A chunk is a pure function of `(seed, config, coord)`. Trees and water use
//! a `ChaCha8Rng` seeded from the chunk coordinate, so the result does not
//! depend on the order chunks are generated in.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::block::BlockType;
use crate::chunk::{Chunk, ChunkCoord, LocalPos, CHUNK_SIZE, WORLD_CEILING, WORLD_HEIGHT};
use crate::config::{OreThresholds, TerrainConfig};
use crate::noise::{NoiseKind, NoiseSampler, WorldSeed};

/// Random stream used for tree placement.
const TREE_STREAM: u64 = 200;

/// Random stream used for water bodies.
const WATER_STREAM: u64 = 201;

/// Canopy half-extent along X and Z.
const CANOPY_RADIUS: i32 = 2;

/// Procedural chunk generator.
pub struct TerrainGenerator {
    sampler: NoiseSampler,
    config: TerrainConfig,
}

impl TerrainGenerator {
    /// Creates a generator for `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed, config: TerrainConfig) -> Self {
        Self {
            sampler: NoiseSampler::new(seed),
            config,
        }
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.sampler.seed()
    }

    /// The terrain parameters.
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Number of solid layers in the column at `(x, z)` before carving.
    ///
    /// The surface block sits at `height - 1`. Always in `1..=WORLD_CEILING`.
    #[must_use]
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        let n = self.sampler.sample(
            NoiseKind::Height,
            [f64::from(x), 0.0, f64::from(z)],
            &self.config.height_noise,
        );
        let height = f64::from(self.config.height_base) + n * self.config.height_amplitude;
        (height as i32).clamp(1, WORLD_CEILING)
    }

    /// Surface block of the column at `(x, z)`.
    #[must_use]
    pub fn surface_block(&self, x: i32, z: i32) -> BlockType {
        let n = self.sampler.sample(
            NoiseKind::Surface,
            [f64::from(x), 0.0, f64::from(z)],
            &self.config.surface_noise,
        );
        if n > 0.0 {
            BlockType::Grass
        } else {
            BlockType::Sand
        }
    }

    /// Generates the chunk at `coord`.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);

        // Pass 1: layered columns, caves and ores
        for lz in 0..CHUNK_SIZE as u8 {
            for lx in 0..CHUNK_SIZE as u8 {
                self.generate_column(&mut chunk, lx, lz);
            }
        }

        // Pass 2: features that look at the finished surface
        let trees = self.generate_trees(&mut chunk);
        let water = self.generate_water(&mut chunk);

        tracing::trace!(
            "generated chunk [{}, {}]: {} blocks, {} trees, {} water",
            coord.x,
            coord.z,
            chunk.len(),
            trees,
            water
        );
        chunk
    }

    /// Fills, carves and mineralizes one column.
    fn generate_column(&self, chunk: &mut Chunk, lx: u8, lz: u8) {
        let world = LocalPos::new(lx, 0, lz).to_world(chunk.coord);
        let height = self.column_height(world.x, world.z);
        let surface = self.surface_block(world.x, world.z);
        let stone_top = height - 1 - self.config.dirt_depth;

        for y in 0..height {
            let block = if y == height - 1 {
                surface
            } else if y >= stone_top {
                BlockType::Dirt
            } else if self.is_cave(world.x, y, world.z) {
                continue;
            } else {
                self.underground_block(world.x, y, world.z)
            };
            chunk.set(LocalPos::new(lx, y as u8, lz), block);
        }
    }

    /// Returns true if stone at this cell is carved away.
    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        if !self.in_underground_band(y) {
            return false;
        }
        let n = self.sampler.sample(
            NoiseKind::Cave,
            [f64::from(x), f64::from(y), f64::from(z)],
            &self.config.cave_noise,
        );
        n > self.config.cave_threshold
    }

    /// Stone or the ore replacing it at this uncarved cell.
    fn underground_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !self.in_underground_band(y) {
            return BlockType::Stone;
        }
        let n = self.sampler.sample(
            NoiseKind::Ore,
            [f64::from(x), f64::from(y), f64::from(z)],
            &self.config.ore_noise,
        );
        ore_for(n, &self.config.ores)
    }

    #[inline]
    fn in_underground_band(&self, y: i32) -> bool {
        (self.config.underground_min_y..self.config.underground_max_y).contains(&y)
    }

    /// Grows trees on grass columns. Returns the number planted.
    fn generate_trees(&self, chunk: &mut Chunk) -> usize {
        let seed = self.seed().for_chunk(chunk.coord, TREE_STREAM);
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        let mut planted = 0;

        for _ in 0..self.config.tree_attempts {
            let lx = rng.gen_range(0..CHUNK_SIZE);
            let lz = rng.gen_range(0..CHUNK_SIZE);
            let trunk = rng.gen_range(self.config.trunk_min..=self.config.trunk_max);

            let Some(top) = chunk.column_top(lx as u8, lz as u8) else {
                continue;
            };
            if chunk.get(LocalPos::new(lx as u8, top, lz as u8)) != Some(BlockType::Grass) {
                continue;
            }

            let base = i32::from(top) + 1;
            let crown = base + trunk - 1;
            if crown > WORLD_CEILING {
                continue;
            }
            // Everything above the column top is air.
            for y in base..=crown {
                chunk.set(LocalPos::new(lx as u8, y as u8, lz as u8), BlockType::Wood);
            }
            grow_canopy(chunk, &mut rng, [lx, crown, lz]);
            planted += 1;
        }
        planted
    }

    /// Maybe floods the chunk. Returns the number of water cells placed.
    fn generate_water(&self, chunk: &mut Chunk) -> usize {
        let seed = self.seed().for_chunk(chunk.coord, WATER_STREAM);
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        if !rng.gen_bool(self.config.water_chance) {
            return 0;
        }
        let level = rng
            .gen_range(self.config.water_level_min..=self.config.water_level_max)
            .min(WORLD_HEIGHT);

        let mut placed = 0;
        for lz in 0..CHUNK_SIZE as u8 {
            for lx in 0..CHUNK_SIZE as u8 {
                for y in 0..level {
                    let cell = LocalPos::new(lx, y as u8, lz);
                    if chunk.is_air(cell) {
                        chunk.set(cell, BlockType::Water);
                        placed += 1;
                    }
                }
            }
        }
        placed
    }
}

/// Block for an ore-field value. Thresholds are checked rarest first, so
/// the rarest ore whose threshold `n` exceeds wins; below them all is stone.
#[must_use]
pub fn ore_for(n: f64, ores: &OreThresholds) -> BlockType {
    [
        (ores.diamond, BlockType::DiamondOre),
        (ores.gold, BlockType::GoldOre),
        (ores.iron, BlockType::IronOre),
        (ores.coal, BlockType::CoalOre),
    ]
    .into_iter()
    .find(|(threshold, _)| n > *threshold)
    .map_or(BlockType::Stone, |(_, ore)| ore)
}

/// Places a rough leaf ball around the top of a trunk.
///
/// A cell at offset `(dx, dy, dz)` gets leaves when its Manhattan
/// distance is below `4 + jitter * 2`. Cells outside the chunk or the
/// world, and occupied cells, are skipped; the jitter is drawn for every
/// offset either way so the stream stays aligned.
fn grow_canopy(chunk: &mut Chunk, rng: &mut ChaCha8Rng, [cx, cy, cz]: [i32; 3]) {
    for dx in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for dy in -1i32..=2 {
            for dz in -CANOPY_RADIUS..=CANOPY_RADIUS {
                let reach = 4.0 + rng.gen::<f64>() * 2.0;
                if f64::from(dx.abs() + dy.abs() + dz.abs()) >= reach {
                    continue;
                }
                let (x, y, z) = (cx + dx, cy + dy, cz + dz);
                let in_chunk = (0..CHUNK_SIZE).contains(&x) && (0..CHUNK_SIZE).contains(&z);
                if !in_chunk || !(0..WORLD_HEIGHT).contains(&y) {
                    continue;
                }
                let cell = LocalPos::new(x as u8, y as u8, z as u8);
                if chunk.is_air(cell) {
                    chunk.set(cell, BlockType::Leaves);
                }
            }
        }
    }
}
