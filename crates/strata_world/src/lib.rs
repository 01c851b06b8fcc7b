//! # STRATA World
//!
//! Chunked voxel storage, procedural terrain and fluid flow for an infinite,
//! reproducible block world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: 16 x 256 x 16 columns, generated and evicted independently
//! 3. **Sparse**: Only occupied cells are stored; absence is air
//! 4. **Total**: Block reads, streaming and fluid updates never fail
//!
//! ## Core Components
//!
//! - `NoiseSampler`: Seeded 2D/3D simplex fields
//! - `TerrainGenerator`: Height, layers, caves, ores, trees, water
//! - `World`: Block API, chunk map, observer streaming
//! - `FluidSimulator`: Double-buffered water propagation
//! - `WorldSnapshot`: Plain data image for save/load collaborators
//!
//! ## Example
//!
//! ```rust
//! use strata_world::{BlockPos, BlockType, FluidSimulator, World, WorldConfig, WorldSeed};
//!
//! let config = WorldConfig::with_seed(WorldSeed::new(42)).with_render_distance(1);
//! let mut world = World::new(config);
//!
//! // Observer standing at (8, 40, 8)
//! let report = world.ensure_chunks_around([8.0, 40.0, 8.0]);
//! assert_eq!(report.generated.len(), 9);
//!
//! let ground = world.get_height(8, 8);
//! assert!(ground > 0);
//!
//! world.add_block(BlockPos::new(8, 200, 8), BlockType::Water);
//! let stats = FluidSimulator::new().update(&mut world);
//! assert_eq!(stats.moved_down, 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod fluid;
pub mod noise;
pub mod snapshot;
pub mod streaming;
pub mod terrain;
pub mod world;

pub use block::{BlockPos, BlockType};
pub use chunk::{
    Chunk, ChunkCoord, LocalPos, CHUNK_SIZE, MAX_CHUNK, MIN_CHUNK, WORLD_CEILING, WORLD_HEIGHT,
};
pub use config::{OreThresholds, TerrainConfig, WorldConfig, MAX_RENDER_DISTANCE};
pub use error::{WorldError, WorldResult};
pub use fluid::{FluidQueue, FluidSimulator, FluidTickStats};
pub use noise::{NoiseKind, NoiseParams, NoiseSampler, SimplexNoise, WorldSeed};
pub use snapshot::{ChunkSnapshot, WorldSnapshot};
pub use streaming::{chunks_in_range, StreamingReport};
pub use terrain::{ore_for, TerrainGenerator};
pub use world::{World, WorldStats};
