//! # World Scenario Tests
//!
//! End-to-end checks of generation, the block API, fluids and snapshots.

use strata_world::{
    BlockPos, BlockType, ChunkCoord, FluidSimulator, TerrainConfig, World, WorldConfig, WorldSeed,
    CHUNK_SIZE, WORLD_CEILING,
};

fn generated_world(seed: u64) -> World {
    let mut world = World::with_seed(WorldSeed::new(seed));
    world.generate_chunk(ChunkCoord::new(0, 0));
    world
}

/// Test: Same seed, same terrain, across independent worlds.
#[test]
fn test_seed_42_column_height_is_reproducible() {
    let first = generated_world(42);
    let second = generated_world(42);

    let height = first.get_height(0, 0);
    assert!(height > 0, "column (0, 0) should not be void");
    assert_eq!(height, second.get_height(0, 0));

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            assert_eq!(first.get_height(x, z), second.get_height(x, z));
        }
    }
    assert_eq!(first.snapshot(), second.snapshot());
}

/// Test: Different seeds give different terrain.
#[test]
fn test_different_seeds_differ() {
    let a = generated_world(1);
    let b = generated_world(2);
    let differs = (0..CHUNK_SIZE).any(|x| a.get_height(x, 7) != b.get_height(x, 7));
    assert!(differs);
}

/// Test: Height never exceeds what generation wrote in the column.
#[test]
fn test_height_matches_generated_column() {
    let world = generated_world(99);
    let chunk = world.chunk(ChunkCoord::new(0, 0)).unwrap();

    for x in 0..CHUNK_SIZE as u8 {
        for z in 0..CHUNK_SIZE as u8 {
            let highest = chunk
                .iter()
                .filter(|(pos, _)| pos.x == x && pos.z == z)
                .map(|(pos, _)| i32::from(pos.y))
                .max()
                .unwrap_or(0);
            assert_eq!(world.get_height(i32::from(x), i32::from(z)), highest);
        }
    }
}

/// Test: Water with nothing below falls exactly one cell per update.
#[test]
fn test_water_falls_one_cell() {
    let mut world = World::with_seed(WorldSeed::new(42));
    world.add_block(BlockPos::new(5, 10, 5), BlockType::Water);
    let mut fluids = FluidSimulator::new();

    let stats = fluids.update(&mut world);

    assert_eq!(stats.moved_down, 1);
    assert_eq!(world.get_block(BlockPos::new(5, 9, 5)), Some(BlockType::Water));
    assert_eq!(world.get_block(BlockPos::new(5, 10, 5)), None);
    assert_eq!(world.count_blocks(BlockType::Water), 1);
}

/// Test: Water dropped into generated terrain eventually comes to rest.
#[test]
fn test_water_settles_in_generated_terrain() {
    // A lone chunk: generated water bodies have nowhere to go.
    let mut world = World::new(WorldConfig::with_seed(WorldSeed::new(42)).with_render_distance(0));
    world.ensure_chunks_around([8.0, 0.0, 8.0]);
    let ground = world.get_height(8, 8);
    world.add_block(BlockPos::new(8, ground + 3, 8), BlockType::Water);

    let mut fluids = FluidSimulator::new();
    for _ in 0..3 {
        fluids.update(&mut world);
    }
    // Two falls, then the water lands on the surface.
    assert_eq!(
        world.get_block(BlockPos::new(8, ground + 1, 8)),
        Some(BlockType::Water)
    );
    assert_eq!(world.get_block(BlockPos::new(8, ground + 3, 8)), None);
    assert_eq!(fluids.totals().moved_down, 2);
}

/// Test: Player edits survive a snapshot round trip.
#[test]
fn test_snapshot_restores_edits() {
    let config = WorldConfig::with_seed(WorldSeed::new(7)).with_render_distance(1);
    let mut world = World::new(config.clone());
    world.ensure_chunks_around([0.0, 0.0, 0.0]);

    let top = world.get_height(3, -3);
    world.remove_block(BlockPos::new(3, top, -3));
    world.add_block(BlockPos::new(-5, 120, 9), BlockType::DiamondOre);
    let edits = world.modified_blocks();
    assert_eq!(edits.len(), 2);

    let mut restored = World::from_snapshot(world.snapshot(), config.terrain).unwrap();
    assert_eq!(restored.snapshot(), world.snapshot());
    assert_eq!(restored.modified_blocks(), edits);
    assert_eq!(
        restored.get_block(BlockPos::new(-5, 120, 9)),
        Some(BlockType::DiamondOre)
    );

    // Nothing is missing, so streaming at the same place does nothing.
    assert!(restored.ensure_chunks_around([0.0, 0.0, 0.0]).is_idle());
}

/// Test: Chunks missing from a snapshot regenerate identically.
#[test]
fn test_snapshot_regenerates_missing_chunks() {
    let config = WorldConfig::with_seed(WorldSeed::new(11)).with_render_distance(1);
    let mut world = World::new(config.clone());
    world.ensure_chunks_around([0.0, 0.0, 0.0]);

    let mut snapshot = world.snapshot();
    snapshot.chunks.retain(|chunk| chunk.coord != ChunkCoord::new(1, 1));

    let mut restored = World::from_snapshot(snapshot, config.terrain).unwrap();
    assert!(!restored.is_chunk_loaded(ChunkCoord::new(1, 1)));

    let report = restored.ensure_chunks_around([0.0, 0.0, 0.0]);
    assert_eq!(report.generated, vec![ChunkCoord::new(1, 1)]);
    assert_eq!(restored.snapshot(), world.snapshot());
}

/// Test: Regenerating drops edits and rebuilds the same terrain.
#[test]
fn test_regenerate_discards_edits() {
    let config = WorldConfig::with_seed(WorldSeed::new(5)).with_render_distance(1);
    let mut world = World::new(config);
    world.ensure_chunks_around([0.0, 0.0, 0.0]);
    let pristine = world.snapshot();

    world.add_block(BlockPos::new(0, 250, 0), BlockType::Stone);
    world.add_block(BlockPos::new(400, 10, 400), BlockType::Stone);
    assert_eq!(world.regenerate(), 9);

    assert_eq!(world.snapshot(), pristine);
    assert!(world.modified_blocks().is_empty());
}

/// Test: Taller terrain preset stays inside the world.
#[test]
fn test_tall_terrain_in_bounds() {
    let config = WorldConfig {
        terrain: TerrainConfig::tall(),
        ..WorldConfig::with_seed(WorldSeed::new(3))
    };
    let mut world = World::new(config.with_render_distance(1));
    world.ensure_chunks_around([0.0, 0.0, 0.0]);

    for x in -CHUNK_SIZE..2 * CHUNK_SIZE {
        for z in -CHUNK_SIZE..2 * CHUNK_SIZE {
            let height = world.get_height(x, z);
            assert!((1..=WORLD_CEILING).contains(&height), "height {height} at ({x}, {z})");
        }
    }
}
