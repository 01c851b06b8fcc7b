//! # Culling Integration Test
//!
//! Frustum culling over a streamed, generated world.

use strata_culling::{camera, Aabb, FrustumCuller};
use strata_world::{ChunkCoord, World, WorldConfig, WorldSeed, CHUNK_SIZE};

fn streamed_world() -> World {
    let config = WorldConfig::with_seed(WorldSeed::new(42)).with_render_distance(3);
    let mut world = World::new(config);
    world.ensure_chunks_around([8.0, 60.0, 8.0]);
    world
}

/// Test: Looking east hides the chunks west of the observer.
#[test]
fn test_looking_east_hides_the_west() {
    let world = streamed_world();
    let view_proj = camera::view_projection(
        [8.0, 60.0, 8.0],
        [100.0, 60.0, 8.0],
        std::f32::consts::FRAC_PI_2,
        1.0,
        0.1,
        500.0,
    );
    let mut culler = FrustumCuller::new();
    culler.update(&view_proj);
    let visible = culler.visible_chunks(&world);

    assert!(!visible.is_empty());
    assert!(visible.iter().all(|coord| coord.x >= 0), "{visible:?}");
    assert!(visible.contains(&ChunkCoord::new(3, 0)));

    let stats = culler.take_stats();
    assert_eq!((stats.visible + stats.hidden) as usize, world.loaded_chunk_count());
    assert!(stats.hidden >= 21, "all 21 chunks with x < 0 are behind the camera");
}

/// Test: Every chunk's box holds the observer column when standing inside it.
#[test]
fn test_box_around_observer_is_always_visible() {
    let world = streamed_world();
    let chunk = world.chunk(ChunkCoord::new(0, 0)).unwrap();
    let aabb = Aabb::of_chunk(chunk).unwrap();

    // Eye inside the chunk box, looking anywhere.
    let eye = [8.0, aabb.min[1] + 1.0, 8.0];
    assert!(aabb.contains_point(eye));
    for target in [[100.0, eye[1], 8.0], [8.0, eye[1], -100.0], [8.0, 300.0, 8.5]] {
        let mut culler = FrustumCuller::new();
        culler.update(&camera::view_projection(eye, target, 1.0, 1.0, 0.1, 100.0));
        assert!(culler.test_chunk(chunk));
    }
}

/// Test: Chunk boxes stay inside their column.
#[test]
fn test_boxes_stay_in_column() {
    let world = streamed_world();
    for chunk in world.chunks() {
        let aabb = Aabb::of_chunk(chunk).unwrap();
        let x0 = chunk.coord.world_x() as f32;
        let z0 = chunk.coord.world_z() as f32;
        let size = CHUNK_SIZE as f32;
        assert!(aabb.min[0] >= x0 && aabb.max[0] <= x0 + size);
        assert!(aabb.min[2] >= z0 && aabb.max[2] <= z0 + size);
        assert!(aabb.min[1] >= 0.0);
    }
}
