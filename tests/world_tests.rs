use std::{sync::Arc, thread};

use cgmath::Point3;
use voxel_chunk_manager::{
    BlockRegistry, ChunkCoord, ModificationLog, TerrainGenerator, TreeDecorator, World,
    WorldConfig, AIR_ID,
};

const STONE: u16 = 1;
const DIRT: u16 = 2;
const GRASS: u16 = 3;
const GLASS: u16 = 7;

#[test]
fn same_seed_generates_identical_chunks() {
    let first = World::with_seed(1337);
    let second = World::with_seed(1337);

    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 5)] {
        let a = first.ensure_chunk(coord);
        let b = second.ensure_chunk(coord);
        assert_eq!(a.get().raw_blocks(), b.get().raw_blocks());
    }
}

#[test]
fn different_seeds_generate_different_terrain() {
    let first = World::with_seed(1);
    let second = World::with_seed(2);
    let a = first.ensure_chunk(ChunkCoord::new(0, 0));
    let b = second.ensure_chunk(ChunkCoord::new(0, 0));
    assert_ne!(a.get().raw_blocks(), b.get().raw_blocks());
}

#[test]
fn columns_are_grass_over_dirt_over_stone() {
    let world = World::with_seed(1337);
    let coord = ChunkCoord::new(-1, 2);
    let chunk = world.ensure_chunk(coord);
    let chunk = chunk.get();
    let offset = chunk.world_offset();
    let dirt_depth = world.config().terrain.dirt_depth;

    for x in 0..16 {
        for z in 0..16 {
            let top = world.terrain().height_at(offset.x + x, offset.z + z) - 1;
            for y in 0..128 {
                let expected = if y > top {
                    AIR_ID
                } else if y == top {
                    GRASS
                } else if y >= top - dirt_depth {
                    DIRT
                } else {
                    STONE
                };
                assert_eq!(chunk.get_block(x, y, z), expected, "at ({}, {}, {})", x, y, z);
            }
        }
    }
}

#[test]
fn edits_survive_unload_and_regeneration() {
    let world = World::with_seed(9);
    let position = Point3::new(-5, 120, 33);
    let (coord, _) = world.dimensions().split_world_position(position);

    world.ensure_chunk(coord);
    assert!(world.set_block_at(position, GLASS));
    assert_eq!(world.get_block_at(position), Some(GLASS));

    assert!(world.unload_chunk(coord).is_some());
    assert_eq!(world.get_block_at(position), None);

    world.ensure_chunk(coord);
    assert_eq!(world.get_block_at(position), Some(GLASS));
    assert_eq!(world.modifications().get(position), Some("glass"));
}

#[test]
fn edits_to_unloaded_chunks_apply_on_first_load() {
    let world = World::with_seed(9);
    let position = Point3::new(100, 127, 100);
    assert!(world.set_block_at(position, GLASS));
    assert_eq!(world.chunk_count(), 0);

    let (coord, _) = world.dimensions().split_world_position(position);
    world.ensure_chunk(coord);
    assert_eq!(world.get_block_at(position), Some(GLASS));
}

#[test]
fn saved_modifications_restore_into_a_new_world() {
    let world = World::with_seed(5);
    world.ensure_chunk(ChunkCoord::new(0, 0));
    world.set_block_at(Point3::new(1, 126, 1), GLASS);
    world.set_block_at(Point3::new(2, 126, 1), AIR_ID);

    let json = world.modifications().to_json_string().expect("serializable");
    let restored = ModificationLog::from_json_str(&json).expect("round trip");

    let fresh = World::with_seed(5);
    fresh.ensure_chunk(ChunkCoord::new(0, 0));
    assert_eq!(fresh.apply_modifications(&restored), 2);
    assert_eq!(fresh.get_block_at(Point3::new(1, 126, 1)), Some(GLASS));
    assert_eq!(fresh.get_block_at(Point3::new(2, 126, 1)), Some(AIR_ID));
}

#[test]
fn concurrent_requests_share_one_chunk() {
    let world = Arc::new(World::with_seed(77));
    let coord = ChunkCoord::new(2, -1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let world = world.clone();
            thread::spawn(move || world.ensure_chunk(coord))
        })
        .collect();
    let chunks: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker panicked"))
        .collect();

    assert_eq!(world.chunk_count(), 1);
    let stored = world.get_chunk(coord).expect("loaded");
    assert!(chunks.iter().all(|chunk| chunk.ptr_eq(&stored)));
}

#[test]
fn negative_positions_use_floor_division() {
    let world = World::with_seed(3);
    let coord = ChunkCoord::new(-1, -2);
    let chunk = world.ensure_chunk(coord);

    assert!(world.set_block_at(Point3::new(-1, 50, -17), GLASS));
    assert_eq!(chunk.get().get_block(15, 50, 15), GLASS);
    assert_eq!(world.get_block_at(Point3::new(-1, 50, -17)), Some(GLASS));
    assert_eq!(world.get_block_at(Point3::new(0, 50, 0)), None);
}

#[test]
fn trees_only_grow_into_air() {
    let config = WorldConfig {
        seed: 11,
        ..WorldConfig::default()
    };
    let registry = Arc::new(BlockRegistry::with_default_blocks());
    let mut terrain = TerrainGenerator::from_config(&config, &registry);
    terrain.add_decorator(Box::new(
        TreeDecorator::new(config.seed, &registry).with_threshold(-1.0),
    ));
    let world = World::with_terrain(config, registry.clone(), terrain);

    let chunk = world.ensure_chunk(ChunkCoord::new(0, 0));
    let chunk = chunk.get();
    let log = registry.id_of("log").expect("stock block");
    let offset = chunk.world_offset();

    for x in 0..16 {
        for z in 0..16 {
            let top = world.terrain().height_at(offset.x + x, offset.z + z) - 1;
            assert_eq!(chunk.get_block(x, top, z), GRASS);
            assert_eq!(chunk.get_block(x, top + 1, z), log);
        }
    }
}
