use std::{collections::HashSet, sync::Arc};

use cgmath::Point3;
use voxel_chunk_manager::{
    BlockRegistry, ChunkCoord, EngineState, UvTable, World, WorldConfig,
};
use web_time::Duration;

const TIMEOUT: Duration = Duration::from_secs(60);
const GLASS: u16 = 7;

fn world_with_atlas(seed: u32) -> Arc<World> {
    let registry = BlockRegistry::with_default_blocks();
    let (uv_table, _) = UvTable::from_grid_layout(&registry.texture_names(), 16);
    let world = World::new(
        WorldConfig {
            seed,
            ..WorldConfig::default()
        },
        Arc::new(registry),
    );
    world.set_uv_table(uv_table);
    Arc::new(world)
}

#[test]
fn worker_pipeline_meshes_every_requested_chunk() {
    let world = world_with_atlas(1337);
    let mut engine = EngineState::new(world.clone(), 3);

    assert_eq!(engine.request_area(ChunkCoord::new(0, 0), 1), 9);
    // Duplicate requests while work is in flight are ignored.
    assert_eq!(engine.request_area(ChunkCoord::new(0, 0), 1), 0);
    assert!(engine.run_until_idle(TIMEOUT));

    let ready: HashSet<ChunkCoord> = engine.drain_ready_meshes().into_iter().collect();
    let expected: HashSet<ChunkCoord> = ChunkCoord::new(0, 0).square_around(1).collect();
    assert_eq!(ready, expected);
    assert_eq!(world.chunk_count(), 9);
    assert_eq!(engine.scheduler().meshed_chunk_count(), 9);

    for (coord, chunk) in world.chunks() {
        let chunk = chunk.get();
        assert!(!chunk.is_dirty(), "chunk {} still dirty", coord);
        assert!(chunk.vertex_count() > 0);
        assert_eq!(engine.scheduler().build_count(coord), 1);
    }
    assert_eq!(engine.scheduler().meshed_vertex_count(), world.total_vertex_count());
}

#[test]
fn clean_chunks_are_not_remeshed() {
    let world = world_with_atlas(4);
    let mut engine = EngineState::new(world, 2);
    engine.request_chunk(ChunkCoord::new(0, 0));
    assert!(engine.run_until_idle(TIMEOUT));

    assert!(!engine.request_chunk(ChunkCoord::new(0, 0)));
    assert_eq!(engine.schedule_dirty_meshes(), 0);
    assert_eq!(engine.scheduler().build_count(ChunkCoord::new(0, 0)), 1);
}

#[test]
fn edited_chunk_is_remeshed() {
    let world = world_with_atlas(21);
    let mut engine = EngineState::new(world.clone(), 2);
    let coord = ChunkCoord::new(0, 0);
    engine.request_chunk(coord);
    assert!(engine.run_until_idle(TIMEOUT));
    engine.drain_ready_meshes();

    assert!(engine.set_block_at(Point3::new(4, 127, 4), GLASS));
    assert!(engine.run_until_idle(TIMEOUT));

    assert_eq!(engine.drain_ready_meshes(), vec![coord]);
    assert_eq!(engine.scheduler().build_count(coord), 2);
    let chunk = world.get_chunk(coord).expect("loaded");
    assert!(!chunk.get().is_dirty());
}

#[test]
fn edit_during_rebuild_triggers_exactly_one_follow_up() {
    let world = world_with_atlas(8);
    // Without workers every task runs inline, so the interleaving is fixed.
    let mut engine = EngineState::new(world.clone(), 0);
    let coord = ChunkCoord::new(0, 0);
    engine.request_chunk(coord);
    assert!(engine.run_until_idle(TIMEOUT));
    assert_eq!(engine.scheduler().build_count(coord), 1);

    // The first edit's rebuild is still unreported when the second lands.
    assert!(engine.set_block_at(Point3::new(1, 127, 1), GLASS));
    assert!(engine.scheduler().is_meshing(coord));
    assert!(engine.set_block_at(Point3::new(2, 127, 1), GLASS));
    assert_eq!(engine.schedule_dirty_meshes(), 0);

    assert!(engine.run_until_idle(TIMEOUT));
    assert_eq!(engine.scheduler().build_count(coord), 3);
    assert!(!world.get_chunk(coord).expect("loaded").get().is_dirty());
}

#[test]
fn nothing_is_meshed_without_an_atlas() {
    let world = Arc::new(World::with_seed(2));
    let mut engine = EngineState::new(world.clone(), 0);
    engine.request_chunk(ChunkCoord::new(0, 0));
    assert!(engine.run_until_idle(TIMEOUT));

    assert!(engine.drain_ready_meshes().is_empty());
    assert!(world.get_chunk(ChunkCoord::new(0, 0)).expect("generated").get().is_dirty());
    assert_eq!(engine.schedule_dirty_meshes(), 0);
}
