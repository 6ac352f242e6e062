//! # World Module
//!
//! This module provides the `World` struct which manages the collection of chunks
//! in the voxel world. It serves as the central coordinator for chunk generation,
//! eviction, block edits and mesh rebuilds.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks that have been requested are kept
//! in memory, keyed by [`ChunkCoord`]. Chunks are generated lazily from the
//! world seed, and recorded edits are replayed onto every generated chunk so
//! that evicting and regenerating a chunk never loses player changes.
//!
//! ## Thread Safety
//!
//! Every method takes `&self`, so a world can be shared as `Arc<World>` between
//! the main thread and worker tasks:
//!
//! * The chunk map has a single mutation point. A new chunk is generated
//!   outside the map lock and inserted with compare-and-insert, so concurrent
//!   [`World::ensure_chunk`] calls for the same coordinate agree on one instance.
//! * Recorded edits are replayed onto a new chunk under the map's write lock.
//!   An edit is recorded before its chunk is looked up, so it either reaches a
//!   loaded chunk directly or is replayed at insertion.
//! * Chunks themselves are [`MtResource`]s; mesh builds hold a read lock while
//!   edits take the write lock.
//! * Lock order is chunk map, then modification log, then a single chunk.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use cgmath::Point3;
use log::{debug, info, warn};
use lru::LruCache;

use super::{
    block::{BlockId, BlockRegistry},
    chunk::{Chunk, ChunkCoord, ChunkDimensions},
    modifications::ModificationLog,
    terrain::TerrainGenerator,
};
use crate::{config::WorldConfig, core::MtResource, engine_state::rendering::texture::UvTable};

/// A voxel world composed of lazily generated chunks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use voxel_chunk_manager::{BlockRegistry, ChunkCoord, World, WorldConfig};
///
/// let world = World::new(WorldConfig::default(), Arc::new(BlockRegistry::with_default_blocks()));
///
/// let chunk = world.ensure_chunk(ChunkCoord::new(0, 0));
/// assert!(chunk.ptr_eq(&world.ensure_chunk(ChunkCoord::new(0, 0))));
/// assert_eq!(world.chunk_count(), 1);
/// ```
pub struct World {
    /// Configuration the world was created with.
    config: WorldConfig,
    /// Shared, read-only block catalog.
    registry: Arc<BlockRegistry>,
    /// Terrain generator seeded from `config.seed`.
    terrain: Arc<TerrainGenerator>,
    /// A mapping from chunk coordinates to chunk data.
    chunks: MtResource<HashMap<ChunkCoord, MtResource<Chunk>>>,
    /// Use order of loaded chunks, for capacity eviction.
    least_recently_used_chunks: MtResource<LruCache<ChunkCoord, ()>>,
    /// Atlas lookup used by mesh rebuilds; none until the renderer provides one.
    uv_table: MtResource<Option<Arc<UvTable>>>,
    /// Edits replayed onto every newly generated chunk.
    modifications: MtResource<ModificationLog>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    /// * `config` - World configuration; seed, chunk size and terrain shape
    /// * `registry` - The block catalog, shared with the mesher
    ///
    /// # Returns
    /// A new `World` instance with no chunks loaded and no UV table.
    pub fn new(config: WorldConfig, registry: Arc<BlockRegistry>) -> Self {
        let terrain = TerrainGenerator::from_config(&config, &registry);
        Self::from_parts(config, registry, terrain)
    }

    fn from_parts(config: WorldConfig, registry: Arc<BlockRegistry>, terrain: TerrainGenerator) -> Self {
        info!(
            "World created with seed {} and {}x{}x{} chunks",
            config.seed, config.chunk.width, config.chunk.height, config.chunk.depth
        );

        World {
            terrain: Arc::new(terrain),
            registry,
            chunks: MtResource::new(HashMap::new()),
            least_recently_used_chunks: MtResource::new(LruCache::unbounded()),
            uv_table: MtResource::new(None),
            modifications: MtResource::new(ModificationLog::new()),
            config,
        }
    }

    /// Creates a world with the stock block catalog and default settings,
    /// except for the seed.
    pub fn with_seed(seed: u32) -> Self {
        Self::new(
            WorldConfig {
                seed,
                ..WorldConfig::default()
            },
            Arc::new(BlockRegistry::with_default_blocks()),
        )
    }

    /// Creates a world with a caller-built terrain generator, e.g. one carrying
    /// custom decoration passes.
    ///
    /// The generator should be built for `config.chunk`; a different chunk
    /// height is logged, since surface heights are clamped to the generator's.
    pub fn with_terrain(
        config: WorldConfig,
        registry: Arc<BlockRegistry>,
        terrain: TerrainGenerator,
    ) -> Self {
        if terrain.chunk_height() != config.chunk.height {
            warn!(
                "Terrain generator built for chunk height {} but world chunks are {} high",
                terrain.chunk_height(),
                config.chunk.height
            );
        }
        Self::from_parts(config, registry, terrain)
    }

    /// The world seed.
    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    /// The configuration the world was created with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Size of every chunk in this world.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.config.chunk
    }

    /// The shared block catalog.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// The terrain generator.
    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Returns the chunk at `coord`, generating and storing it first if needed.
    ///
    /// Safe to call from several threads at once: every caller receives the
    /// same chunk instance.
    pub fn ensure_chunk(&self, coord: ChunkCoord) -> MtResource<Chunk> {
        self.ensure_chunk_tracked(coord).0
    }

    /// Like [`ensure_chunk`](World::ensure_chunk), also reporting whether this
    /// call inserted the chunk.
    fn ensure_chunk_tracked(&self, coord: ChunkCoord) -> (MtResource<Chunk>, bool) {
        if let Some(chunk) = self.get_chunk(coord) {
            self.touch(coord);
            return (chunk, false);
        }

        let mut generated = self.terrain.generate(coord, self.config.chunk);

        let (chunk, inserted) = match self.chunks.get_mut().entry(coord) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let replayed = self
                    .modifications
                    .get()
                    .replay_onto(&mut generated, &self.registry);
                if replayed > 0 {
                    debug!("Replayed {} edits onto chunk {}", replayed, coord);
                }
                (entry.insert(MtResource::new(generated)).clone(), true)
            }
        };

        self.touch(coord);
        if inserted {
            info!("Generated chunk {}", coord);
            self.enforce_capacity(coord);
        } else {
            debug!("Discarded duplicate generation of chunk {}", coord);
        }

        (chunk, inserted)
    }

    fn touch(&self, coord: ChunkCoord) {
        self.least_recently_used_chunks.get_mut().put(coord, ());
    }

    /// Evicts least recently used chunks until the configured capacity holds.
    /// `keep` is never evicted.
    fn enforce_capacity(&self, keep: ChunkCoord) {
        let Some(capacity) = self.config.max_loaded_chunks else {
            return;
        };

        while self.chunk_count() > capacity {
            let victim = {
                let mut lru = self.least_recently_used_chunks.get_mut();
                match lru.pop_lru() {
                    Some((coord, ())) if coord == keep => {
                        lru.put(coord, ());
                        match lru.pop_lru() {
                            Some((coord, ())) if coord != keep => coord,
                            _ => return,
                        }
                    }
                    Some((coord, ())) => coord,
                    None => return,
                }
            };

            if self.chunks.get_mut().remove(&victim).is_some() {
                info!("Evicted chunk {}", victim);
            }
        }
    }

    /// Returns the chunk at `coord` if it is loaded.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<MtResource<Chunk>> {
        self.chunks.get().get(&coord).cloned()
    }

    /// Returns `true` if a chunk is loaded at `coord`.
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.get().contains_key(&coord)
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.get().len()
    }

    /// Coordinates of every loaded chunk, sorted.
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.get().keys().copied().collect();
        coords.sort();
        coords
    }

    /// Handles to every loaded chunk, in coordinate order.
    pub fn chunks(&self) -> Vec<(ChunkCoord, MtResource<Chunk>)> {
        let mut chunks: Vec<_> = self
            .chunks
            .get()
            .iter()
            .map(|(coord, chunk)| (*coord, chunk.clone()))
            .collect();
        chunks.sort_by_key(|(coord, _)| *coord);
        chunks
    }

    /// Drops the chunk at `coord` from the world.
    ///
    /// Outstanding handles stay valid but are no longer reachable through the
    /// world. Edits made through [`set_block_at`](World::set_block_at) survive
    /// in the modification log and reappear when the chunk is regenerated.
    pub fn unload_chunk(&self, coord: ChunkCoord) -> Option<MtResource<Chunk>> {
        let removed = self.chunks.get_mut().remove(&coord);
        self.least_recently_used_chunks.get_mut().pop(&coord);
        if removed.is_some() {
            debug!("Unloaded chunk {}", coord);
        }
        removed
    }

    /// Ensures every chunk in the square of half-size `radius` around `center`.
    ///
    /// # Returns
    /// The number of chunks generated by this call.
    pub fn load_area(&self, center: ChunkCoord, radius: i32) -> usize {
        center
            .square_around(radius)
            .filter(|&coord| self.ensure_chunk_tracked(coord).1)
            .count()
    }

    /// Reads the block at a world position.
    ///
    /// # Returns
    /// `None` when the owning chunk is not loaded; air above or below the
    /// chunk's height range.
    pub fn get_block_at(&self, position: Point3<i32>) -> Option<BlockId> {
        let (coord, local) = self.config.chunk.split_world_position(position);
        self.get_chunk(coord)
            .map(|chunk| chunk.get().get_block(local.x, local.y, local.z))
    }

    /// Writes a block at a world position and records the edit.
    ///
    /// The edit is applied to the owning chunk if it is loaded, and always
    /// recorded so it is replayed when that chunk is next generated. An id
    /// missing from the registry is written as air, which is what replay
    /// would restore.
    ///
    /// # Returns
    /// `false` if `position.y` lies outside the chunk height; nothing is
    /// written or recorded in that case.
    pub fn set_block_at(&self, position: Point3<i32>, id: BlockId) -> bool {
        let (coord, local) = self.config.chunk.split_world_position(position);
        if !self.config.chunk.contains(local.x, local.y, local.z) {
            return false;
        }

        let block = self.registry.get(id);
        self.modifications.get_mut().record(position, &block.name);

        if let Some(chunk) = self.get_chunk(coord) {
            chunk.get_mut().set_block(local.x, local.y, local.z, block.id);
        }
        true
    }

    /// A snapshot of the recorded edits.
    pub fn modifications(&self) -> ModificationLog {
        self.modifications.get().clone()
    }

    /// Merges `log` into the world's edit record and replays it onto every
    /// loaded chunk.
    ///
    /// # Returns
    /// The number of blocks written into loaded chunks.
    pub fn apply_modifications(&self, log: &ModificationLog) -> usize {
        self.modifications.get_mut().merge(log);

        self.chunks()
            .into_iter()
            .map(|(_, chunk)| log.replay_onto(&mut chunk.get_mut(), &self.registry))
            .sum()
    }

    /// Installs the atlas lookup used by mesh rebuilds.
    ///
    /// Replacing an existing table marks every loaded chunk dirty, since their
    /// meshes carry the old UVs.
    pub fn set_uv_table(&self, uv_table: UvTable) {
        let replaced = self.uv_table.get_mut().replace(Arc::new(uv_table)).is_some();
        if replaced {
            for (_, chunk) in self.chunks() {
                chunk.get_mut().mark_dirty();
            }
        }
    }

    /// The current atlas lookup, if one has been installed.
    pub fn uv_table(&self) -> Option<Arc<UvTable>> {
        self.uv_table.get().clone()
    }

    /// Rebuilds the mesh of every dirty loaded chunk on the calling thread.
    ///
    /// Does nothing until a UV table has been installed.
    ///
    /// # Returns
    /// The number of chunks rebuilt.
    pub fn build_visible_meshes(&self) -> usize {
        let Some(uv_table) = self.uv_table() else {
            return 0;
        };

        let mut rebuilt = 0;
        for (_, chunk) in self.chunks() {
            let mut chunk = chunk.get_mut();
            if chunk.is_dirty() {
                chunk.rebuild_mesh(&self.registry, &uv_table);
                rebuilt += 1;
            }
        }
        rebuilt
    }

    /// Total vertices across the stored meshes of all loaded chunks.
    pub fn total_vertex_count(&self) -> usize {
        self.chunks()
            .iter()
            .map(|(_, chunk)| chunk.get().vertex_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::AIR_ID,
        terrain::{TerrainDecorator, TreeDecorator},
    };
    use std::{sync::Barrier, thread};

    /// Holds generation between two barrier waits so another thread can act
    /// while the chunk is built but not yet stored.
    struct PauseDuringGeneration {
        barrier: Arc<Barrier>,
    }

    impl TerrainDecorator for PauseDuringGeneration {
        fn name(&self) -> &str {
            "pause"
        }

        fn decorate(&self, _chunk: &mut Chunk, _terrain: &TerrainGenerator) {
            self.barrier.wait();
            self.barrier.wait();
        }
    }

    fn world_with_capacity(capacity: usize) -> World {
        World::new(
            WorldConfig {
                max_loaded_chunks: Some(capacity),
                ..WorldConfig::default()
            },
            Arc::new(BlockRegistry::with_default_blocks()),
        )
    }

    #[test]
    fn ensure_chunk_is_idempotent() {
        let world = World::with_seed(3);
        let a = world.ensure_chunk(ChunkCoord::new(1, 1));
        let b = world.ensure_chunk(ChunkCoord::new(1, 1));
        assert!(a.ptr_eq(&b));
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let world = world_with_capacity(2);
        world.ensure_chunk(ChunkCoord::new(0, 0));
        world.ensure_chunk(ChunkCoord::new(1, 0));
        world.ensure_chunk(ChunkCoord::new(0, 0));
        world.ensure_chunk(ChunkCoord::new(2, 0));

        assert_eq!(world.chunk_coords(), vec![ChunkCoord::new(0, 0), ChunkCoord::new(2, 0)]);
    }

    #[test]
    fn load_area_counts_new_chunks() {
        let world = World::with_seed(3);
        assert_eq!(world.load_area(ChunkCoord::new(0, 0), 1), 9);
        assert_eq!(world.load_area(ChunkCoord::new(1, 0), 1), 3);
        assert_eq!(world.chunk_count(), 12);
    }

    #[test]
    fn build_without_uv_table_is_a_no_op() {
        let world = World::with_seed(3);
        let chunk = world.ensure_chunk(ChunkCoord::new(0, 0));
        assert_eq!(world.build_visible_meshes(), 0);
        assert!(chunk.get().is_dirty());

        world.set_uv_table(UvTable::new());
        assert_eq!(world.build_visible_meshes(), 1);
        assert!(!chunk.get().is_dirty());
        assert_eq!(world.build_visible_meshes(), 0);
    }

    #[test]
    fn replacing_uv_table_dirties_chunks() {
        let world = World::with_seed(3);
        world.set_uv_table(UvTable::new());
        let chunk = world.ensure_chunk(ChunkCoord::new(0, 0));
        world.build_visible_meshes();

        world.set_uv_table(UvTable::new());
        assert!(chunk.get().is_dirty());
    }

    #[test]
    fn out_of_height_edits_are_ignored() {
        let world = World::with_seed(3);
        assert!(!world.set_block_at(Point3::new(0, 500, 0), 1));
        assert!(!world.set_block_at(Point3::new(0, -1, 0), 1));
        assert!(world.modifications().is_empty());
    }

    #[test]
    fn edit_during_generation_reaches_stored_chunk() {
        let barrier = Arc::new(Barrier::new(2));
        let config = WorldConfig::default();
        let registry = Arc::new(BlockRegistry::with_default_blocks());
        let mut terrain = TerrainGenerator::from_config(&config, &registry);
        terrain.add_decorator(Box::new(PauseDuringGeneration {
            barrier: barrier.clone(),
        }));
        let world = Arc::new(World::with_terrain(config, registry, terrain));
        let coord = ChunkCoord::new(0, 0);

        let generator = {
            let world = world.clone();
            thread::spawn(move || world.ensure_chunk(coord))
        };

        barrier.wait();
        assert!(!world.contains_chunk(coord));
        assert!(world.set_block_at(Point3::new(3, 120, 4), 7));
        barrier.wait();

        let chunk = generator.join().expect("generation thread panicked");
        assert_eq!(chunk.get().get_block(3, 120, 4), 7);
        assert_eq!(world.get_block_at(Point3::new(3, 120, 4)), Some(7));
    }

    #[test]
    fn unknown_ids_are_stored_as_air() {
        let world = World::with_seed(3);
        let position = Point3::new(2, 100, 2);
        world.ensure_chunk(ChunkCoord::new(0, 0));
        world.set_block_at(position, 7);

        assert!(world.set_block_at(position, 999));
        assert_eq!(world.get_block_at(position), Some(AIR_ID));

        world.unload_chunk(ChunkCoord::new(0, 0));
        world.ensure_chunk(ChunkCoord::new(0, 0));
        assert_eq!(world.get_block_at(position), Some(AIR_ID));
    }

    #[test]
    fn extreme_chunk_coordinates_generate() {
        let world = World::with_seed(3);
        for coord in [
            ChunkCoord::new(200_000_000, 0),
            ChunkCoord::new(i32::MIN, i32::MAX),
        ] {
            let chunk = world.ensure_chunk(coord);
            assert!(chunk.get().non_air_count() > 0);
        }
        assert_eq!(world.chunk_count(), 2);
    }

    #[test]
    fn with_terrain_keeps_the_given_generator() {
        let config = WorldConfig::default();
        let registry = Arc::new(BlockRegistry::with_default_blocks());
        let mut terrain = TerrainGenerator::from_config(&config, &registry);
        terrain.add_decorator(Box::new(TreeDecorator::new(config.seed, &registry)));

        let world = World::with_terrain(config, registry, terrain);
        assert_eq!(world.terrain().decorator_count(), 1);
        assert_eq!(world.terrain().chunk_height(), world.dimensions().height);
    }
}
