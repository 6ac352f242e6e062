//! # Engine State Module
//!
//! The core module that drives chunk loading and meshing for a [`World`].
//!
//! ## Key Components
//!
//! * `EngineState` - Couples a shared world with the task manager and mesh scheduler
//! * `rendering` - Meshing, vertex layout, atlas UV lookup and mesh tasks
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Architecture
//!
//! The world is shared as `Arc<World>` between the driving thread and the
//! workers. Generation and mesh tasks run on the workers; their results are
//! handled on the driving thread, which owns the [`MeshScheduler`] and is the
//! only place that decides which task starts next. A chunk requested for the
//! first time is generated, then meshed; a chunk edited later is remeshed once
//! [`EngineState::schedule_dirty_meshes`] is called.

use std::sync::Arc;
use std::thread;

use cgmath::Point3;
use log::{debug, warn};
use rendering::{meshing::MeshScheduler, tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask};
use task_management::TaskManager;
use voxels::{
    block::BlockId,
    chunk::ChunkCoord,
    tasks::chunk_generation_task::ChunkGenerationTask,
    world::World,
};
use web_time::{Duration, Instant};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Sleep between polls in [`EngineState::run_until_idle`].
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The main driver for background chunk work.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use voxel_chunk_manager::{BlockRegistry, ChunkCoord, EngineState, UvTable, World, WorldConfig};
/// use web_time::Duration;
///
/// let registry = BlockRegistry::with_default_blocks();
/// let (uv_table, _) = UvTable::from_grid_layout(&registry.texture_names(), 16);
/// let world = Arc::new(World::new(WorldConfig::default(), Arc::new(registry)));
/// world.set_uv_table(uv_table);
///
/// let mut engine = EngineState::new(world, 2);
/// engine.request_chunk(ChunkCoord::new(0, 0));
/// assert!(engine.run_until_idle(Duration::from_secs(30)));
/// assert_eq!(engine.drain_ready_meshes(), vec![ChunkCoord::new(0, 0)]);
/// ```
pub struct EngineState {
    /// The world shared with every task
    world: Arc<World>,
    /// Worker pool executing generation and mesh tasks
    task_manager: TaskManager,
    /// In-flight bookkeeping, only touched on the driving thread
    scheduler: MeshScheduler,
}

impl EngineState {
    /// Creates a new engine over `world`.
    ///
    /// # Arguments
    /// * `world` - The world to load and mesh chunks of
    /// * `workers` - Number of worker threads; zero runs every task inline
    pub fn new(world: Arc<World>, workers: usize) -> Self {
        EngineState {
            world,
            task_manager: TaskManager::new(workers),
            scheduler: MeshScheduler::new(),
        }
    }

    /// The world this engine drives.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// The in-flight bookkeeping, e.g. for build counts.
    pub fn scheduler(&self) -> &MeshScheduler {
        &self.scheduler
    }

    /// Requests that the chunk at `coord` be loaded and meshed.
    ///
    /// A missing chunk gets a generation task. A loaded but dirty chunk gets a
    /// mesh task. Requests for work that is already in flight are ignored.
    ///
    /// # Returns
    /// `true` if a task was published.
    pub fn request_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.world.contains_chunk(coord) {
            return self.schedule_mesh(coord);
        }

        if !self.scheduler.try_begin_generation(coord) {
            return false;
        }
        debug!("Scheduling generation of chunk {}", coord);
        self.task_manager
            .publish_task(Box::new(ChunkGenerationTask::new(self.world.clone(), coord)));
        true
    }

    /// Requests every chunk in the square of `radius` chunks around `center`.
    ///
    /// # Returns
    /// The number of tasks published.
    pub fn request_area(&mut self, center: ChunkCoord, radius: i32) -> usize {
        center
            .square_around(radius)
            .filter(|&coord| self.request_chunk(coord))
            .count()
    }

    /// Edits a block through the world and schedules a rebuild of its chunk.
    ///
    /// # Returns
    /// `false` if the position is outside the world's vertical range.
    pub fn set_block_at(&mut self, position: Point3<i32>, id: BlockId) -> bool {
        if !self.world.set_block_at(position, id) {
            return false;
        }
        let (coord, _) = self.world.dimensions().split_world_position(position);
        self.schedule_mesh(coord);
        true
    }

    /// Schedules a rebuild for every loaded dirty chunk.
    ///
    /// # Returns
    /// The number of mesh tasks published.
    pub fn schedule_dirty_meshes(&mut self) -> usize {
        self.world
            .chunk_coords()
            .into_iter()
            .filter(|&coord| self.schedule_mesh(coord))
            .count()
    }

    fn schedule_mesh(&mut self, coord: ChunkCoord) -> bool {
        // The generation result chains the first mesh build.
        if self.scheduler.is_generating(coord) || self.world.uv_table().is_none() {
            return false;
        }
        let Some(chunk) = self.world.get_chunk(coord) else {
            return false;
        };
        if !chunk.get().is_dirty() || !self.scheduler.try_begin_mesh(coord) {
            return false;
        }

        self.task_manager.publish_task(Box::new(ChunkMeshGenerationTask::new(
            self.world.clone(),
            chunk,
            coord,
        )));
        true
    }

    /// Processes any completed tasks and queues new ones.
    ///
    /// This should be called regularly (e.g. once per frame) so results are
    /// handled and queued tasks reach the workers.
    pub fn process_tasks(&mut self) {
        self.task_manager
            .process_completed_tasks(&mut self.scheduler);
        self.task_manager.process_queued_tasks();
    }

    /// Returns `true` when no task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle() && self.scheduler.in_flight() == 0
    }

    /// Takes the coordinates whose meshes were installed since the last call.
    pub fn drain_ready_meshes(&mut self) -> Vec<ChunkCoord> {
        self.scheduler.drain_ready()
    }

    /// Drives [`process_tasks`](EngineState::process_tasks) until the engine is
    /// idle or `timeout` elapses.
    ///
    /// # Returns
    /// `true` if the engine went idle in time.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            self.process_tasks();
            if self.is_idle() {
                return true;
            }
            if start.elapsed() >= timeout {
                warn!(
                    "Chunk work still pending after {:?} ({} tasks in flight)",
                    timeout,
                    self.scheduler.in_flight()
                );
                return false;
            }
            thread::sleep(IDLE_POLL_INTERVAL);
        }
    }
}
