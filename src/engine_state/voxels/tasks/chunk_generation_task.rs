//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which generates chunk data on a
//! worker thread. It is scheduled when a chunk is requested that the world has
//! not loaded yet.

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::{meshing::MeshScheduler, tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask},
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{Chunk, ChunkCoord},
            world::World,
        },
    },
};

/// A task that generates chunk data asynchronously.
///
/// This task is responsible for:
/// 1. Generating the chunk at the requested coordinate and adding it to the world
/// 2. Handing the chunk to the mesh scheduler once it exists
pub struct ChunkGenerationTask {
    /// The world the chunk is added to
    world: Arc<World>,
    /// The coordinate of the chunk to generate
    coord: ChunkCoord,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `world` - The world to generate into
    /// * `coord` - The chunk coordinate to generate
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(world: Arc<World>, coord: ChunkCoord) -> Self {
        ChunkGenerationTask { world, coord }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the chunk, or picks up the one another caller generated first.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let chunk = self.world.ensure_chunk(self.coord);

        Box::new(ChunkGenerationTaskResult {
            world: self.world.clone(),
            coord: self.coord,
            chunk,
        })
    }
}

/// The result of a chunk generation task.
///
/// Carries the generated chunk back to the main thread, where its first mesh
/// build is scheduled.
pub struct ChunkGenerationTaskResult {
    world: Arc<World>,
    coord: ChunkCoord,
    /// A thread-safe reference to the generated chunk
    chunk: MtResource<Chunk>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Clears the pending generation and chains a mesh build for the chunk.
    ///
    /// No mesh task is chained while the world has no UV table, or while a
    /// rebuild of this coordinate is already in flight.
    fn handle_result(self: Box<Self>, scheduler: &mut MeshScheduler) -> Vec<Box<dyn Task>> {
        scheduler.finish_generation(self.coord);

        if self.world.uv_table().is_none() || !scheduler.try_begin_mesh(self.coord) {
            return Vec::new();
        }

        vec![Box::new(ChunkMeshGenerationTask::new(
            self.world.clone(),
            self.chunk.clone(),
            self.coord,
        ))]
    }
}
