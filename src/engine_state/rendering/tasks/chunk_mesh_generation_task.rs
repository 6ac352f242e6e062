//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask` which rebuilds a chunk's
//! vertex buffer on a worker thread, keeping the calling thread responsive while
//! the grid is walked.

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::{build_chunk_mesh, ChunkMesh, MeshOutcome, MeshScheduler},
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{Chunk, ChunkCoord},
            world::World,
        },
    },
};

/// A task that rebuilds the mesh of one chunk in a background thread.
///
/// This task is responsible for:
/// 1. Skipping chunks that are already clean
/// 2. Building the mesh while holding the chunk's read lock
/// 3. Installing the mesh only if the chunk was not edited meanwhile
pub struct ChunkMeshGenerationTask {
    /// The world providing the registry and the UV table
    world: Arc<World>,
    /// The chunk that needs mesh generation
    chunk: MtResource<Chunk>,
    /// Coordinate of `chunk`
    coord: ChunkCoord,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// The caller must hold the scheduler's rebuild slot for `coord`.
    ///
    /// # Arguments
    /// * `world` - The world the chunk belongs to
    /// * `chunk` - The chunk that needs mesh generation
    /// * `coord` - The chunk's coordinate
    ///
    /// # Returns
    /// A new `ChunkMeshGenerationTask` instance
    pub fn new(world: Arc<World>, chunk: MtResource<Chunk>, coord: ChunkCoord) -> Self {
        ChunkMeshGenerationTask {
            world,
            chunk,
            coord,
        }
    }

    fn build(&self) -> MeshOutcome {
        let Some(uv_table) = self.world.uv_table() else {
            return MeshOutcome::Skipped;
        };

        // Edits wait on the read lock, so the grid is stable for the whole build.
        let (mesh, revision) = {
            let chunk = self.chunk.get();
            if !chunk.is_dirty() {
                return MeshOutcome::Skipped;
            }
            (
                build_chunk_mesh(&chunk, self.world.registry(), &uv_table),
                chunk.revision(),
            )
        };

        let vertex_count = mesh.as_ref().map_or(0, ChunkMesh::vertex_count);
        if self.chunk.get_mut().install_mesh(mesh, revision) {
            MeshOutcome::Installed { vertex_count }
        } else {
            MeshOutcome::Stale
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    /// Builds and installs the mesh on the worker thread.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkMeshGenerationTaskResult {
            world: self.world.clone(),
            chunk: self.chunk.clone(),
            coord: self.coord,
            outcome: self.build(),
        })
    }
}

/// The result of a chunk mesh generation task.
pub struct ChunkMeshGenerationTaskResult {
    world: Arc<World>,
    chunk: MtResource<Chunk>,
    coord: ChunkCoord,
    outcome: MeshOutcome,
}

impl ChunkMeshGenerationTaskResult {
    /// How the rebuild ended.
    pub fn outcome(&self) -> MeshOutcome {
        self.outcome
    }
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Records the outcome and starts the follow-up rebuild if the chunk was
    /// dirtied again while this one ran.
    fn handle_result(self: Box<Self>, scheduler: &mut MeshScheduler) -> Vec<Box<dyn Task>> {
        scheduler.finish_mesh(self.coord, self.outcome);

        let still_loaded = self
            .world
            .get_chunk(self.coord)
            .is_some_and(|current| current.ptr_eq(&self.chunk));
        if !still_loaded {
            if !self.world.contains_chunk(self.coord) {
                scheduler.forget_chunk(self.coord);
            }
            return Vec::new();
        }

        let needs_rebuild = self.chunk.get().is_dirty() && self.world.uv_table().is_some();
        if !needs_rebuild || !scheduler.try_begin_mesh(self.coord) {
            return Vec::new();
        }

        vec![Box::new(ChunkMeshGenerationTask::new(
            self.world.clone(),
            self.chunk.clone(),
            self.coord,
        ))]
    }
}
