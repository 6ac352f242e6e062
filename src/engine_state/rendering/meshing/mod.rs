//! Mesh generation and scheduling for voxel rendering.
//!
//! This module converts chunk grids into vertex buffers and keeps track of
//! which chunks are being rebuilt on worker threads. The key goals are:
//! 1. At most one rebuild per chunk in flight at any time
//! 2. No stale buffer is ever installed over a newer grid
//! 3. A chunk edited mid-rebuild is rebuilt again, exactly once
//!
//! # Architecture
//! - `MeshScheduler`: main-thread bookkeeping for generation and mesh tasks
//! - `mesh/`: the face-culling mesher and the mesh buffer type
//!
//! # Rebuild lifecycle
//! A rebuild is started with [`MeshScheduler::try_begin_mesh`], which refuses
//! coordinates already in flight. The worker builds under the chunk's read
//! lock and installs under the write lock only if the chunk's revision has
//! not moved. The result is reported back with [`MeshScheduler::finish_mesh`];
//! successfully installed coordinates are queued for upload until drained with
//! [`MeshScheduler::drain_ready`].

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use lru::LruCache;

use crate::engine_state::voxels::chunk::ChunkCoord;

mod mesh;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

/// How a mesh task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshOutcome {
    /// A new buffer was installed on the chunk.
    Installed {
        /// Vertices in the installed buffer; zero when no face was visible.
        vertex_count: usize,
    },
    /// The chunk changed during the build and the buffer was discarded.
    Stale,
    /// Nothing was built: the chunk was clean or no UV table was available.
    Skipped,
}

/// Main-thread bookkeeping for chunk generation and mesh rebuilds.
///
/// The scheduler never touches chunk data; it only decides which tasks may
/// start and records what finished.
#[derive(Debug)]
pub struct MeshScheduler {
    /// Coordinates with a generation task in flight
    generating: HashSet<ChunkCoord>,
    /// Coordinates with a mesh task in flight
    meshing: HashSet<ChunkCoord>,
    /// Installed meshes waiting to be picked up by the renderer, oldest first
    ready: VecDeque<ChunkCoord>,
    /// Every chunk with an installed mesh and its vertex count, by recency
    least_recently_meshed_chunks: LruCache<ChunkCoord, usize>,
    /// Number of installed builds per chunk
    builds: HashMap<ChunkCoord, u64>,
}

impl Default for MeshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        MeshScheduler {
            generating: HashSet::new(),
            meshing: HashSet::new(),
            ready: VecDeque::new(),
            least_recently_meshed_chunks: LruCache::unbounded(),
            builds: HashMap::new(),
        }
    }

    /// Claims the generation slot for `coord`.
    ///
    /// # Returns
    /// `false` if a generation task for `coord` is already in flight.
    pub fn try_begin_generation(&mut self, coord: ChunkCoord) -> bool {
        self.generating.insert(coord)
    }

    /// Releases the generation slot for `coord`.
    pub fn finish_generation(&mut self, coord: ChunkCoord) {
        self.generating.remove(&coord);
    }

    /// Claims the rebuild slot for `coord`.
    ///
    /// # Returns
    /// `false` if a rebuild of `coord` is already in flight.
    pub fn try_begin_mesh(&mut self, coord: ChunkCoord) -> bool {
        self.meshing.insert(coord)
    }

    /// Releases the rebuild slot for `coord` and records the outcome.
    pub fn finish_mesh(&mut self, coord: ChunkCoord, outcome: MeshOutcome) {
        self.meshing.remove(&coord);

        match outcome {
            MeshOutcome::Installed { vertex_count } => {
                self.least_recently_meshed_chunks.put(coord, vertex_count);
                *self.builds.entry(coord).or_insert(0) += 1;
                if !self.ready.contains(&coord) {
                    self.ready.push_back(coord);
                }
            }
            MeshOutcome::Stale => debug!("Discarded stale mesh for chunk {}", coord),
            MeshOutcome::Skipped => {}
        }
    }

    /// Returns `true` if a rebuild of `coord` is in flight.
    pub fn is_meshing(&self, coord: ChunkCoord) -> bool {
        self.meshing.contains(&coord)
    }

    /// Returns `true` if a generation of `coord` is in flight.
    pub fn is_generating(&self, coord: ChunkCoord) -> bool {
        self.generating.contains(&coord)
    }

    /// Number of generation and mesh tasks in flight.
    pub fn in_flight(&self) -> usize {
        self.generating.len() + self.meshing.len()
    }

    /// Takes the coordinates whose meshes were installed since the last drain,
    /// in completion order.
    pub fn drain_ready(&mut self) -> Vec<ChunkCoord> {
        self.ready.drain(..).collect()
    }

    /// Checks if a chunk has an installed mesh, marking it recently used.
    pub fn is_chunk_meshed(&mut self, coord: ChunkCoord) -> bool {
        self.least_recently_meshed_chunks.get(&coord).is_some()
    }

    /// Number of chunks with an installed mesh.
    pub fn meshed_chunk_count(&self) -> usize {
        self.least_recently_meshed_chunks.len()
    }

    /// Sum of the vertex counts of every installed mesh.
    pub fn meshed_vertex_count(&self) -> usize {
        self.least_recently_meshed_chunks.iter().map(|(_, count)| count).sum()
    }

    /// Number of meshes installed for `coord` so far.
    pub fn build_count(&self, coord: ChunkCoord) -> u64 {
        self.builds.get(&coord).copied().unwrap_or(0)
    }

    /// The chunk whose mesh was used least recently, if any.
    pub fn least_recently_meshed(&self) -> Option<ChunkCoord> {
        self.least_recently_meshed_chunks.peek_lru().map(|(coord, _)| *coord)
    }

    /// Drops everything known about an unloaded chunk.
    pub fn forget_chunk(&mut self, coord: ChunkCoord) {
        self.least_recently_meshed_chunks.pop(&coord);
        self.ready.retain(|ready| *ready != coord);
        self.builds.remove(&coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_rebuild_in_flight_per_chunk() {
        let mut scheduler = MeshScheduler::new();
        let coord = ChunkCoord::new(0, 0);
        assert!(scheduler.try_begin_mesh(coord));
        assert!(!scheduler.try_begin_mesh(coord));
        assert!(scheduler.try_begin_mesh(ChunkCoord::new(1, 0)));

        scheduler.finish_mesh(coord, MeshOutcome::Stale);
        assert!(scheduler.try_begin_mesh(coord));
    }

    #[test]
    fn installed_meshes_are_queued_once() {
        let mut scheduler = MeshScheduler::new();
        let coord = ChunkCoord::new(2, 2);
        for _ in 0..2 {
            scheduler.try_begin_mesh(coord);
            scheduler.finish_mesh(coord, MeshOutcome::Installed { vertex_count: 36 });
        }
        scheduler.try_begin_mesh(ChunkCoord::new(3, 3));
        scheduler.finish_mesh(ChunkCoord::new(3, 3), MeshOutcome::Skipped);

        assert_eq!(scheduler.drain_ready(), vec![coord]);
        assert!(scheduler.drain_ready().is_empty());
        assert_eq!(scheduler.build_count(coord), 2);
        assert_eq!(scheduler.meshed_vertex_count(), 36);
        assert!(scheduler.is_chunk_meshed(coord));
        assert_eq!(scheduler.in_flight(), 0);
    }

    #[test]
    fn forgetting_a_chunk_clears_its_state() {
        let mut scheduler = MeshScheduler::new();
        let coord = ChunkCoord::new(-1, 4);
        scheduler.try_begin_mesh(coord);
        scheduler.finish_mesh(coord, MeshOutcome::Installed { vertex_count: 12 });
        scheduler.forget_chunk(coord);

        assert!(!scheduler.is_chunk_meshed(coord));
        assert!(scheduler.drain_ready().is_empty());
        assert_eq!(scheduler.meshed_chunk_count(), 0);
    }
}
