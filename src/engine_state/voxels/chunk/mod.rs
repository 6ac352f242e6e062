//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size 3D grid of block ids
//! covering one column of the world, together with its dirty flag and the mesh
//! last built from it.
//!
//! ## Storage
//!
//! Blocks are stored densely as [`BlockId`]s, one per cell, x-major then y then z
//! (see [`ChunkDimensions::index_of`]). Reads outside the grid return air and
//! writes outside it are dropped, so callers never need to bounds-check.
//!
//! ## Mesh lifecycle
//!
//! Every accepted write marks the chunk dirty and bumps its revision. A rebuild
//! replaces the stored mesh and clears the dirty flag. The revision lets a
//! rebuild that ran on another thread detect that the grid changed underneath it
//! (see [`Chunk::install_mesh`]).

use cgmath::{Point3, Vector3};

use super::block::{BlockId, BlockRegistry, AIR_ID};
use crate::engine_state::rendering::{
    meshing::{build_chunk_mesh, ChunkMesh},
    texture::UvTable,
};

mod chunk_coordinates;
pub mod chunk_iteration;

pub use chunk_coordinates::{ChunkCoord, ChunkDimensions};
use chunk_iteration::ChunkBlockIterator;

/// A fixed-size column of voxel blocks.
///
/// Chunks are created empty (all air) and dirty by the world, filled once by the
/// terrain generator, then edited through [`set_block`](Chunk::set_block).
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position of this chunk on the chunk grid.
    coord: ChunkCoord,
    /// Size of the block grid.
    dimensions: ChunkDimensions,
    /// Block ids, `dimensions.volume()` entries in storage order.
    blocks: Vec<BlockId>,
    /// Set when the stored mesh no longer reflects the grid.
    dirty: bool,
    /// Count of accepted writes and invalidations.
    revision: u64,
    /// The last mesh built from this chunk; `None` when it had no visible faces
    /// or was never built.
    mesh: Option<ChunkMesh>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// The chunk starts dirty so its first mesh build is never skipped.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `dimensions` - The size of the block grid
    ///
    /// # Returns
    /// A new `Chunk` instance filled with air blocks.
    pub fn empty(coord: ChunkCoord, dimensions: ChunkDimensions) -> Self {
        Self::filled(coord, dimensions, AIR_ID)
    }

    /// Creates a new chunk with every cell set to `id`.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `dimensions` - The size of the block grid
    /// * `id` - The block id written to every cell
    pub fn filled(coord: ChunkCoord, dimensions: ChunkDimensions, id: BlockId) -> Self {
        Chunk {
            coord,
            dimensions,
            blocks: vec![id; dimensions.volume()],
            dirty: true,
            revision: 0,
            mesh: None,
        }
    }

    /// The chunk's position on the chunk grid.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The size of the chunk's block grid.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.dimensions
    }

    /// World position of local block `(0, 0, 0)`; the renderer translates the
    /// chunk's mesh by this.
    pub fn world_offset(&self) -> Vector3<i32> {
        self.coord.world_offset(self.dimensions)
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Arguments
    /// * `x` - X coordinate within the chunk
    /// * `y` - Y coordinate within the chunk
    /// * `z` - Z coordinate within the chunk
    ///
    /// # Returns
    /// The block id at that position, or [`AIR_ID`] when out of bounds.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.dimensions
            .index_of(x, y, z)
            .map_or(AIR_ID, |index| self.blocks[index])
    }

    /// Sets the block at the specified chunk-relative coordinates.
    ///
    /// An in-bounds write always marks the chunk dirty and bumps its revision,
    /// even when the id is unchanged. Out-of-bounds writes are ignored.
    ///
    /// # Arguments
    /// * `x` - X coordinate within the chunk
    /// * `y` - Y coordinate within the chunk
    /// * `z` - Z coordinate within the chunk
    /// * `id` - The block id to store
    ///
    /// # Returns
    /// `true` if the write landed inside the grid.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        match self.dimensions.index_of(x, y, z) {
            Some(index) => {
                self.blocks[index] = id;
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Checks if the block at the given position is solid according to `registry`.
    pub fn is_block_solid(&self, registry: &BlockRegistry, x: i32, y: i32, z: i32) -> bool {
        registry.is_solid(self.get_block(x, y, z))
    }

    /// Whether the stored mesh is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forces the next mesh build, e.g. after the atlas changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Number of accepted writes and invalidations since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The last mesh built for this chunk.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Vertex count of the stored mesh, zero when there is none.
    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, ChunkMesh::vertex_count)
    }

    /// Iterates over every non-air block with its chunk-local position.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Number of non-air cells.
    pub fn non_air_count(&self) -> usize {
        self.blocks.iter().filter(|&&id| id != AIR_ID).count()
    }

    /// The raw block grid in storage order.
    pub fn raw_blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Rebuilds the mesh from the current grid and clears the dirty flag.
    ///
    /// Faces on the chunk border are always emitted since neighbors outside
    /// the grid read as air.
    ///
    /// # Arguments
    /// * `registry` - Source of block solidity and face textures
    /// * `uv_table` - Atlas lookup for face textures
    ///
    /// # Returns
    /// The new mesh, or `None` when no face is visible.
    pub fn rebuild_mesh(&mut self, registry: &BlockRegistry, uv_table: &UvTable) -> Option<&ChunkMesh> {
        self.mesh = build_chunk_mesh(self, registry, uv_table);
        self.dirty = false;
        self.mesh.as_ref()
    }

    /// Installs a mesh built elsewhere from a snapshot of this chunk.
    ///
    /// The mesh is only accepted when the chunk's revision still equals
    /// `built_at_revision`; otherwise the grid changed after the snapshot and
    /// the chunk stays dirty for a later rebuild.
    ///
    /// # Returns
    /// `true` if the mesh was installed.
    pub fn install_mesh(&mut self, mesh: Option<ChunkMesh>, built_at_revision: u64) -> bool {
        if self.revision != built_at_revision {
            return false;
        }
        self.mesh = mesh;
        self.dirty = false;
        true
    }

    /// Fills the vertical run `[y_start, y_end)` of column `(x, z)` with `id`.
    ///
    /// Used by terrain generation; bounds are clipped to the grid.
    pub fn fill_column(&mut self, x: i32, z: i32, y_start: i32, y_end: i32, id: BlockId) {
        let y_start = y_start.max(0);
        let y_end = y_end.min(self.dimensions.height as i32);
        if y_start >= y_end {
            return;
        }
        let (Some(first), Some(_)) = (
            self.dimensions.index_of(x, y_start, z),
            self.dimensions.index_of(x, y_end - 1, z),
        ) else {
            return;
        };

        let stride = self.dimensions.depth;
        for step in 0..(y_end - y_start) as usize {
            self.blocks[first + step * stride] = id;
        }
        self.mark_dirty();
    }

    /// Topmost non-air y in column `(x, z)`.
    pub fn highest_block(&self, x: i32, z: i32) -> Option<i32> {
        (0..self.dimensions.height as i32)
            .rev()
            .find(|&y| self.get_block(x, y, z) != AIR_ID)
    }

    /// Returns the local position of `world` if it falls inside this chunk.
    pub fn local_position(&self, world: Point3<i32>) -> Option<Point3<i32>> {
        let (coord, local) = self.dimensions.split_world_position(world);
        (coord == self.coord && self.dimensions.contains(local.x, local.y, local.z)).then_some(local)
    }
}
