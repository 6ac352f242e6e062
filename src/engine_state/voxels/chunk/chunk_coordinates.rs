//! # Chunk Coordinates
//!
//! Chunk-grid coordinates and chunk dimensions, plus the floor-division mapping
//! from world block positions into a chunk and a chunk-local position.

use std::fmt;

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Position of a chunk on the horizontal chunk grid.
///
/// Chunks span the full world height, so only `x` and `z` are needed. Chunk
/// `(1, -2)` covers world blocks `x in [width, 2*width)` and
/// `z in [-2*depth, -depth)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk index along world X.
    pub x: i32,
    /// Chunk index along world Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Returns the chunk containing the world column `(world_x, world_z)`.
    pub fn containing(world_x: i32, world_z: i32, dimensions: ChunkDimensions) -> Self {
        ChunkCoord {
            x: world_x.div_euclid(dimensions.width as i32),
            z: world_z.div_euclid(dimensions.depth as i32),
        }
    }

    /// World position of this chunk's local origin block `(0, 0, 0)`.
    ///
    /// World positions are `i32`, so chunks past the edge of that range wrap
    /// around instead of overflowing; generation stays deterministic there.
    pub fn world_offset(self, dimensions: ChunkDimensions) -> Vector3<i32> {
        Vector3::new(
            self.x.wrapping_mul(dimensions.width as i32),
            0,
            self.z.wrapping_mul(dimensions.depth as i32),
        )
    }

    /// Iterates over every coordinate in the square of half-size `radius`
    /// centered on `self`, row by row along x.
    pub fn square_around(self, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        let radius = radius.max(0);
        (-radius..=radius).flat_map(move |dz| {
            (-radius..=radius).map(move |dx| ChunkCoord::new(self.x + dx, self.z + dz))
        })
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Size of a chunk's block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkDimensions {
    /// Blocks along X.
    pub width: usize,
    /// Blocks along Y.
    pub height: usize,
    /// Blocks along Z.
    pub depth: usize,
}

impl ChunkDimensions {
    /// The reference chunk size, 16x128x16.
    pub const REFERENCE: ChunkDimensions = ChunkDimensions {
        width: 16,
        height: 128,
        depth: 16,
    };

    /// Creates a set of dimensions.
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        ChunkDimensions {
            width,
            height,
            depth,
        }
    }

    /// Total number of cells in the grid.
    pub const fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Returns `true` when the chunk-local position lies inside the grid.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth
    }

    /// Flat storage index of a chunk-local position, or `None` when out of bounds.
    ///
    /// Cells are laid out x-major, then y, then z, so consecutive indices walk
    /// along z.
    pub fn index_of(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some((x as usize * self.height + y as usize) * self.depth + z as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    pub fn position_of(&self, index: usize) -> Point3<i32> {
        let z = index % self.depth;
        let y = (index / self.depth) % self.height;
        let x = index / (self.depth * self.height);
        Point3::new(x as i32, y as i32, z as i32)
    }

    /// Splits a world block position into its chunk and chunk-local position.
    ///
    /// Uses floor division, so `world_x = -1` lands in chunk `-1` at local
    /// `x = width - 1`.
    pub fn split_world_position(&self, world: Point3<i32>) -> (ChunkCoord, Point3<i32>) {
        let coord = ChunkCoord::containing(world.x, world.z, *self);
        let local = Point3::new(
            world.x.rem_euclid(self.width as i32),
            world.y,
            world.z.rem_euclid(self.depth as i32),
        );
        (coord, local)
    }
}

impl Default for ChunkDimensions {
    fn default() -> Self {
        Self::REFERENCE
    }
}
