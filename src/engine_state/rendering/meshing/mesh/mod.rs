//! Mesh generation for voxel rendering.
//!
//! This module converts chunk block grids into renderable triangle lists using
//! face culling: a block face is only emitted when the neighboring cell is not
//! solid.
//!
//! # Architecture
//! - [`ChunkMesh`]: the vertex list for one chunk
//! - [`Face`]: a single quad with counter-clockwise corners
//! - [`build_chunk_mesh`]: walks a chunk and collects visible faces
//!
//! # Usage
//! ```
//! use voxel_chunk_manager::{BlockRegistry, Chunk, ChunkCoord, ChunkDimensions, UvTable};
//!
//! let registry = BlockRegistry::with_default_blocks();
//! let mut chunk = Chunk::empty(ChunkCoord::new(0, 0), ChunkDimensions::REFERENCE);
//! chunk.set_block(0, 0, 0, 1);
//!
//! let mesh = chunk.rebuild_mesh(&registry, &UvTable::new()).unwrap();
//! assert_eq!(mesh.quad_count(), 6);
//! ```

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
