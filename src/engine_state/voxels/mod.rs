//! # Voxel World Core
//!
//! This module contains the data side of the voxel engine: what blocks exist,
//! how chunks store them, how terrain is generated and how the world ties
//! chunks together.
//!
//! ## Architecture
//!
//! * **Block**: block ids, block types, the six faces and the registry
//! * **Chunk**: fixed-size grids of block ids with a dirty flag and a mesh
//! * **Terrain**: the height-field generator and its decoration passes
//! * **Modifications**: the edit log replayed onto regenerated chunks
//! * **World**: the chunk map, lazy generation, eviction and remeshing
//! * **Tasks**: chunk generation on worker threads
//!
//! ## Data Flow
//!
//! 1. A chunk coordinate is requested from the world
//! 2. The terrain generator fills a new chunk and recorded edits are replayed
//! 3. Edits mark the chunk dirty
//! 4. Dirty chunks are remeshed, inline or on a worker, and handed to the renderer

pub mod block;
pub mod chunk;
pub mod modifications;
pub mod tasks;
pub mod terrain;
pub mod world;
